use crate::domain::value_objects::{Money, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザービュー（Read Model）
///
/// 残高照会とユーザー一覧に最適化された非正規化ビュー（CQRSパターン）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub user_id: UserId,
    pub name: String,
    pub balance: Money,
    /// 口座集約のバージョン
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// ユーザーRead Modelポート
#[async_trait]
pub trait UserReadModel: Send + Sync {
    /// ユーザーの現在状態を保存する（upsert）
    ///
    /// 保存済みのビューより`version`が小さい場合は何もしない。
    /// 並行コマンドの保存順が前後しても残高が巻き戻らない。
    async fn save(&self, user_view: UserView) -> Result<()>;

    /// IDでユーザーを取得する
    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserView>>;

    /// 全ユーザーをID順に取得する
    async fn list_all(&self) -> Result<Vec<UserView>>;
}
