use crate::domain::value_objects::{Amount, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 融資ビュー（Read Model）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanView {
    pub user_id: UserId,
    pub amount: Amount,
    pub granted_at: DateTime<Utc>,
}

/// 融資Read Modelポート
#[async_trait]
pub trait LoanReadModel: Send + Sync {
    /// 融資を保存する（user_idでupsert）
    async fn save(&self, loan_view: LoanView) -> Result<()>;

    /// ユーザーの融資を取得する
    ///
    /// 残高照会の融資情報に使用される。
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<LoanView>>;

    /// 全融資をユーザーID順に取得する
    async fn list_all(&self) -> Result<Vec<LoanView>>;
}
