use crate::domain::{events::DomainEvent, value_objects::UserId};
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 追記のエラー
#[derive(Debug, Error)]
pub enum AppendError {
    /// 読み込み後に他の書き込みが先行した（楽観的ロックの競合）
    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// ストレージ障害
    #[error("event store failure")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// イベントストアポート
///
/// ドメインイベントの永続化と取得を抽象化する。
/// イベントは口座（ユーザー）ごとの追記専用ログに保存される不変の事実。
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 口座のイベントを追加する
    ///
    /// 現在のイベント数が`expected_version`と一致する場合のみ追加する。
    /// 一致しなければ何も書き込まず`AppendError::VersionConflict`を返す。
    /// 複数イベントは原子的に追加される。
    async fn append(
        &self,
        aggregate_id: UserId,
        expected_version: u64,
        events: Vec<DomainEvent>,
    ) -> std::result::Result<(), AppendError>;

    /// 口座のすべてのイベントを読み込む
    ///
    /// 追加された順序でイベントを返す。
    async fn load(&self, aggregate_id: UserId) -> Result<Vec<DomainEvent>>;

    /// すべての口座のイベントをストリーム配信する
    ///
    /// Read Modelの再構築に使用される。イベントは挿入順に配信される。
    fn stream_all(&self) -> BoxStream<'_, Result<DomainEvent>>;
}
