use crate::domain::value_objects::{Amount, Money, UserId};
use thiserror::Error;

/// 口座管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum AccountApplicationError {
    /// ユーザーが存在しない
    #[error("User with ID {0} not found")]
    UserNotFound(UserId),

    /// ユーザーIDが既に使われている
    #[error("User with ID {0} already exists")]
    UserAlreadyExists(UserId),

    /// 出金額が残高を超えている
    #[error("Insufficient funds for debit")]
    InsufficientFunds { balance: Money, requested: Amount },

    /// 既に融資を受けている
    #[error("User {0} already has an active loan")]
    LoanAlreadyActive(UserId),

    /// リクエスト値が不正
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 楽観的ロックの再試行上限に達した
    #[error("Concurrent update on user {0}, retries exhausted")]
    ConcurrencyConflict(UserId),

    /// 永続化されたイベント列が不正
    #[error("Corrupted event history")]
    CorruptedHistory(#[source] crate::domain::ReplayError),

    /// EventStoreのエラー
    #[error("Event store error")]
    EventStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ReadModelのエラー
    #[error("Read model error")]
    ReadModelError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, AccountApplicationError>;
