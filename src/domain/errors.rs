use super::{Amount, Money, UserId};

/// 取引のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// 残高不足
    InsufficientFunds { balance: Money, requested: Amount },
    /// 入金後の残高が表現範囲を超える
    BalanceOverflow { balance: Money, requested: Amount },
}

/// 融資のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    /// 既に融資を受けている
    LoanAlreadyActive,
    /// 融資額の入金で残高が表現範囲を超える
    BalanceOverflow { balance: Money, requested: Amount },
}

/// イベント再生のエラー
///
/// 永続化されたイベント列が口座の不変条件を満たさない場合に返される。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("event for user {0} appeared before UserRegistered")]
    NotRegistered(UserId),

    #[error("user {0} registered twice")]
    AlreadyRegistered(UserId),

    #[error("event for user {event} applied to account {account}")]
    ForeignEvent { account: UserId, event: UserId },

    #[error("debit of {requested:?} exceeds balance {balance:?} for user {user_id}")]
    NegativeBalance {
        user_id: UserId,
        balance: Money,
        requested: Amount,
    },

    #[error("credit of {requested:?} overflows balance {balance:?} for user {user_id}")]
    BalanceOverflow {
        user_id: UserId,
        balance: Money,
        requested: Amount,
    },

    #[error("user {0} granted a second loan")]
    DuplicateLoan(UserId),
}
