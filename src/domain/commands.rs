use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, TransactionKind, UserId};

/// コマンド：ユーザーを作成する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUser {
    pub user_id: UserId,
    pub name: String,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：取引を記帳する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTransaction {
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub posted_at: DateTime<Utc>,
}

/// コマンド：融資を受ける
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeLoan {
    pub user_id: UserId,
    pub amount: Amount,
    pub requested_at: DateTime<Utc>,
}
