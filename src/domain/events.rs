use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, Money, TransactionKind, UserId};

/// イベント：ユーザーが登録された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user_id: UserId,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

/// イベント：取引が記帳された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPosted {
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub balance_after: Money,
    pub posted_at: DateTime<Utc>,
}

/// イベント：融資が実行された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanGranted {
    pub user_id: UserId,
    pub amount: Amount,
    pub granted_at: DateTime<Utc>,
}

/// ドメインイベント統合型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainEvent {
    UserRegistered(UserRegistered),
    TransactionPosted(TransactionPosted),
    LoanGranted(LoanGranted),
}

impl DomainEvent {
    /// イベントが属する口座集約のID
    pub fn user_id(&self) -> UserId {
        match self {
            DomainEvent::UserRegistered(e) => e.user_id,
            DomainEvent::TransactionPosted(e) => e.user_id,
            DomainEvent::LoanGranted(e) => e.user_id,
        }
    }

    /// イベントの発生時刻
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::UserRegistered(e) => e.registered_at,
            DomainEvent::TransactionPosted(e) => e.posted_at,
            DomainEvent::LoanGranted(e) => e.granted_at,
        }
    }

    /// イベント種別の識別子（永続化用）
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::UserRegistered(_) => "UserRegistered",
            DomainEvent::TransactionPosted(_) => "TransactionPosted",
            DomainEvent::LoanGranted(_) => "LoanGranted",
        }
    }
}
