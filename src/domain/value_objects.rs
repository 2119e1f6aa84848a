use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ユーザーID - 口座集約のID
///
/// 不変条件：1以上の整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

/// ユーザーIDのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user id must be >= 1, got {0}")]
pub struct InvalidUserId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Result<Self, InvalidUserId> {
        if value < 1 {
            return Err(InvalidUserId(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 金額のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAmount {
    /// 0以下の金額
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),
    /// 負の残高
    #[error("balance cannot be negative, got {0}")]
    Negative(Decimal),
}

/// 取引金額・融資金額
///
/// 不変条件：0より大きい
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, InvalidAmount> {
        if value <= Decimal::ZERO {
            return Err(InvalidAmount::NotPositive(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = InvalidAmount;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// 口座残高
///
/// 不変条件：0以上（当座貸越なし）
/// 減算は`checked_debit`経由でのみ行い、負の残高を型で排除する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn new(value: Decimal) -> Result<Self, InvalidAmount> {
        if value < Decimal::ZERO {
            return Err(InvalidAmount::Negative(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// 入金後の残高
    ///
    /// Decimalの表現範囲を超える場合は`None`を返す
    pub fn checked_credit(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.value()).map(Self)
    }

    /// 出金後の残高
    ///
    /// 残高不足の場合は`None`を返す
    pub fn checked_debit(self, amount: Amount) -> Option<Self> {
        if self.0 < amount.value() {
            return None;
        }
        Some(Self(self.0 - amount.value()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Money {
    type Error = InvalidAmount;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// 取引種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// 出金
    Debit,
    /// 入金
    Credit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
        }
    }
}
