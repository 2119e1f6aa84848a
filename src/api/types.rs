use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::account::AccountApplicationError;
use crate::domain::{
    account::{Account, Loan},
    commands::{CreateUser, PostTransaction, TakeLoan},
    value_objects::{Amount, TransactionKind, UserId},
};
use crate::ports::{LoanView, UserView};

/// ユーザー作成リクエスト（POST /users）
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub id: i64,
    pub name: String,
    /// 既存クライアントとの互換のため受け付けるだけで、読まない。
    /// 新規ユーザーの残高は常に0。
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl CreateUserRequest {
    pub fn to_command(self) -> Result<CreateUser, AccountApplicationError> {
        Ok(CreateUser {
            user_id: parse_user_id(self.id)?,
            name: self.name,
            requested_at: Utc::now(),
        })
    }
}

/// 取引リクエスト（POST /users/:id/transaction）
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
}

impl TransactionRequest {
    pub fn to_command(self, user_id: UserId) -> Result<PostTransaction, AccountApplicationError> {
        Ok(PostTransaction {
            user_id,
            kind: self.kind,
            amount: parse_amount(self.amount, "Transaction amount")?,
            posted_at: Utc::now(),
        })
    }
}

/// 融資リクエスト（POST /users/:id/loan）
#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub amount: Decimal,
}

impl LoanRequest {
    pub fn to_command(self, user_id: UserId) -> Result<TakeLoan, AccountApplicationError> {
        Ok(TakeLoan {
            user_id,
            amount: parse_amount(self.amount, "Loan amount")?,
            requested_at: Utc::now(),
        })
    }
}

/// ユーザーレスポンス（POST /users、POST /users/:id/transaction、GET /users）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.user_id.value(),
            name: account.name.clone(),
            balance: account.balance.value(),
        }
    }
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            id: view.user_id.value(),
            name: view.name,
            balance: view.balance.value(),
        }
    }
}

/// 融資レスポンス（POST /users/:id/loan、GET /loans）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResponse {
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            user_id: loan.user_id.value(),
            amount: loan.amount.value(),
        }
    }
}

impl From<LoanView> for LoanResponse {
    fn from(view: LoanView) -> Self {
        Self {
            user_id: view.user_id.value(),
            amount: view.amount.value(),
        }
    }
}

/// 残高照会レスポンス（GET /users/:id/balance）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub user_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_balance: Decimal,
    pub loan_details: Option<LoanResponse>,
}

impl From<&Account> for BalanceResponse {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.user_id.value(),
            name: account.name.clone(),
            current_balance: account.balance.value(),
            loan_details: account.loan.clone().map(LoanResponse::from),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// パスやボディのユーザーIDを検証する
pub fn parse_user_id(raw: i64) -> Result<UserId, AccountApplicationError> {
    UserId::new(raw).map_err(|e| AccountApplicationError::InvalidInput(e.to_string()))
}

fn parse_amount(raw: Decimal, label: &str) -> Result<Amount, AccountApplicationError> {
    Amount::new(raw)
        .map_err(|_| AccountApplicationError::InvalidInput(format!("{} must be positive.", label)))
}
