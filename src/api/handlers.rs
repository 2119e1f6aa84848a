use crate::application::account::{
    AccountApplicationError, ServiceDependencies, create_user as execute_create_user,
    get_account as execute_get_account, post_transaction as execute_post_transaction,
    take_loan as execute_take_loan,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        BalanceResponse, CreateUserRequest, LoanRequest, LoanResponse, TransactionRequest,
        UserResponse, parse_user_id,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /users - 新しいユーザーを作成
///
/// 強制されるビジネスルール:
/// - ユーザーIDが1以上であること
/// - ユーザーIDが未使用であること
/// - 残高は0で開始する（リクエストのbalanceは無視）
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let cmd = req.to_command()?;

    let account = execute_create_user(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&account))))
}

/// POST /users/:id/transaction - 取引を記帳
///
/// 強制されるビジネスルール:
/// - ユーザーが存在すること
/// - 金額が正であること
/// - 出金は残高以内であること
pub async fn post_transaction(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<TransactionRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let cmd = req.to_command(parse_user_id(user_id)?)?;

    let account = execute_post_transaction(&state.service_deps, cmd).await?;

    Ok(Json(UserResponse::from(&account)))
}

/// POST /users/:id/loan - 融資を実行
///
/// 強制されるビジネスルール:
/// - ユーザーが存在すること
/// - 金額が正であること
/// - 融資中でないこと（1ユーザー1件まで）
///
/// 融資額は残高に入金される。
pub async fn take_loan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<LoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let cmd = req.to_command(parse_user_id(user_id)?)?;

    let loan = execute_take_loan(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /users/:id/balance - 残高と融資情報を取得
///
/// イベント列から復元した口座を返すため、残高と融資情報は常に一致する。
/// 融資がない場合は`loan_details`がnullになる。
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user_id = parse_user_id(user_id)?;

    let account = execute_get_account(&state.service_deps, user_id).await?;

    Ok(Json(BalanceResponse::from(&account)))
}

/// GET /users - 全ユーザーをID順に取得
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .service_deps
        .user_read_model
        .list_all()
        .await
        .map_err(AccountApplicationError::ReadModelError)?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /loans - 全融資をユーザーID順に取得
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = state
        .service_deps
        .loan_read_model
        .list_all()
        .await
        .map_err(AccountApplicationError::ReadModelError)?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}
