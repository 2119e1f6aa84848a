use crate::application::account::AccountApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(AccountApplicationError);

impl From<AccountApplicationError> for ApiError {
    fn from(err: AccountApplicationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();

        let (status, error_type, message) = match self.0 {
            // 400 Bad Request - 入力不正・ビジネスルール違反
            AccountApplicationError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
            }
            AccountApplicationError::UserAlreadyExists(_) => {
                (StatusCode::BAD_REQUEST, "USER_ALREADY_EXISTS", message)
            }
            AccountApplicationError::InsufficientFunds { .. } => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS", message)
            }
            AccountApplicationError::LoanAlreadyActive(_) => {
                (StatusCode::BAD_REQUEST, "LOAN_ALREADY_ACTIVE", message)
            }

            // 404 Not Found - リクエストされたリソースが存在しない
            AccountApplicationError::UserNotFound(_) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", message)
            }

            // 409 Conflict - 同時更新の再試行上限
            AccountApplicationError::ConcurrencyConflict(_) => {
                (StatusCode::CONFLICT, "CONCURRENCY_CONFLICT", message)
            }

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            AccountApplicationError::CorruptedHistory(ref e) => {
                tracing::error!("Corrupted event history: {}", e);
                internal_error()
            }
            AccountApplicationError::EventStoreError(ref e) => {
                tracing::error!("Event store error: {}", e);
                internal_error()
            }
            AccountApplicationError::ReadModelError(ref e) => {
                tracing::error!("Read model error: {}", e);
                internal_error()
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An unexpected error occurred".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserId;

    fn status_of(err: AccountApplicationError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_business_rule_violations_are_bad_request() {
        let id = UserId::new(101).unwrap();
        assert_eq!(
            status_of(AccountApplicationError::UserAlreadyExists(id)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AccountApplicationError::LoanAlreadyActive(id)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AccountApplicationError::InvalidInput("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_user_is_not_found() {
        let id = UserId::new(404).unwrap();
        assert_eq!(
            status_of(AccountApplicationError::UserNotFound(id)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_exhausted_retries_are_conflict() {
        let id = UserId::new(1).unwrap();
        assert_eq!(
            status_of(AccountApplicationError::ConcurrencyConflict(id)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_storage_failures_are_internal() {
        assert_eq!(
            status_of(AccountApplicationError::EventStoreError("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
