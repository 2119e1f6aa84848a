use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_user, get_balance, list_loans, list_users, post_transaction, take_loan,
};

/// Creates the API router with all banking endpoints
///
/// Command endpoints (Write operations):
/// - POST /users - Create a user
/// - POST /users/:id/transaction - Post a debit or credit
/// - POST /users/:id/loan - Take a loan
///
/// Query endpoints (Read operations):
/// - GET /users - List users
/// - GET /users/:id/balance - Balance with loan details
/// - GET /loans - List loans
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id/balance", get(get_balance))
        .route("/users/:id/transaction", post(post_transaction))
        .route("/users/:id/loan", post(take_loan))
        .route("/loans", get(list_loans))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
