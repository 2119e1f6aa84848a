use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use simple_bank::api::{
    BalanceResponse, ErrorResponse, LoanResponse, UserResponse, create_router, handlers::AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

// ============================================================================
// ヘルパー
// ============================================================================

fn create_app() -> Router {
    let state = Arc::new(AppState {
        service_deps: common::in_memory_deps(),
    });
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

// ============================================================================
// 正常系
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_app();

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_full_banking_session() {
    let app = create_app();

    // 1. ユーザー作成（balanceは無視される）
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"id": 101, "name": "Alice", "balance": 1000})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let alice: UserResponse = parse(&body);
    assert_eq!(alice.id, 101);
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.balance, Decimal::ZERO);

    // 2. 2人目のユーザー
    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"id": 102, "name": "Bob", "balance": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // 3. 残高照会（融資なし）
    let (status, body) = send(&app, "GET", "/users/101/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    let balance: BalanceResponse = parse(&body);
    assert_eq!(balance.user_id, 101);
    assert_eq!(balance.current_balance, Decimal::ZERO);
    assert!(balance.loan_details.is_none());

    // 4. 融資
    let (status, body) = send(&app, "POST", "/users/101/loan", Some(json!({"amount": 500}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let loan: LoanResponse = parse(&body);
    assert_eq!(loan.user_id, 101);
    assert_eq!(loan.amount, Decimal::from(500));

    // 5. 融資後の残高
    let (status, body) = send(&app, "GET", "/users/101/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    let balance: BalanceResponse = parse(&body);
    assert_eq!(balance.current_balance, Decimal::from(500));
    assert_eq!(
        balance.loan_details,
        Some(LoanResponse {
            user_id: 101,
            amount: Decimal::from(500),
        })
    );

    // 6. 出金
    let (status, body) = send(
        &app,
        "POST",
        "/users/101/transaction",
        Some(json!({"type": "debit", "amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: UserResponse = parse(&body);
    assert_eq!(updated.balance, Decimal::from(400));

    // 7. 別ユーザーの残高
    let (status, body) = send(&app, "GET", "/users/102/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    let balance: BalanceResponse = parse(&body);
    assert_eq!(balance.name, "Bob");
    assert_eq!(balance.current_balance, Decimal::ZERO);
    assert!(balance.loan_details.is_none());

    // 8. ユーザー一覧
    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let users: Vec<UserResponse> = parse(&body);
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, 101);
    assert_eq!(users[0].balance, Decimal::from(400));
    assert_eq!(users[1].id, 102);

    // 9. 融資一覧
    let (status, body) = send(&app, "GET", "/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    let loans: Vec<LoanResponse> = parse(&body);
    assert_eq!(
        loans,
        vec![LoanResponse {
            user_id: 101,
            amount: Decimal::from(500),
        }]
    );
}

#[tokio::test]
async fn test_balance_is_a_json_number() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 7, "name": "Carol"}))).await;
    send(
        &app,
        "POST",
        "/users/7/transaction",
        Some(json!({"type": "credit", "amount": 12.5})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/users/7/balance", None).await;
    let raw: Value = parse(&body);

    assert_eq!(raw["current_balance"].as_f64(), Some(12.5));
    assert!(raw["loan_details"].is_null());
}

#[tokio::test]
async fn test_empty_lists() {
    let app = create_app();

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Vec<UserResponse>>(&body).len(), 0);

    let (status, body) = send(&app, "GET", "/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Vec<LoanResponse>>(&body).len(), 0);
}

// ============================================================================
// 異常系
// ============================================================================

#[tokio::test]
async fn test_duplicate_user_is_rejected() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 101, "name": "Alice"}))).await;

    let (status, body) = send(&app, "POST", "/users", Some(json!({"id": 101, "name": "Eve"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_non_positive_user_id_is_rejected() {
    let app = create_app();

    let (status, body) = send(&app, "POST", "/users", Some(json!({"id": 0, "name": "Zero"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.error, "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_user_returns_not_found() {
    let app = create_app();

    let (status, body) = send(&app, "GET", "/users/999/balance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorResponse>(&body).error, "USER_NOT_FOUND");

    let (status, _) = send(
        &app,
        "POST",
        "/users/999/transaction",
        Some(json!({"type": "credit", "amount": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/users/999/loan", Some(json!({"amount": 10}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_positive_amounts_are_rejected() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 101, "name": "Alice"}))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/101/transaction",
        Some(json!({"type": "credit", "amount": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INVALID_INPUT");

    let (status, body) = send(&app, "POST", "/users/101/loan", Some(json!({"amount": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INVALID_INPUT");
}

#[tokio::test]
async fn test_overdraft_is_rejected() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 102, "name": "Bob"}))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/102/transaction",
        Some(json!({"type": "debit", "amount": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INSUFFICIENT_FUNDS");

    let (_, body) = send(&app, "GET", "/users/102/balance", None).await;
    assert_eq!(parse::<BalanceResponse>(&body).current_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_credit_overflowing_balance_is_rejected() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 1, "name": "Whale"}))).await;

    let (status, _) = send(
        &app,
        "POST",
        "/users/1/transaction",
        Some(json!({"type": "credit", "amount": 5e28})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/users/1/transaction",
        Some(json!({"type": "credit", "amount": 5e28})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INVALID_INPUT");

    let (status, body) = send(&app, "POST", "/users/1/loan", Some(json!({"amount": 5e28}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "INVALID_INPUT");

    // サーバーは応答し続け、残高は1回目の入金のまま
    let (status, body) = send(&app, "GET", "/users/1/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    let balance: BalanceResponse = parse(&body);
    assert_eq!(balance.current_balance, Decimal::from_scientific("5e28").unwrap());
    assert!(balance.loan_details.is_none());
}

#[tokio::test]
async fn test_second_loan_is_rejected() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 101, "name": "Alice"}))).await;
    send(&app, "POST", "/users/101/loan", Some(json!({"amount": 500}))).await;

    let (status, body) = send(&app, "POST", "/users/101/loan", Some(json!({"amount": 100}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(&body).error, "LOAN_ALREADY_ACTIVE");

    let (_, body) = send(&app, "GET", "/users/101/balance", None).await;
    assert_eq!(parse::<BalanceResponse>(&body).current_balance, Decimal::from(500));
}

#[tokio::test]
async fn test_malformed_requests_are_rejected() {
    let app = create_app();
    send(&app, "POST", "/users", Some(json!({"id": 101, "name": "Alice"}))).await;

    // 未知の取引種別
    let (status, _) = send(
        &app,
        "POST",
        "/users/101/transaction",
        Some(json!({"type": "refund", "amount": 10})),
    )
    .await;
    assert!(status.is_client_error());

    // 必須フィールドの欠落
    let (status, _) = send(&app, "POST", "/users", Some(json!({"name": "NoId"}))).await;
    assert!(status.is_client_error());

    // 数値でないパスパラメータ
    let (status, _) = send(&app, "GET", "/users/abc/balance", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 不正なJSONでも状態は変わらない
    let (_, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(parse::<Vec<UserResponse>>(&body).len(), 1);
}
