#![allow(dead_code)]

use simple_bank::adapters::memory::{
    InMemoryEventStore, InMemoryLoanReadModel, InMemoryUserReadModel,
};
use simple_bank::application::account::ServiceDependencies;
use sqlx::PgPool;
use std::sync::Arc;

/// インメモリアダプターで依存関係を構築する
pub fn in_memory_deps() -> ServiceDependencies {
    ServiceDependencies {
        event_store: Arc::new(InMemoryEventStore::new()),
        user_read_model: Arc::new(InMemoryUserReadModel::new()),
        loan_read_model: Arc::new(InMemoryLoanReadModel::new()),
    }
}

/// テスト用データベースプールを作成し、マイグレーションを実行
///
/// DATABASE_URL環境変数が未設定の場合は`None`を返し、
/// 呼び出し側のテストはスキップする。
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        }
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // sqlx migrateでマイグレーションを実行（本番と同じ方法）
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}
