use simple_bank::{
    adapters::memory::{InMemoryEventStore, InMemoryLoanReadModel, InMemoryUserReadModel},
    adapters::postgres::{PostgresEventStore, PostgresLoanReadModel, PostgresUserReadModel},
    api::{handlers::AppState, router::create_router},
    application::account::{ServiceDependencies, rebuild_read_models},
    config::{AppConfig, StorageBackend},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_bank=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Initialize adapters
    let service_deps = match &config.storage {
        StorageBackend::InMemory => {
            tracing::info!("Using in-memory storage");
            ServiceDependencies {
                event_store: Arc::new(InMemoryEventStore::new()),
                user_read_model: Arc::new(InMemoryUserReadModel::new()),
                loan_read_model: Arc::new(InMemoryLoanReadModel::new()),
            }
        }
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            tracing::info!("Using PostgreSQL storage ({} connections)", max_connections);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            ServiceDependencies {
                event_store: Arc::new(PostgresEventStore::new(pool.clone())),
                user_read_model: Arc::new(PostgresUserReadModel::new(pool.clone())),
                loan_read_model: Arc::new(PostgresLoanReadModel::new(pool)),
            }
        }
    };

    if config.rebuild_read_models {
        let projected = rebuild_read_models(&service_deps)
            .await
            .expect("Failed to rebuild read models");
        tracing::info!("Rebuilt read models for {} accounts", projected);
    }

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
