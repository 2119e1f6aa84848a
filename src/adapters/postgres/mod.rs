pub mod event_store;
pub mod loan_read_model;
pub mod user_read_model;

// パブリックに型を再エクスポート
pub use event_store::EventStore as PostgresEventStore;
pub use loan_read_model::LoanReadModel as PostgresLoanReadModel;
pub use user_read_model::UserReadModel as PostgresUserReadModel;

/// 行データの変換エラーをポートのエラー型に包む
fn invalid_data(err: impl ToString) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        err.to_string(),
    ))
}
