pub mod event_store;
pub mod loan_read_model;
pub mod user_read_model;

pub use event_store::EventStore as InMemoryEventStore;
pub use loan_read_model::LoanReadModel as InMemoryLoanReadModel;
pub use user_read_model::UserReadModel as InMemoryUserReadModel;
