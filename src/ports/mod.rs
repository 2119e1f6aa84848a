pub mod event_store;
pub mod loan_read_model;
pub mod user_read_model;

pub use event_store::{AppendError, EventStore};
pub use loan_read_model::{LoanReadModel, LoanView};
pub use user_read_model::{UserReadModel, UserView};
