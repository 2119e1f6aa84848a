mod account_service;
mod errors;
mod projection;

pub use account_service::{
    ServiceDependencies, create_user, get_account, post_transaction, take_loan,
};
pub use errors::{AccountApplicationError, Result};
pub use projection::rebuild_read_models;
