//! Domain models.

pub mod account;
pub mod session;

pub use account::Account;
pub use session::{CurrentUser, keys as session_keys};
