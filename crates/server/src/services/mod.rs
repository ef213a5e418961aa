//! Business services.

pub mod auth;
pub mod checkout;
pub mod reports;
pub mod settlement;
