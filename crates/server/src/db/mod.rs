//! Account store boundary and its `PostgreSQL` implementation.
//!
//! The store is the only place account balance is mutated. Credits and
//! debits go through atomic conditional updates so two concurrent requests
//! for the same account can neither overspend nor lose a credit.
//!
//! # Tables
//!
//! - `account` - credentials and balance
//! - `shop_order` - one append-only row per purchased cart line
//! - `tower_sessions.session` - session storage (created by the session
//!   store itself)
//!
//! Migrations live in `crates/server/migrations/` and run on startup.

pub mod accounts;
#[cfg(test)]
pub mod memory;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use fieldowl_core::AccountId;

use crate::models::account::Account;

pub use accounts::PgAccountStore;

/// Errors from account store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Conditional debit matched no row: the balance is below the
    /// requested amount.
    #[error("insufficient balance")]
    InsufficientBalance,
}

/// Contact details recorded on every order row of one checkout.
#[derive(Debug, Clone)]
pub struct OrderContact {
    pub fullname: String,
    pub phone: String,
    pub postcode: String,
}

/// One purchased cart line.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OrderItem {
    pub product: String,
    pub price: i64,
}

/// Persistence boundary for accounts and orders.
///
/// Production code uses [`PgAccountStore`]; tests use the in-memory
/// implementation in [`memory`].
pub trait AccountStore {
    /// Look up an account by username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Look up an account by ID.
    fn find_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Insert a new account with the given starting balance.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    fn insert_account(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: i64,
    ) -> impl Future<Output = Result<Account, RepositoryError>> + Send;

    /// Atomically add `amount` to the account balance.
    ///
    /// Returns the new balance, or `RepositoryError::NotFound` if the
    /// account does not exist.
    fn credit_balance(
        &self,
        id: AccountId,
        amount: i64,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    /// Atomically debit `total` and record one order row per item, all in
    /// a single transaction.
    ///
    /// The debit is conditional on `balance >= total`; when it does not
    /// hold, nothing is mutated and `RepositoryError::InsufficientBalance`
    /// is returned. A failed insert rolls the debit back.
    ///
    /// Returns the new balance.
    fn debit_and_record_orders(
        &self,
        id: AccountId,
        total: i64,
        contact: &OrderContact,
        items: &[OrderItem],
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
