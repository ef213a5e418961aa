//! Account model.

use fieldowl_core::AccountId;

/// A registered account.
///
/// `balance` is a non-negative integer amount of internal currency. The
/// store enforces the invariant; this struct is a plain read model.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub password_hash: String,
    pub balance: i64,
}
