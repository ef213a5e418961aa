//! Session-related types.
//!
//! The session stores only the user's identity. Balance is deliberately
//! not cached here: every handler that reports a balance reads it fresh
//! from the store, so the session can never show a balance the store does
//! not have.

use serde::{Deserialize, Serialize};

use fieldowl_core::AccountId;

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's username.
    pub username: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
