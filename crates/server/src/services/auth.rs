//! Registration and login.
//!
//! Thin collaborator around the account store: hash a password, create
//! or look up an account. Passwords are hashed with argon2.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use crate::db::{AccountStore, RepositoryError};
use crate::models::account::Account;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already registered.
    #[error("username already exists")]
    UserAlreadyExists,

    /// Password or username fails validation.
    #[error("validation failed: {0}")]
    Invalid(String),

    /// Store error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Register a new account with the given starting balance.
///
/// # Errors
///
/// Returns `AuthError::Invalid` for a blank username or short password,
/// and `AuthError::UserAlreadyExists` for a taken username.
pub async fn register<S: AccountStore>(
    store: &S,
    username: &str,
    password: &str,
    initial_balance: i64,
) -> Result<Account, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::Invalid("username is required".to_owned()));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Invalid(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(password)?;

    store
        .insert_account(username, &password_hash, initial_balance)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })
}

/// Login with username and password.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` when the username is unknown
/// or the password does not verify.
pub async fn login<S: AccountStore>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<Account, AuthError> {
    let account = store
        .find_by_username(username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(password, &account.password_hash)?;

    Ok(account)
}

/// Hash a password with argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryAccountStore;

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryAccountStore::new();

        let account = register(&store, "inspector", "correct horse", 10_000)
            .await
            .expect("register");
        assert_eq!(account.username, "inspector");
        assert_eq!(account.balance, 10_000);

        let logged_in = login(&store, "inspector", "correct horse")
            .await
            .expect("login");
        assert_eq!(logged_in.id, account.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = MemoryAccountStore::new();
        register(&store, "inspector", "correct horse", 10_000)
            .await
            .expect("register");

        let result = login(&store, "inspector", "wrong horse").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let store = MemoryAccountStore::new();
        let result = login(&store, "nobody", "whatever").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryAccountStore::new();
        register(&store, "inspector", "correct horse", 10_000)
            .await
            .expect("register");

        let result = register(&store, "inspector", "another pass", 10_000).await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let store = MemoryAccountStore::new();
        let result = register(&store, "inspector", "short", 10_000).await;
        assert!(matches!(result, Err(AuthError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_short_password_message_states_minimum() {
        let store = MemoryAccountStore::new();
        let err = register(&store, "inspector", "short", 10_000)
            .await
            .expect_err("short password");
        let AuthError::Invalid(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains(&MIN_PASSWORD_LENGTH.to_string()));
    }
}
