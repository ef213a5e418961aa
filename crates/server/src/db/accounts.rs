//! `PostgreSQL` implementation of the account store.

use sqlx::PgPool;

use fieldowl_core::AccountId;

use super::{AccountStore, OrderContact, OrderItem, RepositoryError};
use crate::models::account::Account;

/// Account store backed by the `account` and `shop_order` tables.
pub struct PgAccountStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgAccountStore<'a> {
    /// Create a new store over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl AccountStore for PgAccountStore<'_> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, password_hash, balance FROM account WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, password_hash, balance FROM account WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    async fn insert_account(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: i64,
    ) -> Result<Account, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO account (username, password_hash, balance) \
             VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, balance",
        )
        .bind(username)
        .bind(password_hash)
        .bind(initial_balance)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(account)
    }

    async fn credit_balance(&self, id: AccountId, amount: i64) -> Result<i64, RepositoryError> {
        let new_balance = sqlx::query_scalar::<_, i64>(
            "UPDATE account SET balance = balance + $1 WHERE id = $2 RETURNING balance",
        )
        .bind(amount)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(new_balance)
    }

    async fn debit_and_record_orders(
        &self,
        id: AccountId,
        total: i64,
        contact: &OrderContact,
        items: &[OrderItem],
    ) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Conditional debit: matches no row when the balance is too low,
        // which also serializes concurrent checkouts for the same account.
        let new_balance = sqlx::query_scalar::<_, i64>(
            "UPDATE account SET balance = balance - $1 \
             WHERE id = $2 AND balance >= $1 \
             RETURNING balance",
        )
        .bind(total)
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(new_balance) = new_balance else {
            // Dropping the transaction rolls it back; nothing was written.
            return Err(RepositoryError::InsufficientBalance);
        };

        for item in items {
            sqlx::query(
                "INSERT INTO shop_order (account_id, product, price, fullname, phone, postcode) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(id.as_i64())
            .bind(&item.product)
            .bind(item.price)
            .bind(&contact.fullname)
            .bind(&contact.phone)
            .bind(&contact.postcode)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(new_balance)
    }
}
