//! In-memory account store used by service-level tests.
//!
//! Mirrors the transactional semantics of the `PostgreSQL` store: a
//! checkout either applies the debit and records every order line, or
//! leaves the account untouched.

use std::sync::Mutex;

use fieldowl_core::AccountId;

use super::{AccountStore, OrderContact, OrderItem, RepositoryError};
use crate::models::account::Account;

/// One recorded order line.
#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub account_id: AccountId,
    pub product: String,
    pub price: i64,
    pub fullname: String,
    pub phone: String,
    pub postcode: String,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    accounts: Vec<Account>,
    orders: Vec<StoredOrder>,
    fail_order_insert: bool,
    fail_credit: bool,
}

/// In-memory test double for [`AccountStore`].
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: Mutex<Inner>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing registration.
    pub fn seed_account(&self, username: &str, balance: i64) -> AccountId {
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.next_id += 1;
        let id = AccountId::new(inner.next_id);
        inner.accounts.push(Account {
            id,
            username: username.to_owned(),
            password_hash: String::new(),
            balance,
        });
        id
    }

    /// Make the next order insert fail, simulating a store outage midway
    /// through a checkout.
    pub fn fail_order_inserts(&self) {
        self.inner.lock().expect("lock poisoned").fail_order_insert = true;
    }

    /// Make credit updates fail, simulating a store outage at settlement.
    pub fn fail_credits(&self) {
        self.inner.lock().expect("lock poisoned").fail_credit = true;
    }

    pub fn balance_of(&self, id: AccountId) -> i64 {
        let inner = self.inner.lock().expect("lock poisoned");
        inner
            .accounts
            .iter()
            .find(|a| a.id == id)
            .map_or(0, |a| a.balance)
    }

    pub fn orders(&self) -> Vec<StoredOrder> {
        self.inner.lock().expect("lock poisoned").orders.clone()
    }
}

fn simulated_outage() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::Protocol("simulated store outage".to_owned()))
}

impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_account(
        &self,
        username: &str,
        password_hash: &str,
        initial_balance: i64,
    ) -> Result<Account, RepositoryError> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        if inner.accounts.iter().any(|a| a.username == username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }
        inner.next_id += 1;
        let account = Account {
            id: AccountId::new(inner.next_id),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            balance: initial_balance,
        };
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn credit_balance(&self, id: AccountId, amount: i64) -> Result<i64, RepositoryError> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        if inner.fail_credit {
            return Err(simulated_outage());
        }
        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        account.balance += amount;
        Ok(account.balance)
    }

    async fn debit_and_record_orders(
        &self,
        id: AccountId,
        total: i64,
        contact: &OrderContact,
        items: &[OrderItem],
    ) -> Result<i64, RepositoryError> {
        let mut inner = self.inner.lock().expect("lock poisoned");

        let balance = inner
            .accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.balance)
            .ok_or(RepositoryError::NotFound)?;
        if balance < total {
            return Err(RepositoryError::InsufficientBalance);
        }
        if inner.fail_order_insert {
            // Transactional: the debit never becomes visible.
            return Err(simulated_outage());
        }

        for item in items {
            let order = StoredOrder {
                account_id: id,
                product: item.product.clone(),
                price: item.price,
                fullname: contact.fullname.clone(),
                phone: contact.phone.clone(),
                postcode: contact.postcode.clone(),
            };
            inner.orders.push(order);
        }

        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        account.balance -= total;
        Ok(account.balance)
    }
}
