//! Cart checkout.
//!
//! Single pass, no retries: validate the submission, then hand the debit
//! and the order inserts to the store as one transaction. Either the
//! balance drops by the cart total and every line is recorded, or nothing
//! changes.

use serde::Deserialize;
use thiserror::Error;

use fieldowl_core::AccountId;

use crate::db::{AccountStore, OrderContact, OrderItem, RepositoryError};

/// A cart submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub fullname: String,
    pub phone: String,
    pub postcode: String,
    pub cart: Vec<OrderItem>,
}

/// Errors from one checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required field is missing or invalid; nothing was mutated.
    #[error("validation failed: {0}")]
    Validation(&'static str),

    /// Cart total exceeds the account balance; nothing was mutated.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The store rejected the transaction; it was rolled back.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Execute a checkout for the given account.
///
/// Returns the new persisted balance.
///
/// # Errors
///
/// Returns [`CheckoutError::Validation`] for bad input,
/// [`CheckoutError::InsufficientFunds`] when the balance cannot cover the
/// cart, and [`CheckoutError::Store`] for persistence failures.
pub async fn checkout<S: AccountStore>(
    store: &S,
    account_id: AccountId,
    request: &CheckoutRequest,
) -> Result<i64, CheckoutError> {
    let contact = validate(request)?;
    let total = cart_total(&request.cart)?;

    store
        .debit_and_record_orders(account_id, total, &contact, &request.cart)
        .await
        .map_err(|e| match e {
            RepositoryError::InsufficientBalance => CheckoutError::InsufficientFunds,
            other => CheckoutError::Store(other),
        })
}

/// Fail fast on blank contact fields or an empty cart.
fn validate(request: &CheckoutRequest) -> Result<OrderContact, CheckoutError> {
    let fullname = request.fullname.trim();
    let phone = request.phone.trim();
    let postcode = request.postcode.trim();

    if fullname.is_empty() {
        return Err(CheckoutError::Validation("fullname is required"));
    }
    if phone.is_empty() {
        return Err(CheckoutError::Validation("phone is required"));
    }
    if postcode.is_empty() {
        return Err(CheckoutError::Validation("postcode is required"));
    }
    if request.cart.is_empty() {
        return Err(CheckoutError::Validation("cart is empty"));
    }

    Ok(OrderContact {
        fullname: fullname.to_owned(),
        phone: phone.to_owned(),
        postcode: postcode.to_owned(),
    })
}

/// Sum item prices, rejecting negative prices and overflow.
fn cart_total(cart: &[OrderItem]) -> Result<i64, CheckoutError> {
    let mut total: i64 = 0;
    for item in cart {
        if item.price < 0 {
            return Err(CheckoutError::Validation("item price must not be negative"));
        }
        total = total
            .checked_add(item.price)
            .ok_or(CheckoutError::Validation("cart total overflows"))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryAccountStore;

    fn request(cart: Vec<OrderItem>) -> CheckoutRequest {
        CheckoutRequest {
            fullname: "Alex Petrov".to_string(),
            phone: "+7 900 000-00-00".to_string(),
            postcode: "190000".to_string(),
            cart,
        }
    }

    fn item(product: &str, price: i64) -> OrderItem {
        OrderItem {
            product: product.to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn test_successful_checkout_debits_and_records_orders() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 1000);
        let req = request(vec![item("binoculars", 300), item("notebook", 150)]);

        let new_balance = checkout(&store, id, &req).await.expect("checkout");
        assert_eq!(new_balance, 550);
        assert_eq!(store.balance_of(id), 550);

        let orders = store.orders();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].product, "binoculars");
        assert_eq!(orders[0].price, 300);
        assert_eq!(orders[1].product, "notebook");
        assert_eq!(orders[1].price, 150);
        for order in &orders {
            assert_eq!(order.account_id, id);
            assert_eq!(order.fullname, "Alex Petrov");
            assert_eq!(order.phone, "+7 900 000-00-00");
            assert_eq!(order.postcode, "190000");
        }
    }

    #[tokio::test]
    async fn test_insufficient_funds_mutates_nothing() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 100);
        let req = request(vec![item("binoculars", 300)]);

        let result = checkout(&store, id, &req).await;
        assert!(matches!(result, Err(CheckoutError::InsufficientFunds)));
        assert_eq!(store.balance_of(id), 100);
        assert!(store.orders().is_empty());
    }

    #[tokio::test]
    async fn test_exact_balance_is_spendable() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 450);
        let req = request(vec![item("binoculars", 300), item("notebook", 150)]);

        let new_balance = checkout(&store, id, &req).await.expect("checkout");
        assert_eq!(new_balance, 0);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_debit() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 1000);
        store.fail_order_inserts();
        let req = request(vec![item("binoculars", 300)]);

        let result = checkout(&store, id, &req).await;
        assert!(matches!(result, Err(CheckoutError::Store(_))));
        assert_eq!(store.balance_of(id), 1000);
        assert!(store.orders().is_empty());
    }

    #[tokio::test]
    async fn test_blank_fields_fail_fast() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 1000);

        let mut req = request(vec![item("binoculars", 300)]);
        req.phone = "   ".to_string();

        let result = checkout(&store, id, &req).await;
        assert!(matches!(result, Err(CheckoutError::Validation(_))));
        assert_eq!(store.balance_of(id), 1000);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 1000);

        let result = checkout(&store, id, &request(vec![])).await;
        assert!(matches!(result, Err(CheckoutError::Validation(_))));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let store = MemoryAccountStore::new();
        let id = store.seed_account("buyer", 1000);

        let result = checkout(&store, id, &request(vec![item("refund trick", -50)])).await;
        assert!(matches!(result, Err(CheckoutError::Validation(_))));
        assert_eq!(store.balance_of(id), 1000);
    }
}
