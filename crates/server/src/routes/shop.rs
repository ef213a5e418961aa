//! Cart checkout route handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::PgAccountStore;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::checkout::{self, CheckoutRequest};
use crate::state::AppState;

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub new_balance: i64,
}

/// `POST /api/save_cart` - JSON body `{ fullname, phone, postcode,
/// cart: [{ product, price }] }`.
pub async fn save_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let store = PgAccountStore::new(state.pool());
    let new_balance = checkout::checkout(&store, user.id, &request).await?;

    tracing::info!(
        account_id = %user.id,
        items = request.cart.len(),
        "checkout completed"
    );

    Ok(Json(CheckoutResponse {
        success: true,
        new_balance,
    }))
}
