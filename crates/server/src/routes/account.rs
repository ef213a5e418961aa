//! Account route handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::{AccountStore, PgAccountStore};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Current account view.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub balance: i64,
}

/// `GET /api/me` - the logged-in account with a freshly read balance.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MeResponse>> {
    let store = PgAccountStore::new(state.pool());
    let account = store
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_owned()))?;

    Ok(Json(MeResponse {
        username: account.username,
        balance: account.balance,
    }))
}
