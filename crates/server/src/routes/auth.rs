//! Authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::db::PgAccountStore;
use crate::error::Result;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub balance: i64,
}

/// `POST /api/register` - create a new account with the configured
/// starting balance.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>> {
    let store = PgAccountStore::new(state.pool());
    services::auth::register(
        &store,
        &request.username,
        &request.password,
        state.config().initial_balance,
    )
    .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// `POST /api/login` - verify credentials and establish a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let store = PgAccountStore::new(state.pool());
    let account = services::auth::login(&store, &request.username, &request.password).await?;

    set_current_user(
        &session,
        &CurrentUser {
            id: account.id,
            username: account.username.clone(),
        },
    )
    .await?;

    tracing::info!(account_id = %account.id, "login");

    Ok(Json(LoginResponse {
        success: true,
        username: account.username,
        balance: account.balance,
    }))
}

/// `POST /api/logout` - clear the session.
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_user(&session).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
