//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health               - Liveness check
//! GET  /health/ready         - Readiness check (verifies database)
//!
//! # Auth
//! POST /api/register         - Create an account
//! POST /api/login            - Login, establishes a session
//! POST /api/logout           - Logout
//! GET  /api/me               - Current account with fresh balance
//!
//! # Reports
//! POST /api/generate_report  - Multipart: render, store, and settle
//!
//! # Shop
//! POST /api/save_cart        - JSON cart checkout
//! ```

pub mod account;
pub mod auth;
pub mod reports;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(account::me))
        .route("/api/generate_report", post(reports::generate_report))
        .route("/api/save_cart", post(shop::save_cart))
}
