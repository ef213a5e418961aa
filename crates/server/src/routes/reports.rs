//! Report generation route handler.
//!
//! Accepts the multipart inspection form, runs the document pipeline, and
//! settles the credit against the account store.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::db::PgAccountStore;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::reports::ReportInput;
use crate::services::{reports, settlement};
use crate::state::AppState;

/// Successful report response.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub new_balance: i64,
}

/// `POST /api/generate_report` - multipart form with `date`, `time`,
/// `address`, `state`, `name`, and repeated `photos` file parts.
pub async fn generate_report(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    multipart: Multipart,
) -> Result<Json<ReportResponse>> {
    let input = parse_form(multipart).await?;

    let outcome = reports::generate(state.renderer(), state.uploader(), &input)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let store = PgAccountStore::new(state.pool());
    let new_balance = settlement::settle(&store, user.id, outcome).await?;

    tracing::info!(
        account_id = %user.id,
        act_stored = outcome.act_stored,
        protocol_stored = outcome.protocol_stored,
        "report settled"
    );

    Ok(Json(ReportResponse {
        success: true,
        message: "Documents stored".to_owned(),
        new_balance,
    }))
}

/// Collect the multipart fields into a [`ReportInput`].
async fn parse_form(mut multipart: Multipart) -> Result<ReportInput> {
    let mut input = ReportInput {
        date: String::new(),
        time: String::new(),
        address: String::new(),
        condition: String::new(),
        name: String::new(),
        photos: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let Some(field_name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "photos" => {
                // Skip empty file inputs, matching browser form behavior
                if field.file_name().is_some_and(|f| !f.is_empty()) {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("invalid photo upload: {e}")))?;
                    input.photos.push(bytes.to_vec());
                }
            }
            name => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid field {name}: {e}")))?;
                match name {
                    "date" => input.date = value,
                    "time" => input.time = value,
                    "address" => input.address = value,
                    "state" => input.condition = value,
                    "name" => input.name = value,
                    other => {
                        tracing::debug!(field = other, "ignoring unknown form field");
                    }
                }
            }
        }
    }

    Ok(input)
}
