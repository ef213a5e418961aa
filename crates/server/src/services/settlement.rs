//! Balance settlement for completed report runs.
//!
//! The credit is applied only when the pipeline stored at least one
//! document, and only through the store's atomic credit update. A credit
//! failure is reported distinctly from a documents-not-saved failure:
//! the documents were stored, the account just was not paid.

use thiserror::Error;

use fieldowl_core::AccountId;

use crate::db::{AccountStore, RepositoryError};
use crate::services::reports::ReportOutcome;

/// Fixed amount credited for every successfully stored report.
pub const REPORT_CREDIT: i64 = 100;

/// Errors from settling a report run.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Neither document was persisted; no credit was applied.
    #[error("documents were not saved")]
    DocumentsNotSaved,

    /// Documents were stored but the balance update failed. Callers must
    /// surface this distinctly: the stored documents are a side effect
    /// that already happened.
    #[error("balance credit failed: {0}")]
    Credit(#[source] RepositoryError),
}

/// Apply the report credit if the pipeline succeeded.
///
/// Returns the new persisted balance.
///
/// # Errors
///
/// Returns [`SettlementError::DocumentsNotSaved`] when no document was
/// stored, and [`SettlementError::Credit`] when the store update fails.
pub async fn settle<S: AccountStore>(
    store: &S,
    account_id: AccountId,
    outcome: ReportOutcome,
) -> Result<i64, SettlementError> {
    if !outcome.any_stored() {
        return Err(SettlementError::DocumentsNotSaved);
    }

    store
        .credit_balance(account_id, REPORT_CREDIT)
        .await
        .map_err(SettlementError::Credit)
}
