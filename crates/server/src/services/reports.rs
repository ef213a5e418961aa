//! Document generation pipeline.
//!
//! One report request produces two independent render-and-upload attempts
//! (act and protocol) from a shared field set and photo list. A failure in
//! either attempt never blocks the other, and every temporary artifact is
//! removed when the run finishes, whatever the outcome.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use thiserror::Error;

use fieldowl_core::ReportKind;

use crate::render::{DocumentRenderer, ReportFields, document_filename};
use crate::storage::{RemoteStore, StorageUploader};

/// Placeholder used when the submitted name is blank.
const UNTITLED: &str = "Untitled";
/// Placeholder used when the submitted date is blank and unparseable.
const UNDATED: &str = "Undated";

/// One inspection record as submitted, before normalization.
#[derive(Debug, Clone)]
pub struct ReportInput {
    /// Inspection date, expected as `YYYY-MM-DD`.
    pub date: String,
    /// Inspection start time, expected as `HH:MM`.
    pub time: String,
    pub address: String,
    pub condition: String,
    pub name: String,
    /// Uploaded photo contents, in submission order.
    pub photos: Vec<Vec<u8>>,
}

/// Per-kind storage outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub act_stored: bool,
    pub protocol_stored: bool,
}

impl ReportOutcome {
    /// Pipeline-level success: at least one document persisted.
    #[must_use]
    pub const fn any_stored(&self) -> bool {
        self.act_stored || self.protocol_stored
    }

    fn mark(&mut self, kind: ReportKind, stored: bool) {
        match kind {
            ReportKind::Act => self.act_stored = stored,
            ReportKind::Protocol => self.protocol_stored = stored,
        }
    }
}

/// Errors fatal to the whole pipeline run.
///
/// Only request-scoped staging failures land here; render and upload
/// failures are per-kind and reflected in [`ReportOutcome`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Temporary workspace could not be created or written.
    #[error("temporary storage error: {0}")]
    TempStorage(#[from] std::io::Error),
}

/// Run the full pipeline for one inspection record.
///
/// # Errors
///
/// Returns [`PipelineError`] only when the per-request temporary workspace
/// cannot be set up; all later failures are absorbed into the outcome.
pub async fn generate<R: DocumentRenderer, T: RemoteStore>(
    renderer: &R,
    uploader: &StorageUploader<T>,
    input: &ReportInput,
) -> Result<ReportOutcome, PipelineError> {
    let fields = normalize(input);

    // Per-request temp dir: concurrent requests never share a namespace.
    let workdir = tempfile::tempdir()?;
    let mut temp_files: Vec<PathBuf> = Vec::new();

    // Stage photos with index-based names; the ordered list is shared by
    // both renders.
    let mut photo_paths = Vec::with_capacity(input.photos.len());
    for (index, photo) in input.photos.iter().enumerate() {
        let path = workdir.path().join(format!("photo_{index:02}.jpg"));
        tokio::fs::write(&path, photo).await?;
        photo_paths.push(path.clone());
        temp_files.push(path);
    }

    let mut outcome = ReportOutcome {
        act_stored: false,
        protocol_stored: false,
    };

    for kind in ReportKind::ALL {
        match renderer.render(kind, &fields, &photo_paths) {
            Ok(bytes) => {
                let filename = document_filename(kind, &fields, renderer.extension());
                let document_path = workdir.path().join(&filename);
                match tokio::fs::write(&document_path, &bytes).await {
                    Ok(()) => {
                        temp_files.push(document_path.clone());
                        let stored = uploader.upload(&document_path, &filename).await;
                        outcome.mark(kind, stored);
                    }
                    Err(error) => {
                        tracing::warn!(%kind, %error, "failed to stage rendered document");
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%kind, %error, "document render failed");
            }
        }
    }

    cleanup(temp_files, workdir).await;

    Ok(outcome)
}

/// Remove every temporary artifact, best-effort.
async fn cleanup(temp_files: Vec<PathBuf>, workdir: tempfile::TempDir) {
    for path in temp_files {
        if let Err(error) = tokio::fs::remove_file(&path).await {
            tracing::debug!(path = %path.display(), %error, "temp file cleanup skipped");
        }
    }
    if let Err(error) = workdir.close() {
        tracing::debug!(%error, "temp dir cleanup skipped");
    }
}

/// Normalize the raw submission into the shared template fields.
fn normalize(input: &ReportInput) -> ReportFields {
    let name = input.name.trim();
    ReportFields {
        date: normalize_date(&input.date),
        time: input.time.clone(),
        time_plus_hour: shift_time(&input.time),
        address: input.address.clone(),
        condition: input.condition.clone(),
        name: if name.is_empty() {
            UNTITLED.to_string()
        } else {
            name.to_string()
        },
    }
}

/// Convert `YYYY-MM-DD` to `dd.mm.yyyy`; fall back to the raw input when
/// it does not parse rather than aborting the request.
fn normalize_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) if raw.is_empty() => UNDATED.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Display time one hour after the input, wrapping at midnight with no
/// date rollover: 23:30 becomes 00:30 on the same displayed date.
fn shift_time(raw: &str) -> String {
    match NaiveTime::parse_from_str(raw, "%H:%M") {
        Ok(time) => {
            let (shifted, _wrapped_days) = time.overflowing_add_signed(TimeDelta::hours(1));
            shifted.format("%H:%M").to_string()
        }
        Err(_) => raw.to_string(),
    }
}
