//! Document rendering.
//!
//! Fills the two fixed report templates (`templates/act.html`,
//! `templates/protocol.html`) with an enumerated field struct and an
//! ordered photo list. The renderer sits behind the [`DocumentRenderer`]
//! trait so the pipeline can be exercised with a failing double.

use std::path::PathBuf;

use askama::Template;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

use fieldowl_core::ReportKind;

/// Errors that can occur while rendering one document kind.
///
/// A render error is localized to its kind: the pipeline logs it and
/// continues with the sibling document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template expansion failed.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// A referenced photo could not be read.
    #[error("photo error: {0}")]
    Photo(#[from] std::io::Error),
}

/// Field values shared by both document kinds.
///
/// A fixed shape rather than an open map: every placeholder the templates
/// know about is a named field here.
#[derive(Debug, Clone)]
pub struct ReportFields {
    /// Display-formatted inspection date (`dd.mm.yyyy`, or the raw input
    /// when unparseable).
    pub date: String,
    /// Inspection start time as submitted.
    pub time: String,
    /// Display end time, one hour after `time`.
    pub time_plus_hour: String,
    /// Object address.
    pub address: String,
    /// Recorded condition.
    pub condition: String,
    /// Object name.
    pub name: String,
}

/// Renders one document kind from the shared fields and photo list.
pub trait DocumentRenderer: Send + Sync {
    /// Render the document as a binary artifact.
    ///
    /// `photos` are paths to already-persisted temporary image files, in
    /// submission order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template fails to expand or a photo
    /// cannot be read.
    fn render(
        &self,
        kind: ReportKind,
        fields: &ReportFields,
        photos: &[PathBuf],
    ) -> Result<Vec<u8>, RenderError>;

    /// File extension of the rendered artifact, without the dot.
    fn extension(&self) -> &'static str;
}

#[derive(Template)]
#[template(path = "act.html")]
struct ActTemplate<'a> {
    fields: &'a ReportFields,
    photos: &'a [String],
}

#[derive(Template)]
#[template(path = "protocol.html")]
struct ProtocolTemplate<'a> {
    fields: &'a ReportFields,
    photos: &'a [String],
}

/// Askama-backed renderer producing self-contained HTML documents.
///
/// Photos are inlined as base64 data URIs so the artifact stays a single
/// file once uploaded.
#[derive(Debug, Clone, Default)]
pub struct AskamaRenderer;

impl AskamaRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for AskamaRenderer {
    fn render(
        &self,
        kind: ReportKind,
        fields: &ReportFields,
        photos: &[PathBuf],
    ) -> Result<Vec<u8>, RenderError> {
        let mut inline = Vec::with_capacity(photos.len());
        for path in photos {
            let bytes = std::fs::read(path)?;
            inline.push(format!("data:image/jpeg;base64,{}", BASE64.encode(bytes)));
        }

        let html = match kind {
            ReportKind::Act => ActTemplate {
                fields,
                photos: &inline,
            }
            .render()?,
            ReportKind::Protocol => ProtocolTemplate {
                fields,
                photos: &inline,
            }
            .render()?,
        };

        Ok(html.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Build the destination filename for one document.
///
/// Pattern: `<Kind>_<name>_<date>_<time-with-colons-replaced>.<ext>`.
#[must_use]
pub fn document_filename(kind: ReportKind, fields: &ReportFields, extension: &str) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        kind.file_prefix(),
        sanitize_component(&fields.name),
        sanitize_component(&fields.date),
        sanitize_component(&fields.time.replace(':', "-")),
        extension,
    )
}

/// Replace characters that would break a path or a remote object name.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}
