//! Fieldowl shared types.
//!
//! Types used by both the server crate and its tests: newtype IDs for
//! entity references and the fixed set of report document kinds.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::id::{AccountId, OrderId};
pub use types::report::ReportKind;
