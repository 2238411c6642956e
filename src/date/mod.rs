//! Date conversion and range expansion
//!
//! Two textual date forms meet in this crate:
//!
//! - **DisplayDate** `YYYY-MM-DD`, as typed by a user or produced by a date-entry control
//! - **WireDate** `DDMMYYYY`, the unit exchanged with the remote data service
//!
//! [`WireDate`] is the only form stored in a selection. It can only be built from a
//! real calendar date, so everything downstream of [`codec::to_wire`] can rely on it.
//!
//! # Components
//!
//! - [`codec`] - DisplayDate ⇄ WireDate conversion
//! - [`range`] - inclusive expansion of a start/end pair into every day between them

pub mod codec;
pub mod range;

pub use codec::{to_display, to_wire, WireDate};
pub use range::{expand, expand_display};

/// Date errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Input does not denote a real calendar date in `YYYY-MM-DD` form
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    /// Input is not an 8-digit `DDMMYYYY` calendar date
    #[error("invalid wire date: {0:?}")]
    InvalidWireDate(String),

    /// Range endpoints are unusable or out of order
    #[error("invalid range: {0}")]
    InvalidRange(String),
}
