//! DisplayDate ⇄ WireDate conversion
//!
//! Parsing is strict in both directions: every field must have its exact width,
//! separators must be `-` (display form only), and the result must exist on the
//! calendar. `2024-2-5`, `2024/02/05` and `2024-02-30` are all rejected.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DateError;

/// Length of a `YYYY-MM-DD` display date
const DISPLAY_LEN: usize = 10;

/// Length of a `DDMMYYYY` wire date
const WIRE_LEN: usize = 8;

/// A calendar date in the remote service's `DDMMYYYY` form.
///
/// Only real calendar dates with a four-digit year can be represented. Ordering is
/// chronological, never lexical: `31012024` sorts before `01022024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WireDate(NaiveDate);

impl WireDate {
    /// Parse a strict 8-digit `DDMMYYYY` string.
    pub fn parse(wire: &str) -> Result<Self, DateError> {
        let invalid = || DateError::InvalidWireDate(wire.to_string());

        if wire.len() != WIRE_LEN || !wire.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let day = digits(&wire[0..2]).ok_or_else(invalid)?;
        let month = digits(&wire[2..4]).ok_or_else(invalid)?;
        let year = digits(&wire[4..8]).ok_or_else(invalid)?;

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn from_display(display: &str) -> Result<Self, DateError> {
        let invalid = || DateError::InvalidDate(display.to_string());

        let bytes = display.as_bytes();
        let well_formed = bytes.len() == DISPLAY_LEN
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(invalid());
        }

        let year = digits(&display[0..4]).ok_or_else(invalid)?;
        let month = digits(&display[5..7]).ok_or_else(invalid)?;
        let day = digits(&display[8..10]).ok_or_else(invalid)?;

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Wrap a calendar date, rejecting years that do not fit in four digits.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        (0..=9999).contains(&date.year()).then_some(Self(date))
    }

    /// The underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_display(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl fmt::Display for WireDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{:02}{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}

impl FromStr for WireDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WireDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WireDate> for String {
    fn from(value: WireDate) -> Self {
        value.to_string()
    }
}

/// Convert a `YYYY-MM-DD` display date into its wire form.
pub fn to_wire(display: &str) -> Result<WireDate, DateError> {
    WireDate::from_display(display)
}

/// Convert a wire date back into `YYYY-MM-DD`.
pub fn to_display(wire: &WireDate) -> String {
    wire.to_display()
}

/// Parse a field already checked to be ASCII digits.
fn digits(field: &str) -> Option<u32> {
    field.parse().ok()
}
