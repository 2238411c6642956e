//! Inclusive date range expansion

use super::{DateError, WireDate};

/// Every calendar day from `start` to `end` inclusive, ascending.
///
/// Endpoints are compared as calendar dates. A reversed range is an error rather
/// than an empty sequence.
pub fn expand(start: &WireDate, end: &WireDate) -> Result<Vec<WireDate>, DateError> {
    if start > end {
        return Err(DateError::InvalidRange(format!(
            "start {} is after end {}",
            start.to_display(),
            end.to_display()
        )));
    }

    let last = end.date();
    Ok(start
        .date()
        .iter_days()
        .take_while(|day| *day <= last)
        .filter_map(WireDate::from_date)
        .collect())
}

/// Expand a range given as two `YYYY-MM-DD` strings.
///
/// An endpoint that is not a real date is reported as [`DateError::InvalidRange`].
pub fn expand_display(start: &str, end: &str) -> Result<Vec<WireDate>, DateError> {
    let start_wire = WireDate::from_display(start)
        .map_err(|_| DateError::InvalidRange(format!("invalid start date {start:?}")))?;
    let end_wire = WireDate::from_display(end)
        .map_err(|_| DateError::InvalidRange(format!("invalid end date {end:?}")))?;

    expand(&start_wire, &end_wire)
}
