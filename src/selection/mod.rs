//! Selected dates awaiting the next batch download
//!
//! [`SelectionSet`] is an insertion-ordered collection of unique [`WireDate`]s.
//! Order is kept for display only; it is not sorted chronologically unless the
//! entries arrived that way (range expansion yields ascending dates).

use crate::date::WireDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Selection errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Date is already selected
    #[error("date {} already selected", .0.to_display())]
    DuplicateDate(WireDate),
}

/// How a range add combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Append range dates not already selected
    #[default]
    Merge,
    /// Discard the current selection and install the range
    Replace,
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(RangePolicy::Merge),
            "replace" => Ok(RangePolicy::Replace),
            _ => Err(format!(
                "Invalid range policy: {s}. Valid options: merge, replace"
            )),
        }
    }
}

/// Insertion-ordered set of unique wire dates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    dates: Vec<WireDate>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `date` unless it is already present.
    pub fn add_one(&mut self, date: WireDate) -> Result<(), SelectionError> {
        if self.contains(&date) {
            return Err(SelectionError::DuplicateDate(date));
        }
        self.dates.push(date);
        Ok(())
    }

    /// Append every date not already present, keeping input order.
    ///
    /// Returns the number of dates actually added.
    pub fn add_many<I>(&mut self, dates: I) -> usize
    where
        I: IntoIterator<Item = WireDate>,
    {
        let mut seen: HashSet<WireDate> = self.dates.iter().copied().collect();
        let before = self.dates.len();
        for date in dates {
            if seen.insert(date) {
                self.dates.push(date);
            }
        }
        self.dates.len() - before
    }

    /// Remove `date`. Returns whether it was present.
    pub fn remove_one(&mut self, date: &WireDate) -> bool {
        match self.dates.iter().position(|d| d == date) {
            Some(index) => {
                self.dates.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the whole selection, dropping duplicates within `dates`.
    pub fn replace_all<I>(&mut self, dates: I)
    where
        I: IntoIterator<Item = WireDate>,
    {
        self.dates.clear();
        self.add_many(dates);
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.dates.clear();
    }

    /// Whether `date` is selected.
    pub fn contains(&self, date: &WireDate) -> bool {
        self.dates.contains(date)
    }

    /// Number of selected dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Selected dates in insertion order.
    pub fn as_slice(&self) -> &[WireDate] {
        &self.dates
    }

    /// Owned copy of the current contents, for handing to a download.
    pub fn snapshot(&self) -> Vec<WireDate> {
        self.dates.clone()
    }

    /// Selected dates rendered as `YYYY-MM-DD`, in insertion order.
    pub fn display_dates(&self) -> Vec<String> {
        self.dates.iter().map(WireDate::to_display).collect()
    }

    /// Selected dates in chronological order.
    pub fn sorted(&self) -> Vec<WireDate> {
        let mut dates = self.dates.clone();
        dates.sort();
        dates
    }
}
