//! Interpretation of calendar day picks into trip and activity windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Destinations longer than this are shortened in the trip `when` label.
pub const WHEN_DESTINATION_MAX: usize = 12;

/// A possibly incomplete selection of two calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Folds one more picked day into the selection.
    ///
    /// With nothing selected the day becomes the start. With only a start, a
    /// day before it flips the range (the old start becomes the end) and any
    /// other day, including the start itself, closes the range. A complete
    /// range is discarded and the day starts a fresh selection.
    pub fn resolve(&self, picked: NaiveDate) -> Self {
        match (self.start, self.end) {
            (Some(start), None) if picked < start => Self::between(picked, start),
            (Some(start), None) => Self::between(start, picked),
            (None, Some(end)) if picked <= end => Self::between(picked, end),
            _ => Self {
                start: Some(picked),
                end: None,
            },
        }
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Every day the calendar should mark, in ascending order.
    pub fn highlighted_days(&self) -> Vec<NaiveDate> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => days_between(start, end),
            (Some(day), None) | (None, Some(day)) => vec![day],
            (None, None) => Vec::new(),
        }
    }

    /// "Lisbon from 10 to 15 of Jan", once both bounds are known.
    pub fn label(&self, destination: &str) -> Option<String> {
        let (start, end) = self.bounds()?;
        Some(format!("{} from {}", destination.trim(), format_span(start, end)))
    }
}

/// All days from `start` to `end`, both included. Empty when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

pub fn format_span(start: NaiveDate, end: NaiveDate) -> String {
    if start.format("%Y-%m").to_string() == end.format("%Y-%m").to_string() {
        format!("{} to {} of {}", start.format("%d"), end.format("%d"), start.format("%b"))
    } else {
        format!(
            "{} of {} to {} of {}",
            start.format("%d"),
            start.format("%b"),
            end.format("%d"),
            end.format("%b")
        )
    }
}

/// Label shown on a stored trip; long destinations are shortened with "...".
pub fn when_label(destination: &str, start: NaiveDate, end: NaiveDate) -> String {
    let destination = destination.trim();
    let shown = if destination.chars().count() > WHEN_DESTINATION_MAX {
        let head: String = destination.chars().take(WHEN_DESTINATION_MAX - 3).collect();
        format!("{head}...")
    } else {
        destination.to_string()
    };
    format!("{shown} from {}", format_span(start, end))
}
