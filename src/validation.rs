//! Input rules shared by every mutation. Each rule returns the normalized
//! value when the input is acceptable and `None` otherwise.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use url::Url;

pub const MIN_DESTINATION_LEN: usize = 4;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .unwrap()
});

pub fn destination(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= MIN_DESTINATION_LEN).then(|| trimmed.to_string())
}

/// Trimmed and lower-cased, so emails compare case-insensitively.
pub fn email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    EMAIL_RE
        .is_match(trimmed)
        .then(|| trimmed.to_ascii_lowercase())
}

pub fn url(raw: &str) -> Option<Url> {
    let parsed = Url::parse(raw.trim()).ok()?;
    (!parsed.scheme().is_empty()).then_some(parsed)
}

pub fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    match (start, end) {
        (Some(start), Some(end)) if start <= end => Some((start, end)),
        _ => None,
    }
}

/// Non-blank text, trimmed.
pub fn required_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
