use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::types::BoxError;

use super::error::LiteralError;

/// Layout of the default timestamp literal, e.g. `2020/03/31T15:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%dT%H:%M:%S";

// chrono reads `%m` and friends from one digit too; the default layout is fixed width.
static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}/[0-9]{2}/[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("valid regex")
});

/// Default timestamp reducer: [`TIMESTAMP_FORMAT`] read as UTC, returned as
/// unix seconds.
///
/// # Errors
///
/// Fails when `text` does not match the layout.
pub fn parse_timestamp_secs(text: &str) -> Result<i64, BoxError> {
    if !TIMESTAMP_SHAPE.is_match(text) {
        return Err(LiteralError::new(format!(
            "invalid timestamp '{text}': expected YYYY/MM/DDThh:mm:ss"
        ))
        .into());
    }
    parse_on(text, TIMESTAMP_FORMAT)
}

/// Build a timestamp reducer for another `chrono` strftime layout.
pub fn parse_timestamp_with(
    format: &'static str,
) -> impl Fn(&str) -> Result<i64, BoxError> + Clone + Send + Sync + 'static {
    move |text| parse_on(text, format)
}

fn parse_on(text: &str, format: &str) -> Result<i64, BoxError> {
    let parsed = NaiveDateTime::parse_from_str(text, format).map_err(|e| {
        LiteralError::new(format!("invalid timestamp '{text}' for layout '{format}': {e}"))
    })?;
    Ok(parsed.and_utc().timestamp())
}
