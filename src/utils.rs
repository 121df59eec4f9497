use crate::settings::{validate_period, SettingsError};
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static DURATION_MIN_SEC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)m\s*(\d+)s$").unwrap());
static DURATION_COLON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2})$").unwrap());
static DURATION_SEC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)s?$").unwrap());

/// Left-pads a number with zeros to `width` digits.
pub fn pad0(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Parse a period length typed by the operator into `(minutes, seconds)`.
///
/// Supported formats:
/// - Colon format: "3:00" (minutes:seconds)
/// - Minutes and seconds: "2m 30s" or "2m30s"
/// - Seconds only: "90s" or "90", normalised to minutes and seconds
///
/// The result is validated as a period length.
pub fn parse_duration(input: &str) -> Result<(u32, u32), SettingsError> {
    let trimmed = input.trim();
    let unparsable = || SettingsError::UnparsableDuration(trimmed.to_string());

    let (minutes, seconds) = if let Some(captures) = DURATION_COLON_REGEX.captures(trimmed) {
        let minutes: u32 = captures[1].parse().map_err(|_| unparsable())?;
        let seconds: u32 = captures[2].parse().map_err(|_| unparsable())?;
        (minutes, seconds)
    } else if let Some(captures) = DURATION_MIN_SEC_REGEX.captures(trimmed) {
        let minutes: u32 = captures[1].parse().map_err(|_| unparsable())?;
        let seconds: u32 = captures[2].parse().map_err(|_| unparsable())?;
        (minutes, seconds)
    } else if let Some(captures) = DURATION_SEC_REGEX.captures(trimmed) {
        let total: u32 = captures[1].parse().map_err(|_| unparsable())?;
        (total / 60, total % 60)
    } else {
        return Err(unparsable());
    };

    validate_period(minutes, seconds)?;
    Ok((minutes, seconds))
}

/// Formats a period length the way [`parse_duration`] reads it back.
pub fn format_duration(minutes: u32, seconds: u32) -> String {
    format!("{}:{}", minutes, pad0(u64::from(seconds), 2))
}
