use crate::error::ValidationError;
use jiff::{SignedDuration, Span, SpanRelativeTo, Timestamp};
use std::str::FromStr;

/// Expiration policy for a new link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationPolicy {
    /// The link never expires.
    #[default]
    Never,
    /// The link expires a fixed duration after creation.
    AfterDuration(SignedDuration),
    /// The link expires at a specific instant.
    AtTimestamp(Timestamp),
}

impl ExpirationPolicy {
    /// Converts the policy into the absolute expiry stored with the record.
    pub fn expires_at(&self, now: Timestamp) -> Result<Option<Timestamp>, ValidationError> {
        match self {
            ExpirationPolicy::Never => Ok(None),
            ExpirationPolicy::AfterDuration(duration) => now
                .checked_add(*duration)
                .map(Some)
                .map_err(|e| ValidationError::InvalidExpiration(e.to_string())),
            ExpirationPolicy::AtTimestamp(timestamp) => Ok(Some(*timestamp)),
        }
    }
}

/// Accepts, in order: blank or `never`, epoch milliseconds, an RFC 3339
/// instant, and a duration in jiff's friendly or ISO 8601 format. Calendar
/// units longer than a week are rejected because they have no fixed length.
impl FromStr for ExpirationPolicy {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("never") {
            return Ok(ExpirationPolicy::Never);
        }

        if let Ok(millis) = input.parse::<i64>() {
            return Timestamp::from_millisecond(millis)
                .map(ExpirationPolicy::AtTimestamp)
                .map_err(|e| ValidationError::InvalidExpiration(e.to_string()));
        }

        if let Ok(timestamp) = input.parse::<Timestamp>() {
            return Ok(ExpirationPolicy::AtTimestamp(timestamp));
        }

        if let Ok(duration) = input.parse::<SignedDuration>() {
            return Ok(ExpirationPolicy::AfterDuration(duration));
        }

        let span: Span = input.parse().map_err(|_| {
            ValidationError::InvalidExpiration(format!(
                "expected a timestamp or a duration, got '{}'",
                input
            ))
        })?;
        span.to_duration(SpanRelativeTo::days_are_24_hours())
            .map(ExpirationPolicy::AfterDuration)
            .map_err(|e| ValidationError::InvalidExpiration(e.to_string()))
    }
}
