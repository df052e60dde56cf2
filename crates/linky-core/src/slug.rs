use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Key holding the operator's privileged secret. It shares the key space
/// with links but is never a link.
pub const RESERVED_KEY: &str = "SUPER_SECRET_KEY";

/// Path segments served by fixed routes, which a link could never shadow.
pub const ROUTE_NAMES: &[&str] = &["health", "api"];

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 64;

/// The short path segment that keys a link record.
///
/// Caller-supplied slugs are 1-64 characters of `[a-zA-Z0-9_-]` and may not
/// collide with [`RESERVED_KEY`] or any of [`ROUTE_NAMES`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Creates a new `Slug` after validating the input.
    pub fn new(slug: impl Into<String>) -> Result<Self, ValidationError> {
        let slug = slug.into();
        Self::validate(&slug)?;
        Ok(Self(slug))
    }

    /// Creates a `Slug` without validation.
    ///
    /// Use this only for keys read back from the store or produced by a
    /// generator that is known to emit valid output.
    pub fn new_unchecked(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the public short link for this slug under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    pub fn is_reserved(&self) -> bool {
        self.0 == RESERVED_KEY
    }

    fn validate(slug: &str) -> Result<(), ValidationError> {
        if slug.len() < MIN_LENGTH || slug.len() > MAX_LENGTH {
            return Err(ValidationError::InvalidSlug(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                slug.len()
            )));
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidSlug(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                slug
            )));
        }

        if slug == RESERVED_KEY {
            return Err(ValidationError::InvalidSlug(format!(
                "'{}' is reserved",
                slug
            )));
        }

        if ROUTE_NAMES.contains(&slug) {
            return Err(ValidationError::InvalidSlug(format!(
                "'{}' is taken by a fixed route",
                slug
            )));
        }

        Ok(())
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(Slug::new("a").is_ok());
        assert!(Slug::new("Abc-123_xyz").is_ok());
        assert!(Slug::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn empty_or_too_long() {
        assert!(Slug::new("").is_err());
        assert!(Slug::new("a".repeat(65)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(Slug::new("abc def").is_err());
        assert!(Slug::new("abc/def").is_err());
        assert!(Slug::new("abc?x=1").is_err());
    }

    #[test]
    fn reserved_key_is_rejected() {
        let err = Slug::new(RESERVED_KEY).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSlug(_)));
        assert!(Slug::new_unchecked(RESERVED_KEY).is_reserved());
    }

    #[test]
    fn route_names_are_rejected() {
        for name in ROUTE_NAMES {
            let err = Slug::new(*name).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidSlug(_)));
        }
        // matching is exact, like the router's
        assert!(Slug::new("Health").is_ok());
        assert!(Slug::new("healthy").is_ok());
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let slug = Slug::new("abc123").unwrap();
        assert_eq!(slug.to_url("https://lnk.example"), "https://lnk.example/abc123");
        assert_eq!(slug.to_url("https://lnk.example/"), "https://lnk.example/abc123");
    }
}
