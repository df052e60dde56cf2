//! Pure lifecycle decisions.
//!
//! Nothing here touches the store. Each function takes a record as it was
//! read plus the request context and returns what the caller should report
//! and which single write, if any, the caller should apply.

use crate::password::{verify_hash, verify_plaintext, HashError, PasswordHasher};
use jiff::Timestamp;
use linky_core::{ExpirationPolicy, LinkRecord, PasswordState, Slug, ValidationError};

/// Outward result of looking up a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No record, or the stored value was corrupt.
    NotFound,
    /// The record has expired and is being purged.
    Gone,
    /// Send the visitor to this URL.
    Redirect(String),
    /// The link is password protected and no password was supplied.
    Challenge,
    /// A password was supplied and did not match.
    Unauthorized,
}

/// The write a decision asks the caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Delete,
    Put(LinkRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub resolution: Resolution,
    pub mutation: Option<Mutation>,
}

impl Decision {
    fn report(resolution: Resolution) -> Self {
        Self {
            resolution,
            mutation: None,
        }
    }
}

/// Lookup state of a record at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Absent,
    Expired,
    AliveOpen,
    AliveLocked,
}

pub fn classify(record: Option<&LinkRecord>, now: Timestamp) -> LinkState {
    match record {
        None => LinkState::Absent,
        Some(record) if record.is_expired(now) => LinkState::Expired,
        Some(record) if record.is_password_protected() => LinkState::AliveLocked,
        Some(_) => LinkState::AliveOpen,
    }
}

/// Result of checking a supplied password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    Denied,
    Granted,
    /// Matched a legacy plaintext password; the record should be rehashed.
    GrantedLegacy,
}

pub fn unlock(password: &PasswordState, candidate: &str) -> Unlock {
    match password {
        PasswordState::Public => Unlock::Granted,
        PasswordState::Hashed { hash, .. } if verify_hash(hash, candidate) => Unlock::Granted,
        PasswordState::Legacy { plaintext } if verify_plaintext(plaintext, candidate) => {
            Unlock::GrantedLegacy
        }
        _ => Unlock::Denied,
    }
}

/// Decides the outcome of a redirect lookup.
///
/// `hasher` is only used when a legacy password has to be migrated.
pub fn decide_resolve(
    record: Option<LinkRecord>,
    now: Timestamp,
    credential: Option<&str>,
    hasher: &dyn PasswordHasher,
) -> Result<Decision, HashError> {
    match (classify(record.as_ref(), now), record) {
        (LinkState::Expired, _) => Ok(Decision {
            resolution: Resolution::Gone,
            mutation: Some(Mutation::Delete),
        }),
        (LinkState::AliveOpen, Some(record)) => Ok(redirect(record)),
        (LinkState::AliveLocked, Some(record)) => {
            let Some(candidate) = credential else {
                return Ok(Decision::report(Resolution::Challenge));
            };

            match unlock(&record.password, candidate) {
                Unlock::Denied => Ok(Decision::report(Resolution::Unauthorized)),
                Unlock::Granted => Ok(redirect(record)),
                Unlock::GrantedLegacy => {
                    let mut record = record;
                    record.password = PasswordState::Hashed {
                        hash: hasher.hash(candidate)?,
                        recovery: None,
                    };
                    Ok(redirect(record))
                }
            }
        }
        _ => Ok(Decision::report(Resolution::NotFound)),
    }
}

fn redirect(mut record: LinkRecord) -> Decision {
    record.clicks = record.clicks.saturating_add(1);
    Decision {
        resolution: Resolution::Redirect(record.target_url.clone()),
        mutation: Some(Mutation::Put(record)),
    }
}

/// An administrative view of a live link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub slug: Slug,
    pub target_url: String,
    pub clicks: u64,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub password_protected: bool,
    /// Recoverable password, only ever filled in for privileged callers.
    pub password: Option<String>,
}

/// What an administrative read does with one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Expired: omit it and delete it.
    Purge,
    /// Private and the caller is not privileged: omit it silently.
    Hidden,
    Visible(LinkView),
}

pub fn decide_visibility(
    slug: &Slug,
    record: &LinkRecord,
    now: Timestamp,
    is_privileged: bool,
) -> Visibility {
    if record.is_expired(now) {
        return Visibility::Purge;
    }

    let protected = record.is_password_protected();
    if protected && !is_privileged {
        return Visibility::Hidden;
    }

    Visibility::Visible(LinkView {
        slug: slug.clone(),
        target_url: record.target_url.clone(),
        clicks: record.clicks,
        created_at: record.created_at,
        expires_at: record.expires_at,
        password_protected: protected,
        password: record.password.recoverable().map(str::to_owned),
    })
}

/// Validated inputs of a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub slug: Option<Slug>,
    pub target_url: String,
    pub expires_at: Option<Timestamp>,
    pub password: Option<String>,
}

/// Validates raw creation inputs. Blank optional inputs count as absent.
pub fn plan_create(
    url: &str,
    expiration: Option<&str>,
    slug: Option<&str>,
    password: Option<&str>,
    now: Timestamp,
) -> Result<CreatePlan, ValidationError> {
    let target_url = url.trim();
    validate_url(target_url)?;

    let slug = non_blank(slug).map(Slug::new).transpose()?;

    let expires_at = match non_blank(expiration) {
        Some(raw) => raw.parse::<ExpirationPolicy>()?.expires_at(now)?,
        None => None,
    };

    Ok(CreatePlan {
        slug,
        target_url: target_url.to_string(),
        expires_at,
        password: non_blank(password).map(str::to_owned),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Requires an http(s) URL with a non-empty host part.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(ValidationError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {}",
            url
        )));
    };

    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            scheme
        )));
    }

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {}",
            url
        )));
    }

    Ok(())
}
