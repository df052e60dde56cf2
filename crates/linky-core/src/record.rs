use crate::error::CodecError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// How a link guards its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordState {
    /// Anyone holding the slug is redirected.
    Public,
    /// Protected by a stored digest.
    ///
    /// `recovery` is a plaintext copy kept at creation time so a privileged
    /// operator can read the password back from a listing.
    Hashed {
        hash: String,
        recovery: Option<String>,
    },
    /// Written before hashing existed. Upgraded to [`PasswordState::Hashed`]
    /// on the first successful unlock.
    Legacy { plaintext: String },
}

impl PasswordState {
    pub fn is_protected(&self) -> bool {
        !matches!(self, PasswordState::Public)
    }

    /// The plaintext password a privileged caller may recover, if any.
    pub fn recoverable(&self) -> Option<&str> {
        match self {
            PasswordState::Public => None,
            PasswordState::Hashed { recovery, .. } => recovery.as_deref(),
            PasswordState::Legacy { plaintext } => Some(plaintext),
        }
    }
}

/// One stored link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Destination of the redirect.
    pub target_url: String,
    /// Successful redirects so far. Best-effort under concurrency.
    pub clicks: u64,
    pub created_at: Timestamp,
    /// `None` means the link never expires.
    pub expires_at: Option<Timestamp>,
    pub password: PasswordState,
}

impl LinkRecord {
    pub fn new(
        target_url: impl Into<String>,
        created_at: Timestamp,
        expires_at: Option<Timestamp>,
        password: PasswordState,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            clicks: 0,
            created_at,
            expires_at,
            password,
        }
    }

    /// A record whose expiry is at or before `now` is logically dead.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn is_password_protected(&self) -> bool {
        self.password.is_protected()
    }

    /// Serializes the record into its persisted JSON form.
    pub fn encode(&self) -> Result<String, CodecError> {
        let (password_hash, password) = match &self.password {
            PasswordState::Public => (None, None),
            PasswordState::Hashed { hash, recovery } => (Some(hash.clone()), recovery.clone()),
            PasswordState::Legacy { plaintext } => (None, Some(plaintext.clone())),
        };

        let stored = StoredLink {
            url: self.target_url.clone(),
            clicks: self.clicks,
            password_hash,
            password,
            metadata: Some(StoredMetadata {
                created_at_utc: self.created_at.as_millisecond(),
                expires_at_utc: self.expires_at.map(|ts| ts.as_millisecond()),
                password_protected: self.password.is_protected(),
            }),
            expires_at: None,
        };

        Ok(serde_json::to_string(&stored)?)
    }

    /// Parses a persisted JSON value.
    ///
    /// Values written by the first worker revision have no `metadata`
    /// object and keep `expiresAt` at the top level; they decode with a
    /// creation time of the Unix epoch.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let stored: StoredLink = serde_json::from_str(raw)?;

        if stored.url.is_empty() {
            return Err(CodecError::EmptyUrl);
        }

        let (created_ms, expires_ms, protected) = match stored.metadata {
            Some(meta) => (
                meta.created_at_utc,
                meta.expires_at_utc,
                meta.password_protected,
            ),
            None => (
                0,
                stored.expires_at,
                stored.password_hash.is_some() || stored.password.is_some(),
            ),
        };

        let password = match (protected, stored.password_hash, stored.password) {
            (false, None, None) => PasswordState::Public,
            (true, Some(hash), recovery) => PasswordState::Hashed { hash, recovery },
            (true, None, Some(plaintext)) => PasswordState::Legacy { plaintext },
            (protected, _, _) => return Err(CodecError::InconsistentPassword { protected }),
        };

        Ok(Self {
            target_url: stored.url,
            clicks: stored.clicks,
            created_at: timestamp("createdAtUtc", created_ms)?,
            expires_at: expires_ms
                .map(|ms| timestamp("expiresAtUtc", ms))
                .transpose()?,
            password,
        })
    }
}

fn timestamp(field: &'static str, millis: i64) -> Result<Timestamp, CodecError> {
    Timestamp::from_millisecond(millis).map_err(|e| CodecError::Timestamp {
        field,
        millis,
        reason: e.to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLink {
    url: String,
    #[serde(default)]
    clicks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<StoredMetadata>,
    #[serde(default, skip_serializing)]
    expires_at: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMetadata {
    created_at_utc: i64,
    #[serde(default)]
    expires_at_utc: Option<i64>,
    #[serde(default)]
    password_protected: bool,
}
