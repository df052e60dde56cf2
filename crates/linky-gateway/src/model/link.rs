use jiff::Timestamp;
use linky_engine::{CreateLink, Created, LinkView};
use serde::{Deserialize, Serialize};

/// Expiration as sent by clients: a string (instant, duration or epoch
/// milliseconds) or a bare number of epoch milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpirationInput {
    Millis(i64),
    Text(String),
}

impl ExpirationInput {
    fn into_text(self) -> String {
        match self {
            ExpirationInput::Millis(ms) => ms.to_string(),
            ExpirationInput::Text(text) => text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub expiration: Option<ExpirationInput>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(request: CreateLinkRequest) -> Self {
        CreateLink {
            url: request.url,
            expiration: request.expiration.map(ExpirationInput::into_text),
            slug: request.slug,
            password: request.password,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub slug: String,
    pub url: String,
    pub expires_at_utc: Option<i64>,
    pub password_protected: bool,
}

impl From<Created> for CreateLinkResponse {
    fn from(created: Created) -> Self {
        Self {
            slug: created.slug.to_string(),
            url: created.target_url,
            expires_at_utc: created.expires_at.map(|ts| ts.as_millisecond()),
            password_protected: created.password_protected,
        }
    }
}

/// One link in an administrative response.
///
/// Millisecond fields are what the store keeps; the formatted fields are
/// rendered at response time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub slug: String,
    pub url: String,
    pub clicks: u64,
    pub created_at_utc: i64,
    pub formatted_created: String,
    pub expires_at_utc: Option<i64>,
    pub formatted_expiration: String,
    pub password_protected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn format_timestamp(ts: Timestamp) -> String {
    ts.round(jiff::Unit::Second)
        .map(|rounded| rounded.to_string())
        .unwrap_or_else(|_| ts.to_string())
}

impl From<LinkView> for LinkResponse {
    fn from(view: LinkView) -> Self {
        Self {
            slug: view.slug.to_string(),
            url: view.target_url,
            clicks: view.clicks,
            created_at_utc: view.created_at.as_millisecond(),
            formatted_created: format_timestamp(view.created_at),
            expires_at_utc: view.expires_at.map(|ts| ts.as_millisecond()),
            formatted_expiration: view
                .expires_at
                .map(format_timestamp)
                .unwrap_or_else(|| "Never".to_string()),
            password_protected: view.password_protected,
            password: view.password,
        }
    }
}

/// Body of the password prompt.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use linky_core::Slug;

    #[test]
    fn numeric_expiration_is_forwarded_as_millis() {
        let request: CreateLinkRequest =
            serde_json::from_str(r#"{"url":"https://a.example","expiration":1700000000000}"#)
                .unwrap();
        let create = CreateLink::from(request);
        assert_eq!(create.expiration.as_deref(), Some("1700000000000"));

        let request: CreateLinkRequest =
            serde_json::from_str(r#"{"url":"https://a.example","expiration":"7d"}"#).unwrap();
        assert_eq!(CreateLink::from(request).expiration.as_deref(), Some("7d"));
    }

    #[test]
    fn link_response_formats_times() {
        let view = LinkView {
            slug: Slug::new_unchecked("abc"),
            target_url: "https://a.example".to_string(),
            clicks: 2,
            created_at: Timestamp::from_millisecond(1_700_000_000_123).unwrap(),
            expires_at: None,
            password_protected: false,
            password: None,
        };

        let json = serde_json::to_value(LinkResponse::from(view)).unwrap();
        assert_eq!(json["createdAtUtc"], 1_700_000_000_123i64);
        assert_eq!(json["formattedCreated"], "2023-11-14T22:13:20Z");
        assert_eq!(json["expiresAtUtc"], serde_json::Value::Null);
        assert_eq!(json["formattedExpiration"], "Never");
        assert!(json.get("password").is_none());
    }
}
