use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use linky_engine::password::verify_plaintext;

/// Header carrying the operator's privileged secret.
pub const SUPER_SECRET_HEADER: &str = "x-super-secret";

/// The token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub fn super_secret(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SUPER_SECRET_HEADER)?
        .to_str()
        .ok()
        .filter(|secret| !secret.is_empty())
}

/// Constant-time comparison of a presented secret against the expected one.
pub fn secret_matches(expected: &str, presented: &str) -> bool {
    verify_plaintext(expected, presented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("authorization", "Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("authorization", "bearer abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("authorization", "Basic abc")), None);
        assert_eq!(bearer_token(&headers("authorization", "Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn empty_super_secret_is_absent() {
        assert_eq!(super_secret(&headers(SUPER_SECRET_HEADER, "")), None);
        assert_eq!(super_secret(&headers(SUPER_SECRET_HEADER, "s3")), Some("s3"));
    }

    #[test]
    fn secrets_compare_exactly() {
        assert!(secret_matches("key", "key"));
        assert!(!secret_matches("key", "key2"));
        assert!(!secret_matches("key", "KEY"));
    }
}
