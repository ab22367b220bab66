//! Identity subject extraction.
//!
//! The identity provider issues a JWT and is responsible for verifying it
//! upstream; here only the payload's `sub` claim is read and used verbatim
//! as the user's outside id.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::ServerError;

const SESSION_COOKIE: &str = "privy-token";

#[derive(Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// Subject of the caller's token, from `Authorization: Bearer` or the
/// session cookie.
pub fn subject_from_headers(headers: &HeaderMap) -> Result<String, ServerError> {
    let token = bearer_token(headers)
        .or_else(|| cookie_token(headers))
        .ok_or(ServerError::Unauthenticated)?;
    subject_from_token(token)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|t| !t.is_empty())
}

fn subject_from_token(token: &str) -> Result<String, ServerError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_sig), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ServerError::Unauthenticated);
    };

    // Some issuers keep the padding.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ServerError::Unauthenticated)?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|_| ServerError::Unauthenticated)?;

    claims
        .sub
        .filter(|s| !s.trim().is_empty())
        .ok_or(ServerError::Unauthenticated)
}

/// Build an unsigned token for `sub`. Test helper.
#[cfg(test)]
pub fn test_token(sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({ "sub": sub }).to_string());
    format!("{header}.{payload}.sig")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_subject() {
        let mut headers = HeaderMap::new();
        let value = format!("Bearer {}", test_token("did:privy:abc"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        assert_eq!(subject_from_headers(&headers).unwrap(), "did:privy:abc");
    }

    #[test]
    fn test_cookie_subject() {
        let mut headers = HeaderMap::new();
        let value = format!("theme=dark; privy-token={}", test_token("did:privy:xyz"));
        headers.insert(header::COOKIE, HeaderValue::from_str(&value).unwrap());
        assert_eq!(subject_from_headers(&headers).unwrap(), "did:privy:xyz");
    }

    #[test]
    fn test_rejects_missing_and_malformed() {
        assert!(matches!(
            subject_from_headers(&HeaderMap::new()),
            Err(ServerError::Unauthenticated)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(subject_from_headers(&headers).is_err());

        let no_sub = format!(
            "Bearer a.{}.c",
            URL_SAFE_NO_PAD.encode(br#"{"iss":"privy.io"}"#)
        );
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&no_sub).unwrap());
        assert!(subject_from_headers(&headers).is_err());
    }
}
