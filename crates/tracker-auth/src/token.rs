//! Bearer token types and offline claim inspection.

use std::fmt;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{AuthError, AuthResult};

/// Raw bearer token as handed out by the provider.
///
/// The raw string is the only persisted form; claims are always re-derived.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the authorization header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"<redacted>").finish()
    }
}

/// Claims decoded from a bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Audience (the OAuth client the token was issued to).
    #[serde(rename = "aud", default, deserialize_with = "string_or_number")]
    pub audience: String,

    /// Unique token id.
    #[serde(rename = "jti", default, deserialize_with = "string_or_number")]
    pub jwt_id: String,

    /// Issued-at, epoch seconds.
    #[serde(rename = "iat", default)]
    pub issued_at: f64,

    /// Not-before, epoch seconds.
    #[serde(rename = "nbf", default)]
    pub not_before: f64,

    /// Expiry, epoch seconds.
    #[serde(rename = "exp")]
    pub expires_at: f64,

    /// Subject (the user id).
    #[serde(rename = "sub", default, deserialize_with = "string_or_number")]
    pub subject: String,

    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Claims {
    /// Expiry as a UTC timestamp.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        let secs = self.expires_at.floor();
        let nanos = ((self.expires_at - secs) * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos).unwrap_or_default()
    }

    /// Time left before expiry, or `None` once expired or out of range.
    #[must_use]
    pub fn time_until_expiry(&self, now: f64) -> Option<Duration> {
        let remaining = self.expires_at - now;
        if remaining > 0.0 {
            Duration::try_from_secs_f64(remaining).ok()
        } else {
            None
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
        Raw::Missing(()) => String::new(),
    })
}

/// Offline bearer token inspector.
///
/// Pure given the token string and the current time; clearing stored session
/// state on expiry is the caller's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenInspector;

impl TokenInspector {
    /// Decode and validate the claims of a raw token.
    pub fn validate(raw: &str) -> AuthResult<Claims> {
        let segments: Vec<&str> = raw.split('.').collect();
        let [_, payload, _] = segments.as_slice() else {
            return Err(AuthError::Malformed);
        };
        if payload.is_empty() {
            return Err(AuthError::Malformed);
        }

        let bytes = decode_segment(payload)
            .map_err(|err| AuthError::UndecodableClaims(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| AuthError::UndecodableClaims(err.to_string()))
    }

    /// Returns `true` iff `claims.expires_at < now`.
    #[must_use]
    pub fn is_expired(claims: &Claims, now: f64) -> bool {
        claims.expires_at < now
    }

    /// Validate a token and reject it when expired.
    pub fn inspect(raw: &str, now: f64) -> AuthResult<Claims> {
        let claims = Self::validate(raw)?;
        if Self::is_expired(&claims, now) {
            return Err(AuthError::Expired {
                expired_at: claims.expires_at_utc(),
            });
        }
        Ok(claims)
    }
}

/// Decode a base64url segment, tolerating padding and the standard alphabet.
fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    fn anilist_claims(exp: f64) -> serde_json::Value {
        serde_json::json!({
            "aud": "6621",
            "jti": "abc123",
            "iat": 1_700_000_000,
            "nbf": 1_700_000_000,
            "exp": exp,
            "sub": 424_242,
            "scopes": []
        })
    }

    #[test]
    fn test_validate_decodes_claims() {
        let token = token_with(&anilist_claims(1_800_000_000.0));
        let claims = TokenInspector::validate(&token).unwrap();

        assert_eq!(claims.audience, "6621");
        assert_eq!(claims.jwt_id, "abc123");
        assert_eq!(claims.subject, "424242");
        assert!((claims.expires_at - 1_800_000_000.0).abs() < f64::EPSILON);
        assert!(claims.scopes.is_empty());
    }

    #[test]
    fn test_validate_rejects_wrong_segment_count() {
        assert_eq!(TokenInspector::validate("abc"), Err(AuthError::Malformed));
        assert_eq!(TokenInspector::validate("a.b"), Err(AuthError::Malformed));
        assert_eq!(TokenInspector::validate("a.b.c.d"), Err(AuthError::Malformed));
        assert_eq!(TokenInspector::validate("a..c"), Err(AuthError::Malformed));
    }

    #[test]
    fn test_validate_rejects_undecodable_payload() {
        let err = TokenInspector::validate("header.!!!not-base64!!!.sig").unwrap_err();
        assert!(matches!(err, AuthError::UndecodableClaims(_)));

        let not_json = URL_SAFE_NO_PAD.encode("not json");
        let err = TokenInspector::validate(&format!("h.{not_json}.s")).unwrap_err();
        assert!(matches!(err, AuthError::UndecodableClaims(_)));
    }

    #[test]
    fn test_validate_requires_expiry() {
        let token = token_with(&serde_json::json!({"sub": 1}));
        assert!(matches!(
            TokenInspector::validate(&token),
            Err(AuthError::UndecodableClaims(_))
        ));
    }

    #[test]
    fn test_validate_accepts_padded_standard_alphabet() {
        let payload = anilist_claims(1_800_000_000.0).to_string();
        let padded = base64::engine::general_purpose::STANDARD.encode(payload);
        let claims = TokenInspector::validate(&format!("h.{padded}.s")).unwrap();
        assert_eq!(claims.audience, "6621");
    }

    #[test]
    fn test_expiry_comparison() {
        let claims = TokenInspector::validate(&token_with(&anilist_claims(1000.5))).unwrap();

        assert!(TokenInspector::is_expired(&claims, 1000.6));
        assert!(!TokenInspector::is_expired(&claims, 1000.5));
        assert!(!TokenInspector::is_expired(&claims, 999.0));
    }

    #[test]
    fn test_inspect_reports_expired() {
        let token = token_with(&anilist_claims(1000.0));
        let err = TokenInspector::inspect(&token, 2000.0).unwrap_err();
        assert!(matches!(err, AuthError::Expired { .. }));
        assert!(err.requires_login());

        assert!(TokenInspector::inspect(&token, 10.0).is_ok());
    }

    #[test]
    fn test_time_until_expiry() {
        let claims = TokenInspector::validate(&token_with(&anilist_claims(1060.0))).unwrap();
        assert_eq!(claims.time_until_expiry(1000.0), Some(Duration::from_secs(60)));
        assert_eq!(claims.time_until_expiry(1060.0), None);

        let far = TokenInspector::validate(&token_with(&anilist_claims(1e300))).unwrap();
        assert_eq!(far.time_until_expiry(1000.0), None);
        assert_eq!(claims.expires_at_utc().timestamp(), 1060);
    }

    #[test]
    fn test_authorization_header_and_redacted_debug() {
        let token = BearerToken::new("abc.def.ghi");
        assert_eq!(token.authorization_header(), "Bearer abc.def.ghi");
        assert!(!format!("{token:?}").contains("abc"));
    }
}
