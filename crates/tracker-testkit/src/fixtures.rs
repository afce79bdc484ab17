//! Test fixtures: bearer tokens and remote payloads.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

/// Builder for three-segment bearer tokens with chosen claims.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    claims: Value,
}

impl TokenBuilder {
    /// Token expiring at `exp` (epoch seconds).
    #[must_use]
    pub fn expiring_at(exp: f64) -> Self {
        Self {
            claims: json!({
                "aud": "6621",
                "jti": "0f1e2d3c",
                "iat": 1_700_000_000,
                "nbf": 1_700_000_000,
                "exp": exp,
                "sub": "5137",
                "scopes": []
            }),
        }
    }

    /// Override the subject claim.
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.claims["sub"] = Value::String(subject.to_string());
        self
    }

    /// Override any claim.
    #[must_use]
    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims[name] = value;
        self
    }

    /// Encode as `header.claims.signature`.
    #[must_use]
    pub fn build(&self) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT","alg":"RS256"}"#);
        let claims = URL_SAFE_NO_PAD.encode(self.claims.to_string());
        format!("{header}.{claims}.c2lnbmF0dXJl")
    }
}

/// Token expiring at `exp` with default claims.
#[must_use]
pub fn bearer_token(exp: f64) -> String {
    TokenBuilder::expiring_at(exp).build()
}

/// Minimal list record as returned inside a `Page`.
#[must_use]
pub fn media(id: u64, romaji: &str) -> Value {
    json!({
        "id": id,
        "title": { "romaji": romaji, "english": null, "native": null },
        "synonyms": [],
        "format": "MANGA",
        "status": "RELEASING",
        "isAdult": false,
        "genres": ["Action"],
        "chapters": null,
        "volumes": null,
        "coverImage": { "large": format!("https://img.example/{id}.jpg") }
    })
}

/// `data` payload of a list query.
#[must_use]
pub fn page_data(records: Vec<Value>, has_next_page: bool) -> Value {
    json!({
        "Page": {
            "pageInfo": { "hasNextPage": has_next_page },
            "media": records
        }
    })
}
