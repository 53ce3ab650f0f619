use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Generic JWT claims structure.
///
/// Supports standard RFC 7519 claims plus custom fields via `extra` map.
/// All standard fields are optional; the issuer fills `exp` and `iat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp, seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp, seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp, seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims identifying an authenticated user.
    ///
    /// `sub` carries the user id and `extra.email` the natural key. Expiry is
    /// left unset; it is computed when the token is issued.
    pub fn for_user(user_id: impl ToString, email: impl ToString) -> Self {
        Self::new()
            .with_subject(user_id)
            .with_extra("email", email.to_string())
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: String) -> Self {
        self.iss = Some(iss);
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: String) -> Self {
        self.aud = Some(aud);
        self
    }

    /// Add a custom field.
    ///
    /// Registered claim names (`sub`, `exp`, `iat`, `nbf`, `iss`, `aud`,
    /// `jti`) go to their typed field, so a name never appears twice in the
    /// token. A value of the wrong type for such a field is ignored, and so
    /// is any value that does not serialize to JSON.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        let Ok(value) = serde_json::to_value(value) else {
            return self;
        };

        match key.to_string().as_str() {
            "sub" => self.sub = claim_string(value).or(self.sub),
            "iss" => self.iss = claim_string(value).or(self.iss),
            "aud" => self.aud = claim_string(value).or(self.aud),
            "jti" => self.jti = claim_string(value).or(self.jti),
            "exp" => self.exp = value.as_i64().or(self.exp),
            "iat" => self.iat = value.as_i64().or(self.iat),
            "nbf" => self.nbf = value.as_i64().or(self.nbf),
            key => {
                self.extra.insert(key.to_string(), value);
            }
        }
        self
    }

    /// Move registered claim names found in `extra` into their typed fields.
    ///
    /// Needed only when `extra` was filled directly rather than through
    /// [`Claims::with_extra`].
    pub fn normalized(mut self) -> Self {
        let registered: Vec<String> = self
            .extra
            .keys()
            .filter(|name| is_registered(name))
            .cloned()
            .collect();

        for name in registered {
            if let Some(value) = self.extra.remove(&name) {
                self = self.with_extra(name, value);
            }
        }
        self
    }

    /// Get email from extra fields.
    pub fn email(&self) -> Option<String> {
        self.extra
            .get("email")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Check if token is expired.
    ///
    /// A token is still valid during the second named by `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}

const REGISTERED_CLAIMS: [&str; 7] = ["sub", "exp", "iat", "nbf", "iss", "aud", "jti"];

/// Whether `name` is one of the RFC 7519 claims with a typed field.
pub fn is_registered(name: &str) -> bool {
    REGISTERED_CLAIMS.contains(&name)
}

fn claim_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
