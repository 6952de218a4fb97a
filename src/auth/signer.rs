//! HS256 signer holding the application secret.

use std::fmt;

use jsonwebtoken::{Algorithm, EncodingKey, Header};

use super::{Action, AuthScope, Claims, Resource};
use crate::error::AuthError;
use crate::shared::Extra;

/// Signs claim sets with the shared application secret.
///
/// Signing is deterministic: the same claims and secret always give the same
/// token.
#[derive(Clone)]
pub struct Signer {
    key: EncodingKey,
}

impl Signer {
    pub fn new(secret: &str) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.key)?;
        Ok(token)
    }

    /// Token for a request made with `method` under `scope`.
    pub fn sign_scope(&self, scope: &AuthScope, method: &str) -> Result<String, AuthError> {
        self.sign(&scope.claims(method))
    }

    /// Realtime read or write token for a single feed.
    pub fn feed_token(&self, feed_id: &str, action: Action) -> Result<String, AuthError> {
        let mut claims = Claims::new();
        claims.insert("resource".into(), Resource::Feed.as_str().into());
        claims.insert("action".into(), action.as_str().into());
        claims.insert("feed_id".into(), feed_id.into());
        self.sign(&claims)
    }

    /// Session token for a client-side user. `user_id` wins over any
    /// `user_id` key in `extra`.
    pub fn user_token(&self, user_id: &str, extra: Extra) -> Result<String, AuthError> {
        let mut claims: Claims = extra.into_iter().collect();
        claims.insert("user_id".into(), user_id.into());
        self.sign(&claims)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation};
    use serde_json::json;

    const SECRET: &str = "something very secret";

    fn decode(token: &str) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn test_feed_scope_token_is_deterministic() {
        let signer = Signer::new(SECRET);
        let scope = AuthScope::any_feed(Resource::Feed);
        let first = signer.sign_scope(&scope, "POST").unwrap();
        let second = signer.sign_scope(&scope, "POST").unwrap();
        assert_eq!(first, second);

        // Claims segment is the canonical sorted-key payload.
        let payload = first.split('.').nth(1).unwrap();
        assert_eq!(
            payload,
            "eyJhY3Rpb24iOiJ3cml0ZSIsImZlZWRfaWQiOiIqIiwicmVzb3VyY2UiOiJmZWVkIn0"
        );
        assert_eq!(
            decode(&first),
            scope.claims("POST"),
        );
    }

    #[test]
    fn test_different_secret_different_token() {
        let scope = AuthScope::App(Resource::Users);
        let a = Signer::new(SECRET).sign_scope(&scope, "GET").unwrap();
        let b = Signer::new("another secret").sign_scope(&scope, "GET").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_token() {
        let signer = Signer::new(SECRET);
        let mut extra = Extra::new();
        extra.insert("exp".into(), json!(1_900_000_000));
        extra.insert("user_id".into(), json!("mallory"));
        let claims = decode(&signer.user_token("alice", extra).unwrap());
        assert_eq!(claims["user_id"], json!("alice"));
        assert_eq!(claims["exp"], json!(1_900_000_000));
    }

    #[test]
    fn test_feed_token() {
        let signer = Signer::new(SECRET);
        let claims = decode(&signer.feed_token("user123", Action::Read).unwrap());
        assert_eq!(
            serde_json::to_value(claims).unwrap(),
            json!({"action": "read", "feed_id": "user123", "resource": "feed"})
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", Signer::new(SECRET)).contains("secret"));
    }
}
