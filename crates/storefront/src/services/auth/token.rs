//! Bearer token issuing and verification (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::{Role, UserId};

use crate::models::user::{PublicUser, User};

/// Token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's `exp` is in the past.
    #[error("token has expired")]
    Expired,

    /// Bad signature, wrong algorithm, or malformed token.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: UserId,
    pub role: Role,
    pub email: String,
    pub user_name: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Claims> for PublicUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email.clone(),
            role: claims.role,
            user_name: claims.user_name.clone(),
        }
    }
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_minutes: i64) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            id: user.id,
            role: user.role,
            email: user.email.as_str().to_owned(),
            user_name: user.user_name.as_str().to_owned(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for expired tokens and
    /// `TokenError::Invalid` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Email, UserName};

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            &SecretString::from("Zq8#mV2!pL9@tR4$wX7^nB1&kD6*hF3%"),
            60,
        )
    }

    fn alice() -> User {
        User {
            id: UserId::new(42),
            user_name: UserName::parse("alice").unwrap(),
            email: Email::parse("alice@example.com").unwrap(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer();
        let token = issuer.issue(&alice()).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.id, UserId::new(42));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.user_name, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let token = issuer
            .sign(&Claims {
                id: UserId::new(1),
                role: Role::User,
                email: "bob@example.com".to_owned(),
                user_name: "bob".to_owned(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer();
        let token = issuer.issue(&alice()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = "eyJpZCI6MSwicm9sZSI6ImFkbWluIn0";
        parts[1] = forged_payload;
        let forged = parts.join(".");

        assert!(matches!(
            issuer.verify(&forged),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = issuer().issue(&alice()).unwrap();
        let other = TokenIssuer::new(
            &SecretString::from("Yw3!rT8@eQ1#uI6$oP0^aS5&dF9*gH2%"),
            60,
        );
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", issuer());
        assert!(!debug.contains("Zq8#"));
    }
}
