//! Authentication service.
//!
//! Password registration and login. Login hands back a signed bearer token;
//! there is no server-side session, so logout is the client dropping it.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenIssuer};

use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::{Email, UserName};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Bcrypt work factor.
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (bcrypt ignores anything past 72 bytes).
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user with the default role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `InvalidUserName` for malformed input.
    /// Returns `AuthError::WeakPassword` if the password length is out of range.
    /// Returns `AuthError::UserAlreadyExists` if the email or user name is taken.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user_name = UserName::parse(user_name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password).await?;

        let user = self
            .users
            .create(&user_name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }
}

/// Validate password length.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with bcrypt on the blocking pool.
async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AuthError::PasswordHash(format!("task join error: {e}")))?
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a bcrypt hash on the blocking pool.
///
/// A stored hash bcrypt cannot parse counts as a mismatch.
async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AuthError::PasswordHash(format!("task join error: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_bounds() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("exactly8").is_ok());
        assert!(validate_password(&"a".repeat(72)).is_ok());
        assert!(matches!(
            validate_password(&"a".repeat(73)),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let password = "correct horse battery";
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, 4))
            .await
            .unwrap()
            .unwrap();

        assert!(verify_password(password, &hash).await.unwrap());
        assert!(!verify_password("wrong password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_garbage_hash_is_mismatch() {
        assert!(!verify_password("whatever1", "not-a-bcrypt-hash").await.unwrap());
    }
}
