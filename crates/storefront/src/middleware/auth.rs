//! Bearer-token authentication extractors.
//!
//! Handlers declare what they need by extractor: `RequireAuth` for any signed
//! in user, `RequireAdmin` for the admin panel, `OptionalAuth` for routes that
//! also serve guests.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use bazaar_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::Claims;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claims.user_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)?
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extractor that requires a valid bearer token with the admin role.
///
/// Rejects with 401 when the token is missing or invalid and 403 when the
/// user isn't an admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = authenticate(parts, state)?.ok_or(AppError::Unauthorized)?;
        if !claims.is_admin() {
            tracing::warn!(user_id = %claims.id, "non-admin attempted admin route");
            return Err(AppError::Forbidden);
        }
        Ok(Self(claims))
    }
}

/// Extractor that accepts requests with or without a bearer token.
///
/// A token that is present but invalid is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Claims>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Self)
    }
}

/// Verify the request's bearer token, if it carries one.
///
/// Verified claims are cached in the request extensions so later extractors
/// don't verify twice.
fn authenticate(parts: &mut Parts, state: &AppState) -> Result<Option<Claims>, AppError> {
    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Ok(Some(claims.clone()));
    }

    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens().verify(token).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        AppError::Unauthorized
    })?;

    set_sentry_user(&claims.id, Some(&claims.email));
    parts.extensions.insert(claims.clone());
    Ok(Some(claims))
}

/// Check that the token belongs to the user a request names.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the ids differ.
pub fn ensure_owner(claims: &Claims, user_id: UserId) -> Result<(), AppError> {
    if claims.id == user_id {
        Ok(())
    } else {
        tracing::warn!(token_user = %claims.id, requested_user = %user_id, "owner mismatch");
        Err(AppError::Unauthorized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Role;

    use super::*;

    fn claims(id: i32) -> Claims {
        Claims {
            id: UserId::new(id),
            role: Role::User,
            email: "carol@example.com".to_owned(),
            user_name: "carol".to_owned(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(&claims(5), UserId::new(5)).is_ok());
        assert!(matches!(
            ensure_owner(&claims(5), UserId::new(6)),
            Err(AppError::Unauthorized)
        ));
    }
}
