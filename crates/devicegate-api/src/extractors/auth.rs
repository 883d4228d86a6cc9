//! `VerifiedUser` extractor: pulls the bearer token from the Authorization
//! header and verifies it against the identity provider secret.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use devicegate_auth::IdentityClaims;
use devicegate_core::error::AppError;
use devicegate_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The principal proven by a valid identity token.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    /// Subject of the token.
    pub user_id: UserId,
    /// Full claim set.
    pub claims: IdentityClaims,
}

impl VerifiedUser {
    /// Rejects requests that act on behalf of a different user.
    pub fn ensure_owns(&self, user_id: &UserId) -> Result<(), AppError> {
        if &self.user_id != user_id {
            warn!(
                token_subject = %self.user_id,
                requested_user_id = %user_id,
                "Token subject does not match requested user"
            );
            return Err(AppError::authorization(
                "Token subject does not match user_id",
            ));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.verifier.verify(token)?;
        let user_id = claims.user_id()?;

        Ok(Self { user_id, claims })
    }
}
