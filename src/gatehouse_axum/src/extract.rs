use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use gatehouse_core::{AuthError, AuthenticationService, Claims, Group};

use crate::{error::ApiError, state::AppState};

/// A verified `Authorization: Bearer` token together with its claims.
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub token: String,
    pub claims: Claims,
}

impl BearerToken {
    /// Passes when the caller belongs to at least one of `groups`.
    pub fn require_any(&self, groups: &[Group]) -> Result<(), AuthError> {
        if groups.iter().any(|group| self.claims.is_member_of(*group)) {
            Ok(())
        } else {
            Err(AuthError::unauthorized("Insufficient permissions"))
        }
    }
}

impl<A> FromRequestParts<AppState<A>> for BearerToken
where
    A: AuthenticationService + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthError::unauthorized("Missing token"))?;

        let claims = state.auth.validate_token(bearer.token())?;

        Ok(Self {
            token: bearer.token().to_owned(),
            claims,
        })
    }
}

/// Claims of a caller in the `Admin` group. Rejects everyone else before the
/// body is read.
#[derive(Debug, Clone)]
pub struct AdminClaims(pub Claims);

impl<A> FromRequestParts<AppState<A>> for AdminClaims
where
    A: AuthenticationService + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A>,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        bearer.claims.require_group(Group::Admin)?;
        Ok(Self(bearer.claims))
    }
}
