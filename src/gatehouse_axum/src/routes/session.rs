use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use gatehouse_application::{GetMeUseCase, LogoutUseCase, RefreshTokenUseCase};
use gatehouse_core::{AuthenticationService, Group, RefreshedTokens, UserProfile};
use serde::Deserialize;

use crate::{error::ApiError, extract::BearerToken, state::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[tracing::instrument(name = "Refresh token", skip_all)]
pub async fn refresh<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshedTokens>, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    let tokens = RefreshTokenUseCase::new(state.auth.as_ref())
        .execute(&ctx, &request.refresh_token)
        .await?;

    Ok(Json(tokens))
}

#[tracing::instrument(name = "Get user", skip_all, fields(caller = %bearer.claims.email()))]
pub async fn get_user<A>(
    State(state): State<AppState<A>>,
    bearer: BearerToken,
) -> Result<Json<UserProfile>, ApiError>
where
    A: AuthenticationService + 'static,
{
    bearer.require_any(&[Group::User, Group::Admin])?;
    let ctx = state.request_context();

    let profile = GetMeUseCase::new(state.auth.as_ref())
        .execute(&ctx, &bearer.token)
        .await?;

    Ok(Json(profile))
}

#[tracing::instrument(name = "Logout", skip_all, fields(caller = %bearer.claims.email()))]
pub async fn logout<A>(
    State(state): State<AppState<A>>,
    bearer: BearerToken,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let ctx = state.request_context();

    LogoutUseCase::new(state.auth.as_ref())
        .execute(&ctx, &bearer.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
