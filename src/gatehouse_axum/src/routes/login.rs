use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use gatehouse_application::{LoginUseCase, SetPasswordUseCase, VerifyLoginMfaUseCase};
use gatehouse_core::{AuthenticationService, LoginOutcome};
use secrecy::Secret;
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    pub username: String,
    pub new_password: Secret<String>,
    pub session: String,
}

#[derive(Deserialize)]
pub struct LoginMfaRequest {
    pub username: String,
    pub code: String,
    pub session: String,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginOutcome>, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    let outcome = LoginUseCase::new(state.auth.as_ref())
        .execute(&ctx, &request.username, request.password)
        .await?;

    Ok(Json(outcome))
}

#[tracing::instrument(name = "Set new password", skip_all)]
pub async fn new_password<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<NewPasswordRequest>, JsonRejection>,
) -> Result<Json<LoginOutcome>, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    let outcome = SetPasswordUseCase::new(state.auth.as_ref())
        .execute(
            &ctx,
            &request.username,
            request.new_password,
            &request.session,
        )
        .await?;

    Ok(Json(outcome))
}

#[tracing::instrument(name = "Verify login MFA", skip_all)]
pub async fn login_mfa<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<LoginMfaRequest>, JsonRejection>,
) -> Result<Json<LoginOutcome>, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    let outcome = VerifyLoginMfaUseCase::new(state.auth.as_ref())
        .execute(&ctx, &request.username, &request.code, &request.session)
        .await?;

    Ok(Json(outcome))
}
