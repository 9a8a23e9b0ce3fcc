use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use gatehouse_application::{ConfirmSignUpUseCase, SendConfirmationCodeUseCase, SignUpUseCase};
use gatehouse_core::{AuthenticationService, SignUpOutput};
use secrecy::Secret;
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub password: Secret<String>,
    pub name: String,
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub username: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct ResendRequest {
    pub username: String,
}

#[tracing::instrument(name = "Sign up", skip_all)]
pub async fn sign_up<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignUpOutput>), ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    let output = SignUpUseCase::new(state.auth.as_ref())
        .execute(&ctx, &request.username, request.password, &request.name)
        .await?;

    Ok((StatusCode::CREATED, Json(output)))
}

#[tracing::instrument(name = "Confirm sign up", skip_all)]
pub async fn confirm<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    ConfirmSignUpUseCase::new(state.auth.as_ref())
        .execute(&ctx, &request.username, &request.code)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Resend confirmation code", skip_all)]
pub async fn resend_confirmation<A>(
    State(state): State<AppState<A>>,
    request: Result<Json<ResendRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    SendConfirmationCodeUseCase::new(state.auth.as_ref())
        .execute(&ctx, &request.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
