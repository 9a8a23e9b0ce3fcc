use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use gatehouse_application::{ActivateMfaUseCase, AddMfaUseCase, RemoveMfaUseCase, VerifyMfaUseCase};
use gatehouse_core::{AuthenticationService, MfaSecret};
use serde::Deserialize;

use crate::{error::ApiError, extract::BearerToken, state::AppState};

#[derive(Deserialize)]
pub struct VerifyMfaRequest {
    pub code: String,
}

/// Starts software-token enrolment and returns the shared secret.
#[tracing::instrument(name = "Add MFA", skip_all)]
pub async fn add_mfa<A>(
    State(state): State<AppState<A>>,
    bearer: BearerToken,
) -> Result<Json<MfaSecret>, ApiError>
where
    A: AuthenticationService + 'static,
{
    let ctx = state.request_context();

    let secret = AddMfaUseCase::new(state.auth.as_ref())
        .execute(&ctx, &bearer.token)
        .await?;

    Ok(Json(secret))
}

#[tracing::instrument(name = "Verify MFA", skip_all)]
pub async fn verify_mfa<A>(
    State(state): State<AppState<A>>,
    bearer: BearerToken,
    request: Result<Json<VerifyMfaRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    VerifyMfaUseCase::new(state.auth.as_ref())
        .execute(&ctx, &bearer.token, &request.code)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Activate MFA", skip_all)]
pub async fn activate_mfa<A>(
    State(state): State<AppState<A>>,
    bearer: BearerToken,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let ctx = state.request_context();

    ActivateMfaUseCase::new(state.auth.as_ref())
        .execute(&ctx, &bearer.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Remove MFA", skip_all)]
pub async fn remove_mfa<A>(
    State(state): State<AppState<A>>,
    bearer: BearerToken,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let ctx = state.request_context();

    RemoveMfaUseCase::new(state.auth.as_ref())
        .execute(&ctx, &bearer.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
