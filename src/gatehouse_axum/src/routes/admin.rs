use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use gatehouse_application::{
    AddGroupUseCase, AdminRemoveMfaUseCase, CreateAdminUseCase, ReconcilePendingGroupsUseCase,
    RemoveGroupUseCase,
};
use gatehouse_core::{AuthenticationService, CreateAdminOutput, ReconciliationReport};
use secrecy::Secret;
use serde::Deserialize;

use crate::{error::ApiError, extract::AdminClaims, state::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub username: String,
    pub temporary_password: Secret<String>,
    pub name: String,
}

#[derive(Deserialize)]
pub struct GroupRequest {
    pub username: String,
    pub group: String,
}

#[derive(Deserialize)]
pub struct AdminMfaRequest {
    pub username: String,
}

#[tracing::instrument(name = "Create admin", skip_all, fields(caller = %admin.0.email()))]
pub async fn create_admin<A>(
    State(state): State<AppState<A>>,
    admin: AdminClaims,
    request: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateAdminOutput>), ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    let output = CreateAdminUseCase::new(state.auth.as_ref())
        .execute(
            &ctx,
            &admin.0,
            &request.username,
            request.temporary_password,
            &request.name,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(output)))
}

#[tracing::instrument(name = "Add group", skip_all, fields(caller = %admin.0.email()))]
pub async fn add_group<A>(
    State(state): State<AppState<A>>,
    admin: AdminClaims,
    request: Result<Json<GroupRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    AddGroupUseCase::new(state.auth.as_ref())
        .execute(&ctx, &admin.0, &request.username, &request.group)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Remove group", skip_all, fields(caller = %admin.0.email()))]
pub async fn remove_group<A>(
    State(state): State<AppState<A>>,
    admin: AdminClaims,
    request: Result<Json<GroupRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    RemoveGroupUseCase::new(state.auth.as_ref())
        .execute(&ctx, &admin.0, &request.username, &request.group)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Admin remove MFA", skip_all, fields(caller = %admin.0.email()))]
pub async fn remove_mfa<A>(
    State(state): State<AppState<A>>,
    admin: AdminClaims,
    request: Result<Json<AdminMfaRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    A: AuthenticationService + 'static,
{
    let Json(request) = request?;
    let ctx = state.request_context();

    AdminRemoveMfaUseCase::new(state.auth.as_ref())
        .execute(&ctx, &admin.0, &request.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "Reconcile pending groups", skip_all, fields(caller = %admin.0.email()))]
pub async fn reconcile<A>(
    State(state): State<AppState<A>>,
    admin: AdminClaims,
) -> Result<Json<ReconciliationReport>, ApiError>
where
    A: AuthenticationService + 'static,
{
    let ctx = state.request_context();

    let report = ReconcilePendingGroupsUseCase::new(state.auth.as_ref())
        .execute(&ctx, &admin.0)
        .await?;

    Ok(Json(report))
}
