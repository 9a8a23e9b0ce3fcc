use std::{future::Future, time::Duration};

use async_trait::async_trait;
use gatehouse_core::{
    AuthError, AuthenticationResult, AuthenticationService, Challenge, Claims, CreateAdminOutput,
    Credentials, Group, IdentityProvider, LoginOutcome, MfaSecret, Password,
    PendingGroupAssignment, PendingGroupStore, PendingGroupStoreError, ProviderError,
    ProviderUser, ReconciliationReport, RefreshedTokens, Registration, RequestContext,
    SessionTokens, SignUpOutput, TokenVerifier, UserAttribute, UserProfile, Username,
    VerificationCode,
};

use crate::{
    error_translator::{Operation, translate},
    token_validator::TokenValidator,
    workflow::{ProvisioningStep, ProvisioningWorkflow},
};

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct AuthServiceConfig {
    /// Upper bound for a single identity provider round trip. A request
    /// deadline shorter than this wins.
    pub provider_timeout: Duration,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Orchestrates identity provider calls behind [`AuthenticationService`].
///
/// Stateless per call: collaborators are injected, nothing is global, and
/// independent instances (one per user pool, say) can coexist.
pub struct AuthService<P, V, S> {
    provider: P,
    validator: TokenValidator<V>,
    pending_groups: S,
    config: AuthServiceConfig,
}

impl<P, V, S> AuthService<P, V, S>
where
    P: IdentityProvider,
    V: TokenVerifier,
    S: PendingGroupStore,
{
    pub fn new(provider: P, verifier: V, pending_groups: S, config: AuthServiceConfig) -> Self {
        Self {
            provider,
            validator: TokenValidator::new(verifier),
            pending_groups,
            config,
        }
    }

    /// Runs one provider round trip under the request's cancellation signal
    /// and time budget, translating failures for `operation`.
    async fn call<T>(
        &self,
        ctx: &RequestContext,
        operation: Operation,
        request: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, AuthError> {
        if ctx.is_cancelled() {
            return Err(cancelled(operation));
        }
        if ctx.remaining() == Some(Duration::ZERO) {
            tracing::error!(%operation, "Request deadline passed before the provider call");
            return Err(AuthError::internal());
        }

        let budget = ctx.budget(self.config.provider_timeout);

        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(cancelled(operation)),
            outcome = tokio::time::timeout(budget, request) => match outcome {
                Ok(result) => result.map_err(|error| translate(operation, &error)),
                Err(_) => {
                    tracing::error!(%operation, ?budget, "Identity provider call timed out");
                    Err(AuthError::internal())
                }
            },
        }
    }

    /// Second half of sign-up / admin creation. On failure the stranded
    /// identity is parked as a pending group assignment.
    async fn assign_initial_group(
        &self,
        ctx: &RequestContext,
        mut workflow: ProvisioningWorkflow,
    ) -> Result<(), AuthError> {
        match self
            .add_group(ctx, workflow.username(), workflow.group())
            .await
        {
            Ok(()) => {
                workflow.complete(ProvisioningStep::GroupAssigned);
                Ok(())
            }
            Err(error) => {
                if let Some(marker) = workflow.pending_assignment() {
                    self.park(marker).await;
                }
                Err(error)
            }
        }
    }

    async fn park(&self, marker: PendingGroupAssignment) {
        tracing::warn!(
            username = %marker.username,
            group = %marker.group,
            "Identity created without its group, recording pending assignment"
        );
        if let Err(error) = self.pending_groups.record(marker.clone()).await {
            tracing::error!(
                username = %marker.username,
                group = %marker.group,
                %error,
                "Failed to record pending group assignment, manual reconciliation required"
            );
        }
    }
}

fn cancelled(operation: Operation) -> AuthError {
    tracing::warn!(%operation, "Request cancelled, identity provider call abandoned");
    AuthError::internal()
}

fn store_failure(error: PendingGroupStoreError) -> AuthError {
    tracing::error!(%error, "Pending group store failure");
    AuthError::internal()
}

fn identity_attributes(registration: &Registration) -> [UserAttribute; 2] {
    [
        UserAttribute::new(UserAttribute::EMAIL, registration.username.as_str()),
        UserAttribute::new(UserAttribute::NAME, registration.display_name.as_str()),
    ]
}

fn profile(user: ProviderUser) -> UserProfile {
    let name = user
        .attribute(UserAttribute::NAME)
        .unwrap_or_default()
        .to_owned();
    UserProfile {
        username: user.username,
        name,
    }
}

fn login_outcome(
    operation: Operation,
    result: AuthenticationResult,
) -> Result<LoginOutcome, AuthError> {
    match result {
        AuthenticationResult::Tokens(tokens) => Ok(LoginOutcome::Authenticated(SessionTokens {
            access_token: tokens.access_token,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
        })),
        AuthenticationResult::Challenge { name, session } => match Challenge::from_name(&name) {
            Some(challenge) => Ok(LoginOutcome::ChallengeRequired { challenge, session }),
            None => {
                tracing::error!(%operation, challenge = %name, "Unsupported authentication challenge");
                Err(AuthError::internal())
            }
        },
    }
}

#[async_trait]
impl<P, V, S> AuthenticationService for AuthService<P, V, S>
where
    P: IdentityProvider,
    V: TokenVerifier,
    S: PendingGroupStore,
{
    #[tracing::instrument(name = "AuthService::login", skip_all, fields(username = %credentials.username))]
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: Credentials,
    ) -> Result<LoginOutcome, AuthError> {
        let result = self
            .call(
                ctx,
                Operation::Login,
                self.provider
                    .initiate_password_auth(&credentials.username, &credentials.password),
            )
            .await?;

        login_outcome(Operation::Login, result)
    }

    #[tracing::instrument(name = "AuthService::set_new_password", skip_all, fields(username = %username))]
    async fn set_new_password(
        &self,
        ctx: &RequestContext,
        username: Username,
        new_password: Password,
        session: String,
    ) -> Result<LoginOutcome, AuthError> {
        let result = self
            .call(
                ctx,
                Operation::SetNewPassword,
                self.provider
                    .respond_to_new_password_challenge(&username, &new_password, &session),
            )
            .await?;

        login_outcome(Operation::SetNewPassword, result)
    }

    #[tracing::instrument(name = "AuthService::verify_login_mfa", skip_all, fields(username = %username))]
    async fn verify_login_mfa(
        &self,
        ctx: &RequestContext,
        username: Username,
        code: VerificationCode,
        session: String,
    ) -> Result<LoginOutcome, AuthError> {
        let result = self
            .call(
                ctx,
                Operation::VerifyLoginMfa,
                self.provider
                    .respond_to_mfa_challenge(&username, &code, &session),
            )
            .await?;

        login_outcome(Operation::VerifyLoginMfa, result)
    }

    #[tracing::instrument(name = "AuthService::sign_up", skip_all, fields(username = %registration.username))]
    async fn sign_up(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<SignUpOutput, AuthError> {
        let mut workflow = ProvisioningWorkflow::new(registration.username.clone(), Group::User);

        let created = self
            .call(
                ctx,
                Operation::SignUp,
                self.provider.sign_up(
                    &registration.username,
                    &registration.password,
                    &identity_attributes(&registration),
                ),
            )
            .await?;
        workflow.complete(ProvisioningStep::IdentityCreated);

        self.assign_initial_group(ctx, workflow).await?;

        Ok(SignUpOutput {
            is_confirmed: created.user_confirmed,
        })
    }

    #[tracing::instrument(name = "AuthService::confirm_sign_up", skip_all, fields(username = %username))]
    async fn confirm_sign_up(
        &self,
        ctx: &RequestContext,
        username: Username,
        code: VerificationCode,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::ConfirmSignUp,
            self.provider.confirm_sign_up(&username, &code),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::resend_confirmation_code", skip_all, fields(username = %username))]
    async fn resend_confirmation_code(
        &self,
        ctx: &RequestContext,
        username: Username,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::ResendConfirmationCode,
            self.provider.resend_confirmation_code(&username),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::get_user", skip_all)]
    async fn get_user(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<UserProfile, AuthError> {
        self.call(ctx, Operation::GetUser, self.provider.get_user(access_token))
            .await
            .map(profile)
    }

    #[tracing::instrument(name = "AuthService::admin_get_user", skip_all, fields(username = %username))]
    async fn admin_get_user(
        &self,
        ctx: &RequestContext,
        username: &Username,
    ) -> Result<UserProfile, AuthError> {
        self.call(
            ctx,
            Operation::AdminGetUser,
            self.provider.admin_get_user(username),
        )
        .await
        .map(profile)
    }

    #[tracing::instrument(name = "AuthService::refresh_token", skip_all)]
    async fn refresh_token(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
    ) -> Result<RefreshedTokens, AuthError> {
        let result = self
            .call(
                ctx,
                Operation::RefreshToken,
                self.provider.refresh_tokens(refresh_token),
            )
            .await?;

        match result {
            AuthenticationResult::Tokens(tokens) => Ok(RefreshedTokens {
                access_token: tokens.access_token,
                id_token: tokens.id_token,
            }),
            AuthenticationResult::Challenge { name, .. } => {
                tracing::error!(challenge = %name, "Unexpected challenge on token refresh");
                Err(AuthError::internal())
            }
        }
    }

    #[tracing::instrument(name = "AuthService::add_group", skip_all, fields(username = %username, group = %group))]
    async fn add_group(
        &self,
        ctx: &RequestContext,
        username: &Username,
        group: Group,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::AddGroup,
            self.provider
                .admin_add_user_to_group(username, group.as_str()),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::remove_group", skip_all, fields(username = %username, group = %group))]
    async fn remove_group(
        &self,
        ctx: &RequestContext,
        username: &Username,
        group: Group,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::RemoveGroup,
            self.provider
                .admin_remove_user_from_group(username, group.as_str()),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::create_admin", skip_all, fields(username = %registration.username))]
    async fn create_admin(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<CreateAdminOutput, AuthError> {
        let mut workflow = ProvisioningWorkflow::new(registration.username.clone(), Group::Admin);

        self.call(
            ctx,
            Operation::CreateAdmin,
            self.provider.admin_create_user(
                &registration.username,
                &registration.password,
                &identity_attributes(&registration),
            ),
        )
        .await?;
        workflow.complete(ProvisioningStep::IdentityCreated);

        self.assign_initial_group(ctx, workflow).await?;

        Ok(CreateAdminOutput {
            username: registration.username.into(),
        })
    }

    #[tracing::instrument(name = "AuthService::add_mfa", skip_all)]
    async fn add_mfa(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<MfaSecret, AuthError> {
        let secret_code = self
            .call(
                ctx,
                Operation::AddMfa,
                self.provider.associate_software_token(access_token),
            )
            .await?;

        Ok(MfaSecret { secret_code })
    }

    #[tracing::instrument(name = "AuthService::verify_mfa", skip_all)]
    async fn verify_mfa(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        code: VerificationCode,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::VerifyMfa,
            self.provider.verify_software_token(access_token, &code),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::set_mfa_enabled", skip(self, ctx, access_token))]
    async fn set_mfa_enabled(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        enabled: bool,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::SetMfaPreference,
            self.provider.set_software_token_mfa(access_token, enabled),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::admin_set_mfa_enabled", skip(self, ctx))]
    async fn admin_set_mfa_enabled(
        &self,
        ctx: &RequestContext,
        username: &Username,
        enabled: bool,
    ) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::AdminSetMfaPreference,
            self.provider.admin_set_software_token_mfa(username, enabled),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::logout", skip_all)]
    async fn logout(&self, ctx: &RequestContext, access_token: &str) -> Result<(), AuthError> {
        self.call(
            ctx,
            Operation::Logout,
            self.provider.global_sign_out(access_token),
        )
        .await
    }

    #[tracing::instrument(name = "AuthService::reconcile_pending_groups", skip_all)]
    async fn reconcile_pending_groups(
        &self,
        ctx: &RequestContext,
    ) -> Result<ReconciliationReport, AuthError> {
        let pending = self.pending_groups.list().await.map_err(store_failure)?;
        let mut report = ReconciliationReport {
            resolved: 0,
            remaining: pending.len(),
        };

        for assignment in pending {
            if ctx.is_cancelled() {
                break;
            }

            match self
                .add_group(ctx, &assignment.username, assignment.group)
                .await
            {
                Ok(()) => {
                    self.pending_groups
                        .resolve(&assignment.username, assignment.group)
                        .await
                        .map_err(store_failure)?;
                    report.resolved += 1;
                    report.remaining -= 1;
                }
                Err(error) => {
                    tracing::warn!(
                        username = %assignment.username,
                        group = %assignment.group,
                        %error,
                        "Pending group assignment still failing"
                    );
                }
            }
        }

        tracing::info!(
            resolved = report.resolved,
            remaining = report.remaining,
            "Pending group reconciliation finished"
        );
        Ok(report)
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validator.validate(token)
    }
}
