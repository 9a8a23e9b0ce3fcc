use async_trait::async_trait;

use crate::{
    context::RequestContext,
    domain::{
        claims::Claims,
        credentials::{Credentials, Password, Registration, VerificationCode},
        error::AuthError,
        group::Group,
        profile::{CreateAdminOutput, MfaSecret, ReconciliationReport, SignUpOutput, UserProfile},
        session::{LoginOutcome, RefreshedTokens},
        username::Username,
    },
};

/// Provider-agnostic authentication contract.
///
/// Use cases talk to this trait only; provider vocabulary never crosses it.
/// Every failure is an [`AuthError`].
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: Credentials,
    ) -> Result<LoginOutcome, AuthError>;

    /// Answers a `NewPasswordRequired` login challenge.
    async fn set_new_password(
        &self,
        ctx: &RequestContext,
        username: Username,
        new_password: Password,
        session: String,
    ) -> Result<LoginOutcome, AuthError>;

    /// Answers a `SoftwareTokenMfa` login challenge.
    async fn verify_login_mfa(
        &self,
        ctx: &RequestContext,
        username: Username,
        code: VerificationCode,
        session: String,
    ) -> Result<LoginOutcome, AuthError>;

    async fn sign_up(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<SignUpOutput, AuthError>;

    async fn confirm_sign_up(
        &self,
        ctx: &RequestContext,
        username: Username,
        code: VerificationCode,
    ) -> Result<(), AuthError>;

    async fn resend_confirmation_code(
        &self,
        ctx: &RequestContext,
        username: Username,
    ) -> Result<(), AuthError>;

    async fn get_user(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<UserProfile, AuthError>;

    async fn admin_get_user(
        &self,
        ctx: &RequestContext,
        username: &Username,
    ) -> Result<UserProfile, AuthError>;

    async fn refresh_token(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
    ) -> Result<RefreshedTokens, AuthError>;

    async fn add_group(
        &self,
        ctx: &RequestContext,
        username: &Username,
        group: Group,
    ) -> Result<(), AuthError>;

    async fn remove_group(
        &self,
        ctx: &RequestContext,
        username: &Username,
        group: Group,
    ) -> Result<(), AuthError>;

    async fn create_admin(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<CreateAdminOutput, AuthError>;

    async fn add_mfa(&self, ctx: &RequestContext, access_token: &str)
    -> Result<MfaSecret, AuthError>;

    async fn verify_mfa(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        code: VerificationCode,
    ) -> Result<(), AuthError>;

    async fn set_mfa_enabled(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        enabled: bool,
    ) -> Result<(), AuthError>;

    async fn admin_set_mfa_enabled(
        &self,
        ctx: &RequestContext,
        username: &Username,
        enabled: bool,
    ) -> Result<(), AuthError>;

    async fn logout(&self, ctx: &RequestContext, access_token: &str) -> Result<(), AuthError>;

    /// Replays group assignments that failed after their identity was created.
    async fn reconcile_pending_groups(
        &self,
        ctx: &RequestContext,
    ) -> Result<ReconciliationReport, AuthError>;

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;
}
