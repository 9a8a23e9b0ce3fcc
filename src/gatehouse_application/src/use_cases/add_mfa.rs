use gatehouse_core::{AuthError, AuthenticationService, MfaSecret, RequestContext, require_token};

/// Starts software-token MFA enrolment and returns the shared TOTP secret.
pub struct AddMfaUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> AddMfaUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "AddMfaUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<MfaSecret, AuthError> {
        let access_token = require_token(access_token)?;
        self.auth_service.add_mfa(ctx, access_token).await
    }
}
