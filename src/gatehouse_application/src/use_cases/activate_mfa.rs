use gatehouse_core::{AuthError, AuthenticationService, RequestContext, require_token};

/// Makes software-token MFA the caller's preferred second factor.
pub struct ActivateMfaUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> ActivateMfaUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "ActivateMfaUseCase::execute", skip_all)]
    pub async fn execute(&self, ctx: &RequestContext, access_token: &str) -> Result<(), AuthError> {
        let access_token = require_token(access_token)?;
        self.auth_service
            .set_mfa_enabled(ctx, access_token, true)
            .await
    }
}
