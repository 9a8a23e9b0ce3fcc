use gatehouse_core::{
    AuthError, AuthenticationService, RequestContext, VerificationCode, require_token,
};

/// Completes MFA enrolment by proving possession of the TOTP secret.
pub struct VerifyMfaUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> VerifyMfaUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "VerifyMfaUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        code: &str,
    ) -> Result<(), AuthError> {
        let access_token = require_token(access_token)?;
        let code = VerificationCode::parse(code)?;
        self.auth_service.verify_mfa(ctx, access_token, code).await
    }
}
