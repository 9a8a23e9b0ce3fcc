use gatehouse_core::{
    AuthError, AuthenticationService, LoginOutcome, RequestContext, Username, VerificationCode,
    require_session,
};

/// Answers a `SOFTWARE_TOKEN_MFA` login challenge with a TOTP code.
pub struct VerifyLoginMfaUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> VerifyLoginMfaUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "VerifyLoginMfaUseCase::execute", skip(self, ctx, code, session))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        username: &str,
        code: &str,
        session: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let username = Username::parse(username)?;
        let code = VerificationCode::parse(code)?;
        let session = require_session(session)?;

        self.auth_service
            .verify_login_mfa(ctx, username, code, session.to_owned())
            .await
    }
}
