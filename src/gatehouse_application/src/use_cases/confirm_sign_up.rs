use gatehouse_core::{AuthError, AuthenticationService, RequestContext, Username, VerificationCode};

pub struct ConfirmSignUpUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> ConfirmSignUpUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "ConfirmSignUpUseCase::execute", skip(self, ctx, code))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        username: &str,
        code: &str,
    ) -> Result<(), AuthError> {
        let username = Username::parse(username)?;
        let code = VerificationCode::parse(code)?;
        self.auth_service.confirm_sign_up(ctx, username, code).await
    }
}
