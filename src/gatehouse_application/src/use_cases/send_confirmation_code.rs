use gatehouse_core::{AuthError, AuthenticationService, RequestContext, Username};

/// Asks the identity provider to deliver a fresh sign-up confirmation code.
pub struct SendConfirmationCodeUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> SendConfirmationCodeUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "SendConfirmationCodeUseCase::execute", skip(self, ctx))]
    pub async fn execute(&self, ctx: &RequestContext, username: &str) -> Result<(), AuthError> {
        let username = Username::parse(username)?;
        self.auth_service
            .resend_confirmation_code(ctx, username)
            .await
    }
}
