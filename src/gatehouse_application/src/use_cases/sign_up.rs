use gatehouse_core::{AuthError, AuthenticationService, Registration, RequestContext, SignUpOutput};
use secrecy::Secret;

/// Self-service registration. The new identity always lands in `User`.
pub struct SignUpUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> SignUpUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "SignUpUseCase::execute", skip(self, ctx, password))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: Secret<String>,
        name: &str,
    ) -> Result<SignUpOutput, AuthError> {
        let registration = Registration::new(username, password, name)?;
        self.auth_service.sign_up(ctx, registration).await
    }
}
