use gatehouse_core::{AuthError, AuthenticationService, Credentials, LoginOutcome, RequestContext};
use secrecy::Secret;

/// Login use case - password authentication against the identity provider
pub struct LoginUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> LoginUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    /// Execute the login use case
    ///
    /// # Returns
    /// Session tokens, or the challenge the caller must answer first
    /// (forced password change, software-token MFA)
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, ctx, password))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: Secret<String>,
    ) -> Result<LoginOutcome, AuthError> {
        let credentials = Credentials::new(username, password)?;
        self.auth_service.login(ctx, credentials).await
    }
}
