use gatehouse_core::{AuthError, AuthenticationService, RequestContext, require_token};

/// Logout use case - revokes every token the provider issued to the caller
pub struct LogoutUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> LogoutUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, ctx: &RequestContext, access_token: &str) -> Result<(), AuthError> {
        let access_token = require_token(access_token)?;
        self.auth_service.logout(ctx, access_token).await
    }
}
