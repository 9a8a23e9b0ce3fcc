use gatehouse_core::{AuthError, AuthenticationService, RequestContext, require_token};

pub struct RemoveMfaUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> RemoveMfaUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "RemoveMfaUseCase::execute", skip_all)]
    pub async fn execute(&self, ctx: &RequestContext, access_token: &str) -> Result<(), AuthError> {
        let access_token = require_token(access_token)?;
        self.auth_service
            .set_mfa_enabled(ctx, access_token, false)
            .await
    }
}
