use gatehouse_core::{AuthError, AuthenticationService, RequestContext, UserProfile, require_token};

/// Profile of the caller identified by their access token.
pub struct GetMeUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> GetMeUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "GetMeUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<UserProfile, AuthError> {
        let access_token = require_token(access_token)?;
        self.auth_service.get_user(ctx, access_token).await
    }
}
