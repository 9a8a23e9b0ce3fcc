use gatehouse_core::{
    AuthError, AuthenticationService, RefreshedTokens, RequestContext, require_token,
};

pub struct RefreshTokenUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> RefreshTokenUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    /// Exchanges a refresh token for new access and id tokens. The refresh
    /// token itself is not rotated.
    #[tracing::instrument(name = "RefreshTokenUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
    ) -> Result<RefreshedTokens, AuthError> {
        let refresh_token = require_token(refresh_token)?;
        self.auth_service.refresh_token(ctx, refresh_token).await
    }
}
