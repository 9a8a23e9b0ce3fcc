use gatehouse_core::{AuthError, AuthenticationService, Claims, Group, RequestContext, Username};

/// Admin-only: switch software-token MFA off for another user.
pub struct AdminRemoveMfaUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> AdminRemoveMfaUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "AdminRemoveMfaUseCase::execute", skip(self, ctx, caller), fields(caller = %caller.email()))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        caller: &Claims,
        username: &str,
    ) -> Result<(), AuthError> {
        caller.require_group(Group::Admin)?;
        let username = Username::parse(username)?;

        self.auth_service
            .admin_set_mfa_enabled(ctx, &username, false)
            .await
    }
}
