use gatehouse_core::{AuthError, AuthenticationService, Claims, Group, RequestContext, Username};

/// Admin-only: take a user out of a group.
pub struct RemoveGroupUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> RemoveGroupUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "RemoveGroupUseCase::execute", skip(self, ctx, caller), fields(caller = %caller.email()))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        caller: &Claims,
        username: &str,
        group: &str,
    ) -> Result<(), AuthError> {
        caller.require_group(Group::Admin)?;
        let username = Username::parse(username)?;
        let group: Group = group.parse()?;

        self.auth_service.remove_group(ctx, &username, group).await
    }
}
