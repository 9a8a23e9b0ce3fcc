use gatehouse_core::{AuthError, AuthenticationService, Claims, Group, RequestContext, Username};

/// Admin-only: put an existing user into a group.
pub struct AddGroupUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> AddGroupUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    /// Execute the add-group use case
    ///
    /// The caller must be an `Admin`. The target user is looked up first so
    /// an unknown user is reported as such before any membership change.
    #[tracing::instrument(name = "AddGroupUseCase::execute", skip(self, ctx, caller), fields(caller = %caller.email()))]
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

        self.auth_service.admin_get_user(ctx, &username).await?;
        self.auth_service.add_group(ctx, &username, group).await
    }
}
