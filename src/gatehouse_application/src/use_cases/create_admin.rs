use gatehouse_core::{
    AuthError, AuthenticationService, Claims, CreateAdminOutput, Group, Registration,
    RequestContext,
};
use secrecy::Secret;

/// Admin-only: provision another administrator with a temporary password.
pub struct CreateAdminUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> CreateAdminUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    /// Execute the create-admin use case
    ///
    /// The identity provider delivers the temporary password by email; the
    /// new admin answers a `NEW_PASSWORD_REQUIRED` challenge on first login.
    #[tracing::instrument(
        name = "CreateAdminUseCase::execute",
        skip(self, ctx, caller, temporary_password),
        fields(caller = %caller.email())
    )]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        caller: &Claims,
        username: &str,
        temporary_password: Secret<String>,
        name: &str,
    ) -> Result<CreateAdminOutput, AuthError> {
        caller.require_group(Group::Admin)?;
        let registration = Registration::new(username, temporary_password, name)?;

        self.auth_service.create_admin(ctx, registration).await
    }
}
