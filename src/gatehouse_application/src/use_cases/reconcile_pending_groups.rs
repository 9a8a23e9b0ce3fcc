use gatehouse_core::{
    AuthError, AuthenticationService, Claims, Group, ReconciliationReport, RequestContext,
};

/// Admin-only: replay group assignments left behind by half-finished
/// provisioning.
pub struct ReconcilePendingGroupsUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> ReconcilePendingGroupsUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "ReconcilePendingGroupsUseCase::execute", skip_all, fields(caller = %caller.email()))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        caller: &Claims,
    ) -> Result<ReconciliationReport, AuthError> {
        caller.require_group(Group::Admin)?;
        self.auth_service.reconcile_pending_groups(ctx).await
    }
}
