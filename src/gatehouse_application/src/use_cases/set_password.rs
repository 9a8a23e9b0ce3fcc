use gatehouse_core::{
    AuthError, AuthenticationService, LoginOutcome, Password, RequestContext, Username,
    require_session,
};
use secrecy::Secret;

/// Answers a `NEW_PASSWORD_REQUIRED` login challenge.
pub struct SetPasswordUseCase<'a, A: AuthenticationService> {
    auth_service: &'a A,
}

impl<'a, A: AuthenticationService> SetPasswordUseCase<'a, A> {
    pub fn new(auth_service: &'a A) -> Self {
        Self { auth_service }
    }

    #[tracing::instrument(name = "SetPasswordUseCase::execute", skip(self, ctx, new_password, session))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        username: &str,
        new_password: Secret<String>,
        session: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let username = Username::parse(username)?;
        let new_password = Password::try_from(new_password)?;
        let session = require_session(session)?;

        self.auth_service
            .set_new_password(ctx, username, new_password, session.to_owned())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockIdentityProvider, auth_service};
    use gatehouse_core::{ProviderErrorKind, StatusClass};

    #[tokio::test]
    async fn test_new_password_completes_login() {
        let provider = MockIdentityProvider::new();
        let service = auth_service(&provider);

        let outcome = SetPasswordUseCase::new(&service)
            .execute(
                &RequestContext::new(),
                "Bob@Example.com",
                Secret::new("Br4nd-new".to_owned()),
                "challenge-session",
            )
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Authenticated(_)));
        assert_eq!(provider.calls(), vec!["respond_to_new_password_challenge"]);
    }

    #[tokio::test]
    async fn test_missing_session_is_bad_request() {
        let provider = MockIdentityProvider::new();
        let service = auth_service(&provider);

        let error = SetPasswordUseCase::new(&service)
            .execute(
                &RequestContext::new(),
                "bob@example.com",
                Secret::new("Br4nd-new".to_owned()),
                " ",
            )
            .await
            .unwrap_err();

        assert_eq!(error.status(), StatusClass::BadRequest);
        assert_eq!(error.message(), "Session is required");
    }

    #[tokio::test]
    async fn test_weak_password_is_bad_request() {
        let provider = MockIdentityProvider::new()
            .fail("respond_to_new_password_challenge", ProviderErrorKind::InvalidPassword);
        let service = auth_service(&provider);

        let error = SetPasswordUseCase::new(&service)
            .execute(
                &RequestContext::new(),
                "bob@example.com",
                Secret::new("weak".to_owned()),
                "challenge-session",
            )
            .await
            .unwrap_err();

        assert_eq!(error.status(), StatusClass::BadRequest);
        assert_eq!(error.message(), "Password does not meet requirements");
    }
}
