pub mod context;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use context::RequestContext;

pub use domain::{
    claims::Claims,
    credentials::{Credentials, Password, Registration, VerificationCode},
    error::{AuthError, StatusClass},
    group::Group,
    profile::{CreateAdminOutput, MfaSecret, ReconciliationReport, SignUpOutput, UserProfile},
    session::{Challenge, LoginOutcome, RefreshedTokens, SessionTokens},
    username::{Username, normalize},
    validation::{InputError, require_session, require_token},
};

pub use ports::{
    identity_provider::{
        AuthenticationResult, IdentityProvider, ProviderError, ProviderErrorKind, ProviderSignUp,
        ProviderTokens, ProviderUser, UserAttribute,
    },
    repositories::{PendingGroupAssignment, PendingGroupStore, PendingGroupStoreError},
    services::AuthenticationService,
    token_verifier::{TokenVerifier, VerificationError, VerifiedToken},
};
