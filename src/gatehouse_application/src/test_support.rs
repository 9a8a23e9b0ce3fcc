//! Scriptable port implementations shared by the unit tests of this crate.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use gatehouse_core::{
    AuthenticationResult, Claims, Group, IdentityProvider, Password, PendingGroupAssignment,
    PendingGroupStore, PendingGroupStoreError, ProviderError, ProviderErrorKind, ProviderSignUp,
    ProviderTokens, ProviderUser, TokenVerifier, UserAttribute, Username, VerificationCode,
    VerificationError, VerifiedToken,
};

use crate::auth_service::{AuthService, AuthServiceConfig};

pub type TestAuthService = AuthService<MockIdentityProvider, StaticVerifier, MockPendingGroupStore>;

pub fn auth_service(provider: &MockIdentityProvider) -> TestAuthService {
    auth_service_with_store(provider, &MockPendingGroupStore::default())
}

pub fn auth_service_with_store(
    provider: &MockIdentityProvider,
    store: &MockPendingGroupStore,
) -> TestAuthService {
    AuthService::new(
        provider.clone(),
        StaticVerifier::default(),
        store.clone(),
        AuthServiceConfig::default(),
    )
}

/// Claims for a verified caller in `groups`.
pub fn claims(email: &str, groups: &[&str]) -> Claims {
    StaticVerifier::default()
        .with_token(
            "caller",
            VerifiedToken {
                subject: format!("sub-{email}"),
                email: Some(email.to_owned()),
                groups: groups.iter().map(|group| group.to_string()).collect(),
            },
        )
        .verify_claims("caller")
        .unwrap()
}

pub fn admin_claims() -> Claims {
    claims("root@example.com", &["Admin"])
}

pub fn user_claims() -> Claims {
    claims("plain@example.com", &["User"])
}

#[derive(Debug, Clone)]
struct MockUser {
    name: String,
    groups: BTreeSet<String>,
}

#[derive(Default)]
struct MockState {
    failures: HashMap<&'static str, ProviderErrorKind>,
    calls: Vec<&'static str>,
    users: BTreeMap<String, MockUser>,
    login_challenge: Option<String>,
    confirmed_on_sign_up: bool,
    delay: Option<Duration>,
}

/// In-process identity provider whose failures are scripted per method.
#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(self, method: &'static str, kind: ProviderErrorKind) -> Self {
        self.state.lock().unwrap().failures.insert(method, kind);
        self
    }

    pub fn with_user(self, username: &str, name: &str, groups: &[&str]) -> Self {
        self.state.lock().unwrap().users.insert(
            username.to_owned(),
            MockUser {
                name: name.to_owned(),
                groups: groups.iter().map(|g| g.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_login_challenge(self, name: &str) -> Self {
        self.state.lock().unwrap().login_challenge = Some(name.to_owned());
        self
    }

    pub fn confirming_sign_ups(self) -> Self {
        self.state.lock().unwrap().confirmed_on_sign_up = true;
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.calls().iter().any(|call| *call == method)
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.state.lock().unwrap().users.contains_key(username)
    }

    pub fn groups_of(&self, username: &str) -> Option<BTreeSet<String>> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(username)
            .map(|user| user.groups.clone())
    }

    async fn enter(&self, method: &'static str) -> Result<(), ProviderError> {
        let (delay, failure) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(method);
            (state.delay, state.failures.get(method).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(kind) => Err(ProviderError::new(kind, format!("{method} scripted failure"))),
            None => Ok(()),
        }
    }

    fn tokens(username: &Username) -> AuthenticationResult {
        AuthenticationResult::Tokens(ProviderTokens {
            access_token: format!("access:{username}"),
            id_token: format!("id:{username}"),
            refresh_token: Some(format!("refresh:{username}")),
        })
    }

    fn owner_of(&self, access_token: &str) -> Result<String, ProviderError> {
        access_token
            .strip_prefix("access:")
            .filter(|username| self.user_exists(username))
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::NotAuthorized, "bad token"))
    }

    fn profile(&self, username: &str) -> Result<ProviderUser, ProviderError> {
        let state = self.state.lock().unwrap();
        let user = state
            .users
            .get(username)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::UserNotFound, "no user"))?;
        Ok(ProviderUser {
            username: username.to_owned(),
            attributes: vec![
                UserAttribute::new(UserAttribute::EMAIL, username),
                UserAttribute::new(UserAttribute::NAME, user.name.clone()),
            ],
        })
    }

    fn create(&self, username: &Username, attributes: &[UserAttribute]) {
        let name = attributes
            .iter()
            .find(|attribute| attribute.name == UserAttribute::NAME)
            .map(|attribute| attribute.value.clone())
            .unwrap_or_default();
        self.state.lock().unwrap().users.insert(
            username.to_string(),
            MockUser {
                name,
                groups: BTreeSet::new(),
            },
        );
    }

    fn change_group(&self, username: &Username, group: &str, add: bool) -> Result<(), ProviderError> {
        if Group::ALL.iter().all(|known| known.as_str() != group) {
            return Err(ProviderError::new(
                ProviderErrorKind::ResourceNotFound,
                "no group",
            ));
        }
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .get_mut(username.as_str())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::UserNotFound, "no user"))?;
        if add {
            user.groups.insert(group.to_owned());
        } else {
            user.groups.remove(group);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn initiate_password_auth(
        &self,
        username: &Username,
        _password: &Password,
    ) -> Result<AuthenticationResult, ProviderError> {
        self.enter("initiate_password_auth").await?;
        let challenge = self.state.lock().unwrap().login_challenge.clone();
        match challenge {
            Some(name) => Ok(AuthenticationResult::Challenge {
                name,
                session: "challenge-session".to_owned(),
            }),
            None => Ok(Self::tokens(username)),
        }
    }

    async fn respond_to_new_password_challenge(
        &self,
        username: &Username,
        _new_password: &Password,
        _session: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        self.enter("respond_to_new_password_challenge").await?;
        Ok(Self::tokens(username))
    }

    async fn respond_to_mfa_challenge(
        &self,
        username: &Username,
        _code: &VerificationCode,
        _session: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        self.enter("respond_to_mfa_challenge").await?;
        Ok(Self::tokens(username))
    }

    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        self.enter("refresh_tokens").await?;
        Ok(AuthenticationResult::Tokens(ProviderTokens {
            access_token: format!("access-from-{refresh_token}"),
            id_token: format!("id-from-{refresh_token}"),
            refresh_token: None,
        }))
    }

    async fn sign_up(
        &self,
        username: &Username,
        _password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderSignUp, ProviderError> {
        self.enter("sign_up").await?;
        if self.user_exists(username.as_str()) {
            return Err(ProviderError::new(
                ProviderErrorKind::UsernameExists,
                "exists",
            ));
        }
        self.create(username, attributes);
        Ok(ProviderSignUp {
            user_confirmed: self.state.lock().unwrap().confirmed_on_sign_up,
            user_sub: Some(format!("sub-{username}")),
        })
    }

    async fn confirm_sign_up(
        &self,
        _username: &Username,
        _code: &VerificationCode,
    ) -> Result<(), ProviderError> {
        self.enter("confirm_sign_up").await
    }

    async fn resend_confirmation_code(&self, _username: &Username) -> Result<(), ProviderError> {
        self.enter("resend_confirmation_code").await
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        self.enter("get_user").await?;
        let username = self.owner_of(access_token)?;
        self.profile(&username)
    }

    async fn admin_get_user(&self, username: &Username) -> Result<ProviderUser, ProviderError> {
        self.enter("admin_get_user").await?;
        self.profile(username.as_str())
    }

    async fn admin_create_user(
        &self,
        username: &Username,
        _temporary_password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderUser, ProviderError> {
        self.enter("admin_create_user").await?;
        if self.user_exists(username.as_str()) {
            return Err(ProviderError::new(
                ProviderErrorKind::UsernameExists,
                "exists",
            ));
        }
        self.create(username, attributes);
        self.profile(username.as_str())
    }

    async fn admin_add_user_to_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError> {
        self.enter("admin_add_user_to_group").await?;
        self.change_group(username, group, true)
    }

    async fn admin_remove_user_from_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError> {
        self.enter("admin_remove_user_from_group").await?;
        self.change_group(username, group, false)
    }

    async fn associate_software_token(&self, access_token: &str) -> Result<String, ProviderError> {
        self.enter("associate_software_token").await?;
        self.owner_of(access_token)?;
        Ok("JBSWY3DPEHPK3PXP".to_owned())
    }

    async fn verify_software_token(
        &self,
        access_token: &str,
        _code: &VerificationCode,
    ) -> Result<(), ProviderError> {
        self.enter("verify_software_token").await?;
        self.owner_of(access_token).map(|_| ())
    }

    async fn set_software_token_mfa(
        &self,
        access_token: &str,
        _enabled: bool,
    ) -> Result<(), ProviderError> {
        self.enter("set_software_token_mfa").await?;
        self.owner_of(access_token).map(|_| ())
    }

    async fn admin_set_software_token_mfa(
        &self,
        username: &Username,
        _enabled: bool,
    ) -> Result<(), ProviderError> {
        self.enter("admin_set_software_token_mfa").await?;
        self.profile(username.as_str()).map(|_| ())
    }

    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.enter("global_sign_out").await?;
        self.owner_of(access_token).map(|_| ())
    }
}

/// Verifier answering from a fixed token table.
#[derive(Clone, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, Result<VerifiedToken, VerificationError>>,
}

impl StaticVerifier {
    pub fn with_token(mut self, token: &str, verified: VerifiedToken) -> Self {
        self.tokens.insert(token.to_owned(), Ok(verified));
        self
    }

    pub fn with_failure(mut self, token: &str, error: VerificationError) -> Self {
        self.tokens.insert(token.to_owned(), Err(error));
        self
    }
}

impl TokenVerifier for StaticVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedToken, VerificationError> {
        self.tokens
            .get(token)
            .cloned()
            .unwrap_or_else(|| Err(VerificationError::Malformed("unknown token".to_owned())))
    }
}

#[derive(Clone, Default)]
pub struct MockPendingGroupStore {
    markers: Arc<Mutex<BTreeMap<String, PendingGroupAssignment>>>,
    broken: bool,
}

impl MockPendingGroupStore {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn markers(&self) -> Vec<PendingGroupAssignment> {
        self.markers.lock().unwrap().values().cloned().collect()
    }

    fn check(&self) -> Result<(), PendingGroupStoreError> {
        if self.broken {
            return Err(PendingGroupStoreError::DatabaseError("store down".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl PendingGroupStore for MockPendingGroupStore {
    async fn record(
        &self,
        assignment: PendingGroupAssignment,
    ) -> Result<(), PendingGroupStoreError> {
        self.check()?;
        self.markers
            .lock()
            .unwrap()
            .insert(assignment.key(), assignment);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PendingGroupAssignment>, PendingGroupStoreError> {
        self.check()?;
        Ok(self.markers())
    }

    async fn resolve(
        &self,
        username: &Username,
        group: Group,
    ) -> Result<(), PendingGroupStoreError> {
        self.check()?;
        self.markers
            .lock()
            .unwrap()
            .remove(&format!("{username}:{group}"));
        Ok(())
    }
}
