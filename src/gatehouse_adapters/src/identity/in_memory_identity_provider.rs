use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use gatehouse_core::{
    AuthenticationResult, Group, IdentityProvider, Password, ProviderError, ProviderErrorKind,
    ProviderSignUp, ProviderTokens, ProviderUser, UserAttribute, Username, VerificationCode,
};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::verification::{ACCESS_TOKEN_USE, ID_TOKEN_USE, TokenClaims, claims_for, issue_token};

pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Wrong codes tolerated before an MFA challenge session is burned.
pub const MAX_CHALLENGE_ATTEMPTS: u8 = 3;
const SESSION_TTL_SECONDS: i64 = 180;
const REFRESH_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone)]
pub struct InMemoryIdentityProviderConfig {
    /// HS256 secret the issued tokens are signed with.
    pub token_secret: Secret<String>,
    pub token_ttl_seconds: i64,
    /// Confirm sign-ups immediately instead of waiting for the code.
    pub auto_confirm: bool,
}

#[derive(Default)]
struct SoftwareToken {
    secret: Option<String>,
    expected_code: Option<String>,
    verified: bool,
    enabled: bool,
}

struct PoolUser {
    sub: String,
    password: Secret<String>,
    attributes: Vec<UserAttribute>,
    groups: BTreeSet<String>,
    confirmed: bool,
    confirmation_code: Option<String>,
    must_change_password: bool,
    mfa: SoftwareToken,
}

impl PoolUser {
    fn new(password: &Password, attributes: &[UserAttribute]) -> Self {
        Self {
            sub: Uuid::new_v4().to_string(),
            password: password.as_ref().clone(),
            attributes: attributes.to_vec(),
            groups: BTreeSet::new(),
            confirmed: false,
            confirmation_code: None,
            must_change_password: false,
            mfa: SoftwareToken::default(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }
}

struct PendingChallenge {
    username: String,
    name: &'static str,
    expires_at: DateTime<Utc>,
    failed_attempts: u8,
}

struct IssuedToken {
    username: String,
    expires_at: DateTime<Utc>,
}

impl IssuedToken {
    fn new(username: &str, ttl_seconds: i64) -> Self {
        Self {
            username: username.to_owned(),
            expires_at: Utc::now() + Duration::seconds(ttl_seconds),
        }
    }

    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Default)]
struct PoolState {
    users: HashMap<String, PoolUser>,
    sessions: HashMap<String, PendingChallenge>,
    access_tokens: HashMap<String, IssuedToken>,
    refresh_tokens: HashMap<String, IssuedToken>,
}

impl PoolState {
    fn prune_expired(&mut self) {
        let now = Utc::now();
        self.sessions.retain(|_, pending| pending.expires_at > now);
        self.access_tokens.retain(|_, issued| issued.is_live(now));
        self.refresh_tokens.retain(|_, issued| issued.is_live(now));
    }
}

/// A user pool held in process memory.
///
/// Behaves like the managed provider closely enough for development and the
/// API test suite: confirmation codes, forced password changes, simulated
/// software-token MFA and HS256 tokens that `JwtTokenVerifier` accepts.
/// TOTP is not computed; the expected code of an enrolment is random and
/// readable through [`InMemoryIdentityProvider::mfa_code`].
#[derive(Clone)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<PoolState>>,
    config: InMemoryIdentityProviderConfig,
}

const NEW_PASSWORD_REQUIRED: &str = "NEW_PASSWORD_REQUIRED";
const SOFTWARE_TOKEN_MFA: &str = "SOFTWARE_TOKEN_MFA";
const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn fail(kind: ProviderErrorKind, message: &str) -> ProviderError {
    ProviderError::new(kind, message)
}

fn user_not_found() -> ProviderError {
    fail(ProviderErrorKind::UserNotFound, "User does not exist.")
}

fn invalid_access_token() -> ProviderError {
    fail(ProviderErrorKind::NotAuthorized, "Invalid Access Token")
}

fn six_digit_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000))
}

fn totp_secret() -> String {
    let mut rng = rand::rng();
    (0..32)
        .map(|_| BASE32_ALPHABET[rng.random_range(0..BASE32_ALPHABET.len())] as char)
        .collect()
}

fn check_password_policy(password: &Password) -> Result<(), ProviderError> {
    if password.as_ref().expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(fail(
            ProviderErrorKind::InvalidPassword,
            "Password did not conform with policy: Password not long enough",
        ));
    }
    Ok(())
}

impl InMemoryIdentityProvider {
    pub fn new(config: InMemoryIdentityProviderConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(PoolState::default())),
            config,
        }
    }

    /// Creates a confirmed user directly, bypassing sign-up.
    pub async fn seed_user(
        &self,
        username: &Username,
        password: &Password,
        name: &str,
        groups: &[Group],
    ) {
        let mut user = PoolUser::new(
            password,
            &[
                UserAttribute::new(UserAttribute::EMAIL, username.as_str()),
                UserAttribute::new(UserAttribute::NAME, name),
            ],
        );
        user.confirmed = true;
        user.groups = groups.iter().map(|group| group.as_str().to_owned()).collect();

        self.state
            .write()
            .await
            .users
            .insert(username.to_string(), user);
    }

    /// The outstanding sign-up confirmation code, as the user would receive it.
    pub async fn confirmation_code(&self, username: &str) -> Option<String> {
        self.state
            .read()
            .await
            .users
            .get(username)
            .and_then(|user| user.confirmation_code.clone())
    }

    /// The code an authenticator app would currently show for this user.
    pub async fn mfa_code(&self, username: &str) -> Option<String> {
        self.state
            .read()
            .await
            .users
            .get(username)
            .and_then(|user| user.mfa.expected_code.clone())
    }

    pub async fn groups_of(&self, username: &str) -> Option<BTreeSet<String>> {
        self.state
            .read()
            .await
            .users
            .get(username)
            .map(|user| user.groups.clone())
    }

    fn issue_tokens(
        &self,
        state: &mut PoolState,
        username: &str,
        with_refresh: bool,
    ) -> Result<ProviderTokens, ProviderError> {
        state.prune_expired();
        let user = state.users.get(username).ok_or_else(user_not_found)?;
        let groups: Vec<String> = user.groups.iter().cloned().collect();

        let mut access = claims_for(&user.sub, None, groups.clone(), self.config.token_ttl_seconds);
        access.token_use = Some(ACCESS_TOKEN_USE.to_owned());
        access.jti = Some(Uuid::new_v4().to_string());

        let mut id = claims_for(
            &user.sub,
            user.attribute(UserAttribute::EMAIL),
            groups,
            self.config.token_ttl_seconds,
        );
        id.token_use = Some(ID_TOKEN_USE.to_owned());
        id.jti = Some(Uuid::new_v4().to_string());

        let sign = |claims: &TokenClaims| {
            issue_token(claims, &self.config.token_secret)
                .map_err(|e| fail(ProviderErrorKind::Unknown, &e.to_string()))
        };
        let access_token = sign(&access)?;
        let id_token = sign(&id)?;

        state.access_tokens.insert(
            access_token.clone(),
            IssuedToken::new(username, self.config.token_ttl_seconds),
        );

        let refresh_token = with_refresh.then(|| {
            let token = Uuid::new_v4().to_string();
            state.refresh_tokens.insert(
                token.clone(),
                IssuedToken::new(username, REFRESH_TOKEN_TTL_SECONDS),
            );
            token
        });

        Ok(ProviderTokens {
            access_token,
            id_token,
            refresh_token,
        })
    }

    fn challenge(state: &mut PoolState, username: &str, name: &'static str) -> AuthenticationResult {
        state.prune_expired();
        let session = Uuid::new_v4().to_string();
        state.sessions.insert(
            session.clone(),
            PendingChallenge {
                username: username.to_owned(),
                name,
                expires_at: Utc::now() + Duration::seconds(SESSION_TTL_SECONDS),
                failed_attempts: 0,
            },
        );
        AuthenticationResult::Challenge {
            name: name.to_owned(),
            session,
        }
    }

    fn check_session(
        state: &PoolState,
        session: &str,
        username: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        match state.sessions.get(session) {
            Some(pending)
                if pending.username == username
                    && pending.name == name
                    && pending.expires_at > Utc::now() =>
            {
                Ok(())
            }
            _ => Err(fail(
                ProviderErrorKind::NotAuthorized,
                "Invalid session for the user.",
            )),
        }
    }

    fn take_session(
        state: &mut PoolState,
        session: &str,
        username: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        Self::check_session(state, session, username, name)?;
        state.sessions.remove(session);
        Ok(())
    }

    fn record_failed_attempt(state: &mut PoolState, session: &str) {
        let exhausted = state.sessions.get_mut(session).is_some_and(|pending| {
            pending.failed_attempts += 1;
            pending.failed_attempts >= MAX_CHALLENGE_ATTEMPTS
        });
        if exhausted {
            tracing::debug!("Challenge session exhausted");
            state.sessions.remove(session);
        }
    }

    fn owner(state: &PoolState, access_token: &str) -> Result<String, ProviderError> {
        state
            .access_tokens
            .get(access_token)
            .filter(|issued| issued.is_live(Utc::now()))
            .map(|issued| issued.username.clone())
            .ok_or_else(invalid_access_token)
    }

    fn profile(state: &PoolState, username: &str) -> Result<ProviderUser, ProviderError> {
        let user = state.users.get(username).ok_or_else(user_not_found)?;
        Ok(ProviderUser {
            username: username.to_owned(),
            attributes: user.attributes.clone(),
        })
    }

    fn change_group(
        state: &mut PoolState,
        username: &Username,
        group: &str,
        add: bool,
    ) -> Result<(), ProviderError> {
        if Group::ALL.iter().all(|known| known.as_str() != group) {
            return Err(fail(
                ProviderErrorKind::ResourceNotFound,
                "Group not found.",
            ));
        }
        let user = state
            .users
            .get_mut(username.as_str())
            .ok_or_else(user_not_found)?;
        if add {
            user.groups.insert(group.to_owned());
        } else {
            user.groups.remove(group);
        }
        Ok(())
    }

    fn set_mfa(user: &mut PoolUser, enabled: bool) -> Result<(), ProviderError> {
        if enabled && !user.mfa.verified {
            return Err(fail(
                ProviderErrorKind::InvalidParameter,
                "User has not verified software token mfa",
            ));
        }
        user.mfa.enabled = enabled;
        Ok(())
    }

    fn after_password_step(
        &self,
        state: &mut PoolState,
        username: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let mfa_enabled = state
            .users
            .get(username)
            .map(|user| user.mfa.enabled)
            .unwrap_or_default();
        if mfa_enabled {
            return Ok(Self::challenge(state, username, SOFTWARE_TOKEN_MFA));
        }
        self.issue_tokens(state, username, true)
            .map(AuthenticationResult::Tokens)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    #[tracing::instrument(name = "InMemoryIdentityProvider::initiate_password_auth", skip_all)]
    async fn initiate_password_auth(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<AuthenticationResult, ProviderError> {
        let mut state = self.state.write().await;
        let (confirmed, must_change_password) = match state.users.get(username.as_str()) {
            Some(user)
                if user.password.expose_secret() == password.as_ref().expose_secret() =>
            {
                (user.confirmed, user.must_change_password)
            }
            _ => {
                return Err(fail(
                    ProviderErrorKind::NotAuthorized,
                    "Incorrect username or password.",
                ));
            }
        };

        if !confirmed {
            return Err(fail(
                ProviderErrorKind::UserNotConfirmed,
                "User is not confirmed.",
            ));
        }
        if must_change_password {
            return Ok(Self::challenge(
                &mut state,
                username.as_str(),
                NEW_PASSWORD_REQUIRED,
            ));
        }
        self.after_password_step(&mut state, username.as_str())
    }

    async fn respond_to_new_password_challenge(
        &self,
        username: &Username,
        new_password: &Password,
        session: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let mut state = self.state.write().await;
        check_password_policy(new_password)?;
        Self::take_session(&mut state, session, username.as_str(), NEW_PASSWORD_REQUIRED)?;

        let user = state
            .users
            .get_mut(username.as_str())
            .ok_or_else(user_not_found)?;
        user.password = new_password.as_ref().clone();
        user.must_change_password = false;

        self.after_password_step(&mut state, username.as_str())
    }

    async fn respond_to_mfa_challenge(
        &self,
        username: &Username,
        code: &VerificationCode,
        session: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let mut state = self.state.write().await;
        Self::check_session(&state, session, username.as_str(), SOFTWARE_TOKEN_MFA)?;

        let expected = state
            .users
            .get(username.as_str())
            .and_then(|user| user.mfa.expected_code.clone());
        if expected.as_deref() != Some(code.as_str()) {
            Self::record_failed_attempt(&mut state, session);
            return Err(fail(
                ProviderErrorKind::CodeMismatch,
                "Invalid code received for user",
            ));
        }
        Self::take_session(&mut state, session, username.as_str(), SOFTWARE_TOKEN_MFA)?;

        self.issue_tokens(&mut state, username.as_str(), true)
            .map(AuthenticationResult::Tokens)
    }

    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let mut state = self.state.write().await;
        let username = state
            .refresh_tokens
            .get(refresh_token)
            .filter(|issued| issued.is_live(Utc::now()))
            .map(|issued| issued.username.clone())
            .ok_or_else(|| fail(ProviderErrorKind::NotAuthorized, "Invalid Refresh Token"))?;

        self.issue_tokens(&mut state, &username, false)
            .map(AuthenticationResult::Tokens)
    }

    #[tracing::instrument(name = "InMemoryIdentityProvider::sign_up", skip_all, fields(username = %username))]
    async fn sign_up(
        &self,
        username: &Username,
        password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderSignUp, ProviderError> {
        let mut state = self.state.write().await;
        if state.users.contains_key(username.as_str()) {
            return Err(fail(
                ProviderErrorKind::UsernameExists,
                "User already exists",
            ));
        }
        check_password_policy(password)?;

        let mut user = PoolUser::new(password, attributes);
        user.confirmed = self.config.auto_confirm;
        if !user.confirmed {
            user.confirmation_code = Some(six_digit_code());
            tracing::debug!("Confirmation code issued");
        }
        let user_sub = user.sub.clone();
        let user_confirmed = user.confirmed;
        state.users.insert(username.to_string(), user);

        Ok(ProviderSignUp {
            user_confirmed,
            user_sub: Some(user_sub),
        })
    }

    async fn confirm_sign_up(
        &self,
        username: &Username,
        code: &VerificationCode,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(username.as_str())
            .ok_or_else(user_not_found)?;

        if user.confirmed {
            return Err(fail(
                ProviderErrorKind::NotAuthorized,
                "User cannot be confirmed. Current status is CONFIRMED",
            ));
        }
        if user.confirmation_code.as_deref() != Some(code.as_str()) {
            return Err(fail(
                ProviderErrorKind::CodeMismatch,
                "Invalid verification code provided, please try again.",
            ));
        }

        user.confirmed = true;
        user.confirmation_code = None;
        Ok(())
    }

    async fn resend_confirmation_code(&self, username: &Username) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(username.as_str())
            .ok_or_else(user_not_found)?;

        if user.confirmed {
            return Err(fail(
                ProviderErrorKind::InvalidParameter,
                "User is already confirmed.",
            ));
        }
        user.confirmation_code = Some(six_digit_code());
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let state = self.state.read().await;
        let username = Self::owner(&state, access_token)?;
        Self::profile(&state, &username)
    }

    async fn admin_get_user(&self, username: &Username) -> Result<ProviderUser, ProviderError> {
        let state = self.state.read().await;
        Self::profile(&state, username.as_str())
    }

    async fn admin_create_user(
        &self,
        username: &Username,
        temporary_password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderUser, ProviderError> {
        let mut state = self.state.write().await;
        if state.users.contains_key(username.as_str()) {
            return Err(fail(
                ProviderErrorKind::UsernameExists,
                "User account already exists",
            ));
        }
        check_password_policy(temporary_password)?;

        let mut user = PoolUser::new(temporary_password, attributes);
        user.confirmed = true;
        user.must_change_password = true;
        state.users.insert(username.to_string(), user);
        tracing::debug!(username = %username, "Temporary password delivered");

        Self::profile(&state, username.as_str())
    }

    async fn admin_add_user_to_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        Self::change_group(&mut state, username, group, true)
    }

    async fn admin_remove_user_from_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        Self::change_group(&mut state, username, group, false)
    }

    async fn associate_software_token(&self, access_token: &str) -> Result<String, ProviderError> {
        let mut state = self.state.write().await;
        let username = Self::owner(&state, access_token)?;
        let user = state.users.get_mut(&username).ok_or_else(user_not_found)?;

        let secret = totp_secret();
        user.mfa = SoftwareToken {
            secret: Some(secret.clone()),
            expected_code: Some(six_digit_code()),
            verified: false,
            enabled: false,
        };
        Ok(secret)
    }

    async fn verify_software_token(
        &self,
        access_token: &str,
        code: &VerificationCode,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        let username = Self::owner(&state, access_token)?;
        let user = state.users.get_mut(&username).ok_or_else(user_not_found)?;

        if user.mfa.secret.is_none() {
            return Err(fail(
                ProviderErrorKind::EnableSoftwareTokenMfa,
                "Software token is not associated",
            ));
        }
        if user.mfa.expected_code.as_deref() != Some(code.as_str()) {
            return Err(fail(
                ProviderErrorKind::CodeMismatch,
                "Code mismatch",
            ));
        }
        user.mfa.verified = true;
        Ok(())
    }

    async fn set_software_token_mfa(
        &self,
        access_token: &str,
        enabled: bool,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        let username = Self::owner(&state, access_token)?;
        let user = state.users.get_mut(&username).ok_or_else(user_not_found)?;
        Self::set_mfa(user, enabled)
    }

    async fn admin_set_software_token_mfa(
        &self,
        username: &Username,
        enabled: bool,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(username.as_str())
            .ok_or_else(user_not_found)?;
        Self::set_mfa(user, enabled)
    }

    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        let username = Self::owner(&state, access_token)?;

        state.access_tokens.retain(|_, issued| issued.username != username);
        state.refresh_tokens.retain(|_, issued| issued.username != username);
        Ok(())
    }
}
