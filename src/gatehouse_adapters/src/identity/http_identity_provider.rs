use async_trait::async_trait;
use gatehouse_core::{
    AuthenticationResult, IdentityProvider, Password, ProviderError, ProviderErrorKind,
    ProviderSignUp, ProviderTokens, ProviderUser, UserAttribute, Username, VerificationCode,
};
use reqwest::{Client, header::CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Clone)]
pub struct HttpIdentityProviderConfig {
    /// Base URL of the user pool API, e.g. `https://cognito-idp.eu-west-1.amazonaws.com/`.
    pub endpoint: String,
    pub client_id: String,
    pub user_pool_id: String,
}

/// [`IdentityProvider`] speaking the Cognito user pool JSON 1.1 protocol.
///
/// Requests are unsigned; admin actions expect a signing proxy or an
/// emulator in front of the endpoint.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http_client: Client,
    config: HttpIdentityProviderConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: HttpIdentityProviderConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    #[tracing::instrument(name = "Identity provider request", skip(self, body))]
    async fn invoke<B, R>(&self, action: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON_1_1)
            .header(TARGET_HEADER, format!("{TARGET_PREFIX}.{action}"))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &bytes));
        }

        let bytes: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
        serde_json::from_slice(bytes).map_err(|e| {
            ProviderError::transport(format!("unreadable {action} response: {e}"))
        })
    }

    async fn invoke_unit<B>(&self, action: &str, body: &B) -> Result<(), ProviderError>
    where
        B: Serialize + Sync,
    {
        self.invoke::<B, Empty>(action, body).await.map(|_| ())
    }
}

const CONTENT_TYPE_JSON_1_1: &str = "application/x-amz-json-1.1";
const TARGET_HEADER: &str = "X-Amz-Target";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

const PASSWORD_FLOW: &str = "USER_PASSWORD_AUTH";
const REFRESH_FLOW: &str = "REFRESH_TOKEN_AUTH";
const NEW_PASSWORD_CHALLENGE: &str = "NEW_PASSWORD_REQUIRED";
const MFA_CHALLENGE: &str = "SOFTWARE_TOKEN_MFA";

/// Maps the wire error code (the part of `__type` after any `#`) to a kind.
pub fn error_kind(code: &str) -> ProviderErrorKind {
    match code.rsplit('#').next().unwrap_or(code) {
        "NotAuthorizedException" => ProviderErrorKind::NotAuthorized,
        "PasswordResetRequiredException" => ProviderErrorKind::PasswordResetRequired,
        "UserNotConfirmedException" => ProviderErrorKind::UserNotConfirmed,
        "UsernameExistsException" => ProviderErrorKind::UsernameExists,
        "CodeMismatchException" => ProviderErrorKind::CodeMismatch,
        "ExpiredCodeException" => ProviderErrorKind::ExpiredCode,
        "UserNotFoundException" => ProviderErrorKind::UserNotFound,
        "ResourceNotFoundException" => ProviderErrorKind::ResourceNotFound,
        "InvalidPasswordException" => ProviderErrorKind::InvalidPassword,
        "InvalidParameterException" => ProviderErrorKind::InvalidParameter,
        "LimitExceededException" => ProviderErrorKind::LimitExceeded,
        "TooManyRequestsException" => ProviderErrorKind::TooManyRequests,
        "EnableSoftwareTokenMFAException" => ProviderErrorKind::EnableSoftwareTokenMfa,
        _ => ProviderErrorKind::Unknown,
    }
}

fn error_from_body(status: u16, body: &[u8]) -> ProviderError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_type: Some(code),
            message,
        }) => ProviderError::new(error_kind(&code), message.unwrap_or_default()).with_code(code),
        _ => ProviderError::transport(format!(
            "HTTP {status}: {}",
            String::from_utf8_lossy(body)
        )),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct Empty {}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'a str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AuthParameters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RespondToAuthChallengeRequest<'a> {
    client_id: &'a str,
    challenge_name: &'a str,
    session: &'a str,
    challenge_responses: ChallengeResponses<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ChallengeResponses<'a> {
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    software_token_mfa_code: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthResponse {
    authentication_result: Option<TokenSet>,
    challenge_name: Option<String>,
    session: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenSet {
    access_token: String,
    id_token: String,
    refresh_token: Option<String>,
}

impl TryFrom<AuthResponse> for AuthenticationResult {
    type Error = ProviderError;

    fn try_from(response: AuthResponse) -> Result<Self, Self::Error> {
        match response {
            AuthResponse {
                authentication_result: Some(tokens),
                ..
            } => Ok(AuthenticationResult::Tokens(ProviderTokens {
                access_token: tokens.access_token,
                id_token: tokens.id_token,
                refresh_token: tokens.refresh_token,
            })),
            AuthResponse {
                challenge_name: Some(name),
                session,
                ..
            } => Ok(AuthenticationResult::Challenge {
                name,
                session: session.unwrap_or_default(),
            }),
            _ => Err(ProviderError::transport(
                "authentication response without tokens or challenge",
            )),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireAttribute {
    name: String,
    value: String,
}

fn wire_attributes(attributes: &[UserAttribute]) -> Vec<WireAttribute> {
    attributes
        .iter()
        .map(|attribute| WireAttribute {
            name: attribute.name.clone(),
            value: attribute.value.clone(),
        })
        .collect()
}

fn domain_attributes(attributes: Vec<WireAttribute>) -> Vec<UserAttribute> {
    attributes
        .into_iter()
        .map(|attribute| UserAttribute::new(attribute.name, attribute.value))
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<WireAttribute>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    user_confirmed: bool,
    user_sub: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmSignUpRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ClientUserRequest<'a> {
    client_id: &'a str,
    username: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AccessTokenRequest<'a> {
    access_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PoolUserRequest<'a> {
    user_pool_id: &'a str,
    username: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<WireAttribute>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AdminCreateUserRequest<'a> {
    user_pool_id: &'a str,
    username: &'a str,
    temporary_password: &'a str,
    user_attributes: Vec<WireAttribute>,
    desired_delivery_mediums: [&'a str; 1],
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AdminCreateUserResponse {
    user: CreatedUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreatedUser {
    username: String,
    #[serde(default)]
    attributes: Vec<WireAttribute>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GroupMembershipRequest<'a> {
    user_pool_id: &'a str,
    username: &'a str,
    group_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssociateSoftwareTokenResponse {
    secret_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct VerifySoftwareTokenRequest<'a> {
    access_token: &'a str,
    user_code: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VerifySoftwareTokenResponse {
    status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct MfaSettings {
    enabled: bool,
    preferred_mfa: bool,
}

impl MfaSettings {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            preferred_mfa: enabled,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SetUserMfaPreferenceRequest<'a> {
    access_token: &'a str,
    software_token_mfa_settings: MfaSettings,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AdminSetUserMfaPreferenceRequest<'a> {
    user_pool_id: &'a str,
    username: &'a str,
    software_token_mfa_settings: MfaSettings,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn initiate_password_auth(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<AuthenticationResult, ProviderError> {
        let request = InitiateAuthRequest {
            auth_flow: PASSWORD_FLOW,
            client_id: &self.config.client_id,
            auth_parameters: AuthParameters {
                username: Some(username.as_str()),
                password: Some(password.as_ref().expose_secret()),
                refresh_token: None,
            },
        };
        self.invoke::<_, AuthResponse>("InitiateAuth", &request)
            .await?
            .try_into()
    }

    async fn respond_to_new_password_challenge(
        &self,
        username: &Username,
        new_password: &Password,
        session: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let request = RespondToAuthChallengeRequest {
            client_id: &self.config.client_id,
            challenge_name: NEW_PASSWORD_CHALLENGE,
            session,
            challenge_responses: ChallengeResponses {
                username: username.as_str(),
                new_password: Some(new_password.as_ref().expose_secret()),
                software_token_mfa_code: None,
            },
        };
        self.invoke::<_, AuthResponse>("RespondToAuthChallenge", &request)
            .await?
            .try_into()
    }

    async fn respond_to_mfa_challenge(
        &self,
        username: &Username,
        code: &VerificationCode,
        session: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let request = RespondToAuthChallengeRequest {
            client_id: &self.config.client_id,
            challenge_name: MFA_CHALLENGE,
            session,
            challenge_responses: ChallengeResponses {
                username: username.as_str(),
                new_password: None,
                software_token_mfa_code: Some(code.as_str()),
            },
        };
        self.invoke::<_, AuthResponse>("RespondToAuthChallenge", &request)
            .await?
            .try_into()
    }

    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<AuthenticationResult, ProviderError> {
        let request = InitiateAuthRequest {
            auth_flow: REFRESH_FLOW,
            client_id: &self.config.client_id,
            auth_parameters: AuthParameters {
                username: None,
                password: None,
                refresh_token: Some(refresh_token),
            },
        };
        self.invoke::<_, AuthResponse>("InitiateAuth", &request)
            .await?
            .try_into()
    }

    async fn sign_up(
        &self,
        username: &Username,
        password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderSignUp, ProviderError> {
        let request = SignUpRequest {
            client_id: &self.config.client_id,
            username: username.as_str(),
            password: password.as_ref().expose_secret(),
            user_attributes: wire_attributes(attributes),
        };
        let response: SignUpResponse = self.invoke("SignUp", &request).await?;
        Ok(ProviderSignUp {
            user_confirmed: response.user_confirmed,
            user_sub: response.user_sub,
        })
    }

    async fn confirm_sign_up(
        &self,
        username: &Username,
        code: &VerificationCode,
    ) -> Result<(), ProviderError> {
        let request = ConfirmSignUpRequest {
            client_id: &self.config.client_id,
            username: username.as_str(),
            confirmation_code: code.as_str(),
        };
        self.invoke_unit("ConfirmSignUp", &request).await
    }

    async fn resend_confirmation_code(&self, username: &Username) -> Result<(), ProviderError> {
        let request = ClientUserRequest {
            client_id: &self.config.client_id,
            username: username.as_str(),
        };
        self.invoke_unit("ResendConfirmationCode", &request).await
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let response: UserResponse = self
            .invoke("GetUser", &AccessTokenRequest { access_token })
            .await?;
        Ok(ProviderUser {
            username: response.username,
            attributes: domain_attributes(response.user_attributes),
        })
    }

    async fn admin_get_user(&self, username: &Username) -> Result<ProviderUser, ProviderError> {
        let request = PoolUserRequest {
            user_pool_id: &self.config.user_pool_id,
            username: username.as_str(),
        };
        let response: UserResponse = self.invoke("AdminGetUser", &request).await?;
        Ok(ProviderUser {
            username: response.username,
            attributes: domain_attributes(response.user_attributes),
        })
    }

    async fn admin_create_user(
        &self,
        username: &Username,
        temporary_password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderUser, ProviderError> {
        let request = AdminCreateUserRequest {
            user_pool_id: &self.config.user_pool_id,
            username: username.as_str(),
            temporary_password: temporary_password.as_ref().expose_secret(),
            user_attributes: wire_attributes(attributes),
            desired_delivery_mediums: ["EMAIL"],
        };
        let response: AdminCreateUserResponse = self.invoke("AdminCreateUser", &request).await?;
        Ok(ProviderUser {
            username: response.user.username,
            attributes: domain_attributes(response.user.attributes),
        })
    }

    async fn admin_add_user_to_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError> {
        let request = GroupMembershipRequest {
            user_pool_id: &self.config.user_pool_id,
            username: username.as_str(),
            group_name: group,
        };
        self.invoke_unit("AdminAddUserToGroup", &request).await
    }

    async fn admin_remove_user_from_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError> {
        let request = GroupMembershipRequest {
            user_pool_id: &self.config.user_pool_id,
            username: username.as_str(),
            group_name: group,
        };
        self.invoke_unit("AdminRemoveUserFromGroup", &request).await
    }

    async fn associate_software_token(&self, access_token: &str) -> Result<String, ProviderError> {
        let response: AssociateSoftwareTokenResponse = self
            .invoke("AssociateSoftwareToken", &AccessTokenRequest { access_token })
            .await?;
        Ok(response.secret_code)
    }

    async fn verify_software_token(
        &self,
        access_token: &str,
        code: &VerificationCode,
    ) -> Result<(), ProviderError> {
        let request = VerifySoftwareTokenRequest {
            access_token,
            user_code: code.as_str(),
        };
        let response: VerifySoftwareTokenResponse =
            self.invoke("VerifySoftwareToken", &request).await?;

        match response.status.as_deref() {
            Some("ERROR") => Err(ProviderError::new(
                ProviderErrorKind::CodeMismatch,
                "software token verification returned ERROR",
            )),
            _ => Ok(()),
        }
    }

    async fn set_software_token_mfa(
        &self,
        access_token: &str,
        enabled: bool,
    ) -> Result<(), ProviderError> {
        let request = SetUserMfaPreferenceRequest {
            access_token,
            software_token_mfa_settings: MfaSettings::new(enabled),
        };
        self.invoke_unit("SetUserMFAPreference", &request).await
    }

    async fn admin_set_software_token_mfa(
        &self,
        username: &Username,
        enabled: bool,
    ) -> Result<(), ProviderError> {
        let request = AdminSetUserMfaPreferenceRequest {
            user_pool_id: &self.config.user_pool_id,
            username: username.as_str(),
            software_token_mfa_settings: MfaSettings::new(enabled),
        };
        self.invoke_unit("AdminSetUserMFAPreference", &request).await
    }

    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.invoke_unit("GlobalSignOut", &AccessTokenRequest { access_token })
            .await
    }
}
