use std::collections::HashMap;

use chrono::Utc;
use gatehouse_core::{TokenVerifier, VerificationError, VerifiedToken};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
    errors::ErrorKind,
    jwk::JwkSet,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACCESS_TOKEN_USE: &str = "access";
pub const ID_TOKEN_USE: &str = "id";

/// Claim checks applied on top of signature and expiry.
#[derive(Debug, Clone, Default)]
pub struct JwtVerifierConfig {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// The subset of identity provider token claims this workspace reads.
///
/// Group membership travels in `cognito:groups`; access tokens carry no
/// `email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "cognito:groups", default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Unusable JWK {kid}: {source}")]
    InvalidKey {
        kid: String,
        source: jsonwebtoken::errors::Error,
    },
    #[error("JWK without key id")]
    MissingKeyId,
}

#[derive(Clone)]
enum VerificationKeys {
    Shared(DecodingKey),
    Published(HashMap<String, DecodingKey>),
}

/// [`TokenVerifier`] backed by `jsonwebtoken`.
///
/// Either a shared HS256 secret (development, the in-memory provider) or the
/// RS256 keys published in the user pool's JWKS document.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    keys: VerificationKeys,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn with_shared_secret(secret: &Secret<String>, config: &JwtVerifierConfig) -> Self {
        Self {
            keys: VerificationKeys::Shared(DecodingKey::from_secret(
                secret.expose_secret().as_bytes(),
            )),
            validation: validation(Algorithm::HS256, config),
        }
    }

    pub fn with_jwks(jwks: &JwkSet, config: &JwtVerifierConfig) -> Result<Self, JwksError> {
        let mut keys = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let kid = jwk.common.key_id.clone().ok_or(JwksError::MissingKeyId)?;
            let key = DecodingKey::from_jwk(jwk).map_err(|source| JwksError::InvalidKey {
                kid: kid.clone(),
                source,
            })?;
            keys.insert(kid, key);
        }

        Ok(Self {
            keys: VerificationKeys::Published(keys),
            validation: validation(Algorithm::RS256, config),
        })
    }

    #[tracing::instrument(name = "Fetching JWKS", skip(http_client))]
    pub async fn fetch_jwks(
        http_client: &reqwest::Client,
        jwks_url: &str,
    ) -> Result<JwkSet, JwksError> {
        let jwks = http_client
            .get(jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        tracing::info!(keys = jwks.keys.len(), "Loaded verification keys");
        Ok(jwks)
    }

    fn key_for(&self, token: &str) -> Result<&DecodingKey, VerificationError> {
        match &self.keys {
            VerificationKeys::Shared(key) => Ok(key),
            VerificationKeys::Published(keys) => {
                let header = decode_header(token).map_err(classify)?;
                let kid = header
                    .kid
                    .ok_or_else(|| VerificationError::Malformed("missing kid".to_owned()))?;
                keys.get(&kid).ok_or(VerificationError::UnknownKey(kid))
            }
        }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedToken, VerificationError> {
        let key = self.key_for(token)?;
        let claims = decode::<TokenClaims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)?;

        // ID tokens are for the client, never for bearer authorization.
        if let Some(token_use) = claims
            .token_use
            .as_deref()
            .filter(|token_use| *token_use != ACCESS_TOKEN_USE)
        {
            return Err(VerificationError::InvalidClaims(format!(
                "token_use {token_use:?} is not an access token"
            )));
        }

        Ok(VerifiedToken {
            subject: claims.sub,
            email: claims.email,
            groups: claims.groups,
        })
    }
}

fn validation(algorithm: Algorithm, config: &JwtVerifierConfig) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.leeway = config.leeway_seconds;
    validation.set_required_spec_claims(&["exp", "sub"]);
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }
    match &config.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    validation
}

fn classify(error: jsonwebtoken::errors::Error) -> VerificationError {
    match error.kind() {
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => VerificationError::InvalidClaims(error.to_string()),
        _ => VerificationError::Malformed(error.to_string()),
    }
}

/// Signs `claims` with a shared HS256 secret.
pub fn issue_token(
    claims: &TokenClaims,
    secret: &Secret<String>,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
}

/// Claims for a token valid for `ttl_seconds` from now.
pub fn claims_for(
    subject: &str,
    email: Option<&str>,
    groups: Vec<String>,
    ttl_seconds: i64,
) -> TokenClaims {
    let now = Utc::now().timestamp();
    TokenClaims {
        sub: subject.to_owned(),
        email: email.map(str::to_owned),
        groups,
        iss: None,
        aud: None,
        token_use: None,
        jti: None,
        iat: now,
        exp: now + ttl_seconds,
    }
}
