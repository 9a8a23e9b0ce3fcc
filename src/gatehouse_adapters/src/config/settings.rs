use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use http::HeaderValue;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use super::constants::env::{CONFIG_FILE, ENV_PREFIX};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../../config/default.toml");

/// HS256 keys shorter than the SHA-256 output are refused.
pub const MIN_SECRET_LENGTH: usize = 32;

const PLACEHOLDER_SECRETS: &[&str] = &["change-me-in-every-deployment", "changeme", "secret"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid allowed origin {origin:?}")]
    InvalidOrigin { origin: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// CORS allow-list, configured as a comma separated string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for AllowedOrigins {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| SettingsError::InvalidOrigin {
                    origin: origin.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(AllowedOrigins)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub address: String,
    pub allowed_origins: AllowedOrigins,
    pub request_timeout_secs: u64,
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityProviderKind {
    InMemory,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProviderSettings {
    pub kind: IdentityProviderKind,
    pub endpoint: String,
    pub client_id: String,
    pub user_pool_id: String,
    pub timeout_secs: u64,
    /// Lifetime of tokens minted by the in-memory provider.
    pub token_ttl_secs: i64,
    pub auto_confirm: bool,
}

impl IdentityProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub jwks_url: Option<String>,
    pub hs256_secret: Option<Secret<String>>,
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingGroupsKind {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingGroupsSettings {
    pub kind: PendingGroupsKind,
    pub redis_host_name: String,
}

/// Administrator created at startup by the in-memory provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAdminSettings {
    pub username: String,
    pub password: Secret<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity_provider: IdentityProviderSettings,
    pub token: TokenSettings,
    pub pending_groups: PendingGroupsSettings,
    pub seed_admin: Option<SeedAdminSettings>,
}

impl Settings {
    /// Loads `.env`, the built-in defaults, an optional `config/gatehouse.*`
    /// file and finally `GATEHOUSE__*` environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS_TOML, FileFormat::Toml))
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Built-in defaults overlaid with a TOML document. Ignores the
    /// environment.
    pub fn from_toml(overrides: &str) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS_TOML, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.identity_provider.kind == IdentityProviderKind::Http {
            if self.identity_provider.endpoint.trim().is_empty() {
                return Err(SettingsError::Invalid(
                    "identity_provider.endpoint is required for the http provider".into(),
                ));
            }
            if self.identity_provider.client_id.trim().is_empty() {
                return Err(SettingsError::Invalid(
                    "identity_provider.client_id is required for the http provider".into(),
                ));
            }
        }

        match self.identity_provider.kind {
            IdentityProviderKind::InMemory if self.token.hs256_secret.is_none() => {
                return Err(SettingsError::Invalid(
                    "the in_memory provider signs tokens with token.hs256_secret".into(),
                ));
            }
            IdentityProviderKind::Http
                if self.token.jwks_url.is_none() && self.token.hs256_secret.is_none() =>
            {
                return Err(SettingsError::Invalid(
                    "token.jwks_url or token.hs256_secret must be set for the http provider"
                        .into(),
                ));
            }
            _ => {}
        }

        if let Some(secret) = &self.token.hs256_secret {
            validate_secret(secret.expose_secret())?;
        }

        Ok(())
    }
}

fn validate_secret(secret: &str) -> Result<(), SettingsError> {
    let trimmed = secret.trim();
    if PLACEHOLDER_SECRETS
        .iter()
        .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
    {
        return Err(SettingsError::Invalid(
            "token.hs256_secret is a placeholder value".into(),
        ));
    }
    if trimmed.len() < MIN_SECRET_LENGTH {
        return Err(SettingsError::Invalid(format!(
            "token.hs256_secret must be at least {MIN_SECRET_LENGTH} bytes"
        )));
    }
    Ok(())
}
