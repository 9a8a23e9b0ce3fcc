use std::sync::Arc;

use gatehouse_adapters::{
    HashMapPendingGroupStore, HttpIdentityProvider, HttpIdentityProviderConfig,
    InMemoryIdentityProvider, InMemoryIdentityProviderConfig, JwksError, JwtTokenVerifier,
    JwtVerifierConfig, RedisPendingGroupStore, Settings, SettingsError,
    config::{IdentityProviderKind, PendingGroupsKind},
};
use gatehouse_application::{AuthService, AuthServiceConfig};
use gatehouse_axum::AppState;
use gatehouse_core::{
    AuthenticationService, Group, IdentityProvider, InputError, Password, Username,
};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::{helpers::configure_redis, service::GatehouseService};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Jwks(#[from] JwksError),
    #[error("Failed to connect to Redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Invalid seed admin: {0}")]
    SeedAdmin(#[from] InputError),
    #[error("token.hs256_secret is required")]
    MissingSecret,
}

/// Builds the service described by `settings`: identity provider, token
/// verifier and pending-group store.
pub async fn build_service(
    settings: &Settings,
    shutdown: CancellationToken,
) -> Result<GatehouseService, BootstrapError> {
    let verifier = build_verifier(settings).await?;
    let config = AuthServiceConfig {
        provider_timeout: settings.identity_provider.timeout(),
    };

    match settings.identity_provider.kind {
        IdentityProviderKind::InMemory => {
            let provider = in_memory_provider(settings).await?;
            with_pending_group_store(settings, provider, verifier, config, shutdown)
        }
        IdentityProviderKind::Http => {
            let provider = http_provider(settings)?;
            with_pending_group_store(settings, provider, verifier, config, shutdown)
        }
    }
}

/// Wraps an assembled [`AuthenticationService`] into the HTTP service.
pub fn assemble<A>(settings: &Settings, auth: A, shutdown: CancellationToken) -> GatehouseService
where
    A: AuthenticationService + 'static,
{
    let state = AppState::new(Arc::new(auth), settings.server.request_timeout())
        .with_shutdown(shutdown);
    GatehouseService::new(state)
}

fn with_pending_group_store<P>(
    settings: &Settings,
    provider: P,
    verifier: JwtTokenVerifier,
    config: AuthServiceConfig,
    shutdown: CancellationToken,
) -> Result<GatehouseService, BootstrapError>
where
    P: IdentityProvider + 'static,
{
    match settings.pending_groups.kind {
        PendingGroupsKind::Memory => {
            tracing::warn!("Pending group markers are kept in memory and lost on restart");
            let store = HashMapPendingGroupStore::new();
            Ok(assemble(
                settings,
                AuthService::new(provider, verifier, store, config),
                shutdown,
            ))
        }
        PendingGroupsKind::Redis => {
            let conn = configure_redis(&settings.pending_groups.redis_host_name)?;
            let store = RedisPendingGroupStore::new(Arc::new(RwLock::new(conn)));
            Ok(assemble(
                settings,
                AuthService::new(provider, verifier, store, config),
                shutdown,
            ))
        }
    }
}

async fn build_verifier(settings: &Settings) -> Result<JwtTokenVerifier, BootstrapError> {
    let token = &settings.token;

    if settings.identity_provider.kind == IdentityProviderKind::InMemory {
        // In-memory tokens carry neither issuer nor audience.
        let secret = token.hs256_secret.as_ref().ok_or(BootstrapError::MissingSecret)?;
        let config = JwtVerifierConfig {
            leeway_seconds: token.leeway_secs,
            ..JwtVerifierConfig::default()
        };
        return Ok(JwtTokenVerifier::with_shared_secret(secret, &config));
    }

    let config = JwtVerifierConfig {
        issuer: token.issuer.clone(),
        audience: token.audience.clone(),
        leeway_seconds: token.leeway_secs,
    };

    match (&token.jwks_url, &token.hs256_secret) {
        (Some(jwks_url), _) => {
            let http_client = reqwest::Client::builder()
                .timeout(settings.identity_provider.timeout())
                .build()?;
            let jwks = JwtTokenVerifier::fetch_jwks(&http_client, jwks_url).await?;
            Ok(JwtTokenVerifier::with_jwks(&jwks, &config)?)
        }
        (None, Some(secret)) => Ok(JwtTokenVerifier::with_shared_secret(secret, &config)),
        (None, None) => Err(BootstrapError::MissingSecret),
    }
}

async fn in_memory_provider(
    settings: &Settings,
) -> Result<InMemoryIdentityProvider, BootstrapError> {
    let token_secret = settings
        .token
        .hs256_secret
        .clone()
        .ok_or(BootstrapError::MissingSecret)?;

    let provider = InMemoryIdentityProvider::new(InMemoryIdentityProviderConfig {
        token_secret,
        token_ttl_seconds: settings.identity_provider.token_ttl_secs,
        auto_confirm: settings.identity_provider.auto_confirm,
    });

    if let Some(seed) = &settings.seed_admin {
        let username = Username::parse_email(&seed.username)?;
        let password = Password::try_from(seed.password.clone())?;
        provider
            .seed_user(&username, &password, &seed.name, &[Group::Admin, Group::User])
            .await;
        tracing::info!(username = %username, "Seeded administrator");
    }

    tracing::warn!("Using the in-memory identity provider; users are lost on restart");
    Ok(provider)
}

fn http_provider(settings: &Settings) -> Result<HttpIdentityProvider, BootstrapError> {
    let identity = &settings.identity_provider;
    let http_client = reqwest::Client::builder()
        .timeout(identity.timeout())
        .build()?;

    Ok(HttpIdentityProvider::new(
        HttpIdentityProviderConfig {
            endpoint: identity.endpoint.clone(),
            client_id: identity.client_id.clone(),
            user_pool_id: identity.user_pool_id.clone(),
        },
        http_client,
    ))
}
