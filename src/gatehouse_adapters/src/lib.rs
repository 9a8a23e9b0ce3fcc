pub mod config;
pub mod identity;
pub mod persistence;
pub mod verification;

pub use config::{AllowedOrigins, Settings, SettingsError};
pub use identity::{
    HttpIdentityProvider, HttpIdentityProviderConfig, InMemoryIdentityProvider,
    InMemoryIdentityProviderConfig,
};
pub use persistence::{HashMapPendingGroupStore, RedisPendingGroupStore};
pub use verification::{JwksError, JwtTokenVerifier, JwtVerifierConfig};
