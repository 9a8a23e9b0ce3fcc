pub mod http_identity_provider;
pub mod in_memory_identity_provider;

pub use http_identity_provider::{HttpIdentityProvider, HttpIdentityProviderConfig};
pub use in_memory_identity_provider::{InMemoryIdentityProvider, InMemoryIdentityProviderConfig};
