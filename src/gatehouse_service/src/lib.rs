//! Standalone gatehouse service: settings-driven assembly of the identity
//! provider, token verifier and pending-group store behind the `/auth` router.

pub mod bootstrap;
pub mod helpers;
pub mod service;
pub mod tracing;

pub use bootstrap::{BootstrapError, assemble, build_service};
pub use helpers::{configure_redis, get_redis_client};
pub use service::GatehouseService;
