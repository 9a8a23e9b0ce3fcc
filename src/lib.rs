//! # Gatehouse - Authentication Service Library
//!
//! Facade crate re-exporting the public APIs of the gatehouse workspace:
//! an authentication front for a managed identity provider.
//!
//! ## Structure
//!
//! - **Core domain types**: `Username`, `Password`, `Group`, `Claims`, `AuthError`
//! - **Ports**: `IdentityProvider`, `TokenVerifier`, `PendingGroupStore`, `AuthenticationService`
//! - **Use cases**: `LoginUseCase`, `SignUpUseCase`, `AddGroupUseCase`, etc.
//! - **Adapters**: `HttpIdentityProvider`, `InMemoryIdentityProvider`, `JwtTokenVerifier`,
//!   pending-group stores and `Settings`
//! - **Service**: `GatehouseService`, the HTTP entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types, ports and the request context
pub mod core {
    pub use gatehouse_core::*;
}

pub use gatehouse_core::{
    AuthError, Challenge, Claims, Credentials, Group, InputError, LoginOutcome, Password,
    Registration, RequestContext, StatusClass, UserProfile, Username, VerificationCode,
};

// ============================================================================
// Ports
// ============================================================================

pub use gatehouse_core::{
    AuthenticationService, IdentityProvider, PendingGroupStore, PendingGroupStoreError,
    ProviderError, ProviderErrorKind, TokenVerifier, VerificationError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application services and use cases
pub mod use_cases {
    pub use gatehouse_application::*;
}

pub use gatehouse_application::{
    AddGroupUseCase, AuthService, AuthServiceConfig, CreateAdminUseCase, GetMeUseCase,
    LoginUseCase, LogoutUseCase, RefreshTokenUseCase, SignUpUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Identity provider clients
    pub mod identity {
        pub use gatehouse_adapters::identity::*;
    }

    /// Pending-group marker stores
    pub mod persistence {
        pub use gatehouse_adapters::persistence::*;
    }

    /// Bearer token verification
    pub mod verification {
        pub use gatehouse_adapters::verification::*;
    }

    /// Configuration
    pub mod config {
        pub use gatehouse_adapters::config::*;
    }
}

pub use gatehouse_adapters::{
    HashMapPendingGroupStore, HttpIdentityProvider, InMemoryIdentityProvider, JwtTokenVerifier,
    RedisPendingGroupStore, Settings,
};

// ============================================================================
// HTTP Service (Main Entry Point)
// ============================================================================

/// Axum handlers, extractors and error rendering
pub mod axum_routes {
    pub use gatehouse_axum::*;
}

pub use gatehouse_axum::AppState;
pub use gatehouse_service::{
    BootstrapError, GatehouseService, build_service, configure_redis, get_redis_client,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the ports
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
