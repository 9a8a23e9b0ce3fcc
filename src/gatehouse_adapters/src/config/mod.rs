pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AllowedOrigins, IdentityProviderKind, IdentityProviderSettings, PendingGroupsKind,
    PendingGroupsSettings, SeedAdminSettings, ServerSettings, Settings, SettingsError, TokenSettings,
};
