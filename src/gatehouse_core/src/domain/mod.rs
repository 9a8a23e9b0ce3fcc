pub mod claims;
pub mod credentials;
pub mod error;
pub mod group;
pub mod profile;
pub mod session;
pub mod username;
pub mod validation;
