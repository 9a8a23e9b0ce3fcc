//! Axum surface for the gatehouse authentication service.
//!
//! Handlers are thin: they extract the request, build a
//! [`RequestContext`](gatehouse_core::RequestContext) from [`AppState`], run
//! the matching use case and render [`AuthError`](gatehouse_core::AuthError)
//! values as `{"error": message}` bodies through [`ApiError`].
//!
//! ```ignore
//! let state = AppState::new(Arc::new(auth_service), Duration::from_secs(15));
//! let app = gatehouse_axum::router(state);
//! ```

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use extract::{AdminClaims, BearerToken};
pub use routes::router;
pub use state::AppState;
