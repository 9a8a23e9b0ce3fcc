//! Route handlers, one function per endpoint.

pub mod admin;
pub mod login;
pub mod mfa;
pub mod registration;
pub mod session;

use axum::{
    Router,
    routing::{delete, get, post},
};
use gatehouse_core::AuthenticationService;

use crate::state::AppState;

/// All `/auth` routes wired to `state`.
pub fn router<A>(state: AppState<A>) -> Router
where
    A: AuthenticationService + 'static,
{
    Router::new()
        .route("/auth/login", post(login::login::<A>))
        .route("/auth/login/new-password", post(login::new_password::<A>))
        .route("/auth/login/mfa", post(login::login_mfa::<A>))
        .route("/auth/refresh", post(session::refresh::<A>))
        .route("/auth/confirm", post(registration::confirm::<A>))
        .route(
            "/auth/confirm/resend",
            post(registration::resend_confirmation::<A>),
        )
        .route("/auth/user/register", post(registration::sign_up::<A>))
        .route("/auth/user", get(session::get_user::<A>))
        .route("/auth/logout", post(session::logout::<A>))
        .route(
            "/auth/mfa",
            post(mfa::add_mfa::<A>).delete(mfa::remove_mfa::<A>),
        )
        .route("/auth/mfa/verify", post(mfa::verify_mfa::<A>))
        .route("/auth/mfa/activate", post(mfa::activate_mfa::<A>))
        .route("/auth/admin/register", post(admin::create_admin::<A>))
        .route("/auth/admin/groups/add", post(admin::add_group::<A>))
        .route("/auth/admin/groups/remove", post(admin::remove_group::<A>))
        .route("/auth/admin/mfa", delete(admin::remove_mfa::<A>))
        .route("/auth/admin/reconcile", post(admin::reconcile::<A>))
        .with_state(state)
}
