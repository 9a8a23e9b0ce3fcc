use std::{sync::Arc, time::Duration};

use gatehouse_core::{AuthenticationService, RequestContext};
use tokio_util::sync::CancellationToken;

/// Shared handler state.
///
/// Every request gets its own [`RequestContext`] bounded by
/// `request_timeout` and cancelled together with `shutdown`.
pub struct AppState<A> {
    pub auth: Arc<A>,
    pub request_timeout: Duration,
    pub shutdown: CancellationToken,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            request_timeout: self.request_timeout,
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<A: AuthenticationService> AppState<A> {
    pub fn new(auth: Arc<A>, request_timeout: Duration) -> Self {
        Self {
            auth,
            request_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout).with_parent(&self.shutdown)
    }
}
