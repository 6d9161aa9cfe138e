use std::sync::Arc;

use labmath_service::auth::depot::depot_keys;
use labmath_service::auth::{Authenticator, SessionStore};
use salvo::async_trait;

/// Injects the credential checker and the session store for the auth
/// middleware and the login/logout handlers.
pub struct AuthProviderHandler {
    pub authenticator: Arc<dyn Authenticator>,
    pub sessions: Arc<SessionStore>,
}

#[async_trait]
impl salvo::Handler for AuthProviderHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.insert(depot_keys::AUTHENTICATOR, Arc::clone(&self.authenticator));
        depot.insert(depot_keys::SESSIONS, Arc::clone(&self.sessions));
    }
}
