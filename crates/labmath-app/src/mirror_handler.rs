use std::sync::Arc;

use labmath_core::error::CoreError;
use labmath_service::mirror::MirrorClient;
use salvo::async_trait;

use crate::error::AppResult;

/// Makes the remote site client available to downstream handlers.
pub struct MirrorClientHandler {
    pub client: Arc<MirrorClient>,
}

#[async_trait]
impl salvo::Handler for MirrorClientHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.client));
    }
}

/// ## Summary
/// Retrieves the remote site client from the depot.
///
/// ## Errors
/// Returns an error if the client is not found in the depot.
pub fn get_mirror_from_depot(depot: &salvo::Depot) -> AppResult<Arc<MirrorClient>> {
    depot
        .obtain::<Arc<MirrorClient>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Mirror client not found in depot").into())
}
