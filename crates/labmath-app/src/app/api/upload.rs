use labmath_core::constants::MAX_UPLOAD_BYTES;
use labmath_service::mirror::{UploadFile, UploadOutcome};
use salvo::prelude::*;

use crate::error::{AppError, AppResult};
use crate::mirror_handler::get_mirror_from_depot;

/// ## Summary
/// Forwards a multipart `file` field to the public site's upload endpoint.
///
/// The remote JSON reply is relayed as is on success.
///
/// ## Errors
/// 400 when no file or an unnamed file is sent, 502 when the site rejects or
/// cannot receive the upload.
#[handler]
async fn upload(req: &mut Request, depot: &mut Depot) -> AppResult<Json<serde_json::Value>> {
    let mirror = get_mirror_from_depot(depot)?;

    req.set_secure_max_size(MAX_UPLOAD_BYTES);
    let Some(part) = req.file("file").await else {
        return Err(AppError::BadRequest("No file provided".to_string()));
    };

    let file_name = part.name().unwrap_or_default().trim().to_string();
    if file_name.is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }
    let content_type = part.content_type().map(|mime| mime.to_string());
    let path = part.path().clone();

    let bytes = tokio::fs::read(&path).await?;

    tracing::debug!(%file_name, size = bytes.len(), "Forwarding upload");

    match mirror
        .upload(UploadFile {
            file_name,
            content_type,
            bytes,
        })
        .await
    {
        UploadOutcome::Relayed(body) => Ok(Json(body)),
        UploadOutcome::Failed(message) => Err(AppError::UpstreamError(message)),
    }
}

pub fn routes() -> Router {
    Router::with_path("upload").post(upload)
}
