//! CRUD and manual sync for the four content kinds.
//!
//! Routes are generic over `{kind}`, which is one of `activite`,
//! `realisation`, `annonce` or `offre`.

use labmath_core::types::RecordKind;
use labmath_db::model::record::ContentRecord;
use labmath_service::auth::get_identity_from_depot;
use labmath_service::content::{self, input::RecordInput};
use salvo::prelude::*;
use serde::Serialize;

use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};
use crate::mirror_handler::get_mirror_from_depot;
use labmath_core::constants::RECORDS_ROUTE_COMPONENT;

#[derive(Debug, Serialize)]
struct RecordListResponse {
    success: bool,
    kind: RecordKind,
    records: Vec<ContentRecord>,
}

#[derive(Debug, Serialize)]
struct RecordResponse {
    success: bool,
    record: ContentRecord,
}

#[derive(Debug, Serialize)]
struct CreateResponse {
    success: bool,
    id: i32,
    synced: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct UpdateResponse {
    success: bool,
    synced: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

fn record_kind(req: &Request) -> AppResult<RecordKind> {
    let slug = req
        .param::<String>("kind")
        .ok_or_else(|| AppError::BadRequest("Missing record kind".to_string()))?;
    Ok(slug.parse()?)
}

fn record_id(req: &Request) -> AppResult<i32> {
    req.param::<i32>("id")
        .ok_or_else(|| AppError::BadRequest("Invalid record id".to_string()))
}

async fn record_input(req: &mut Request, kind: RecordKind) -> AppResult<RecordInput> {
    let body: serde_json::Value = req
        .parse_json()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
    Ok(RecordInput::from_json(kind, body)?)
}

#[handler]
async fn list(req: &mut Request, depot: &mut Depot) -> AppResult<Json<RecordListResponse>> {
    let kind = record_kind(req)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let records = content::list_records(&mut conn, kind).await?;

    Ok(Json(RecordListResponse {
        success: true,
        kind,
        records,
    }))
}

#[handler]
async fn fetch(req: &mut Request, depot: &mut Depot) -> AppResult<Json<RecordResponse>> {
    let kind = record_kind(req)?;
    let id = record_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = content::get_record(&mut conn, kind, id).await?;

    Ok(Json(RecordResponse {
        success: true,
        record,
    }))
}

/// ## Summary
/// Creates a record from the JSON body and mirrors it when visible.
///
/// ## Errors
/// 400 for an unknown kind or invalid body. A failed mirror push is not an
/// error; it is reported through `synced` and `message`.
#[handler]
async fn create(req: &mut Request, depot: &mut Depot) -> AppResult<Json<CreateResponse>> {
    let kind = record_kind(req)?;
    let input = record_input(req, kind).await?;
    let author = get_identity_from_depot(depot)?.username.clone();
    let provider = get_db_from_depot(depot)?;
    let mirror = get_mirror_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let outcome = content::create_record(&mut conn, &mirror, &input, &author).await?;

    Ok(Json(CreateResponse {
        success: true,
        id: outcome.id,
        synced: outcome.synced,
        message: outcome.message,
    }))
}

#[handler]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<UpdateResponse>> {
    let kind = record_kind(req)?;
    let id = record_id(req)?;
    let input = record_input(req, kind).await?;
    let provider = get_db_from_depot(depot)?;
    let mirror = get_mirror_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let outcome = content::update_record(&mut conn, &mirror, id, &input).await?;

    Ok(Json(UpdateResponse {
        success: true,
        synced: outcome.synced,
        message: outcome.message,
    }))
}

#[handler]
async fn remove(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageResponse>> {
    let kind = record_kind(req)?;
    let id = record_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mirror = get_mirror_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let message = content::delete_record(&mut conn, &mirror, kind, id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message,
    }))
}

/// ## Summary
/// Manually pushes one record. `success` mirrors the remote outcome.
#[handler]
async fn sync_one(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageResponse>> {
    let kind = record_kind(req)?;
    let id = record_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mirror = get_mirror_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let outcome = content::sync_record(&mut conn, &mirror, kind, id).await?;

    Ok(Json(MessageResponse {
        success: outcome.ok,
        message: outcome.message,
    }))
}

pub fn routes() -> Router {
    Router::with_path(RECORDS_ROUTE_COMPONENT).push(
        Router::with_path("{kind}").get(list).post(create).push(
            Router::with_path("{id}")
                .get(fetch)
                .put(update)
                .delete(remove)
                .push(Router::with_path("sync").post(sync_one)),
        ),
    )
}
