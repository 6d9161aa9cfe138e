//! Create, edit, delete and sync operations of the admin control surface.
//!
//! Every operation persists first, in its own transaction, and only then
//! talks to the remote site. Remote failures never undo a committed change;
//! they are stored on the record and reported in the returned message.

pub mod input;
pub mod stats;

use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use labmath_core::types::RecordKind;
use labmath_db::db::connection::DbConnection;
use labmath_db::db::enums::SyncStatus;
use labmath_db::db::query::{achievement, activity, announcement, offer, record};
use labmath_db::model::{
    achievement::{AchievementChanges, NewAchievement},
    activity::{ActivityChanges, NewActivity},
    announcement::{AnnouncementChanges, NewAnnouncement},
    offer::{NewOffer, OfferChanges},
    record::ContentRecord,
};

use crate::error::{ServiceError, ServiceResult};
use crate::mirror::{MirrorClient, MirrorOutcome};
use crate::sync::tracker::push_and_record;
use input::RecordInput;

pub const MODIFIED_MESSAGE: &str = "Modified";
pub const DELETED_MESSAGE: &str = "Deleted";

/// Result of a create operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CreateOutcome {
    pub id: i32,
    pub synced: bool,
    pub message: String,
}

/// Result of an update operation. The local change always succeeded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UpdateOutcome {
    pub synced: bool,
    pub message: String,
}

fn not_found(kind: RecordKind, id: i32) -> ServiceError {
    ServiceError::NotFound(format!("{kind} {id} not found"))
}

fn describe(action: &str, outcome: &MirrorOutcome) -> String {
    if outcome.ok {
        format!("{action} and synced")
    } else {
        format!("{action} but not synced: {}", outcome.message)
    }
}

const fn created_hidden_message(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Activity => "Created (unpublished)",
        RecordKind::Achievement | RecordKind::Announcement | RecordKind::Offer => {
            "Created (inactive)"
        }
    }
}

/// ## Summary
/// Lists every record of `kind`, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_records(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
) -> ServiceResult<Vec<ContentRecord>> {
    Ok(record::list_records(conn, kind).await?)
}

/// ## Summary
/// Fetches a single record.
///
/// ## Errors
/// Returns `NotFound` if no record of `kind` has that ID.
pub async fn get_record(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
    id: i32,
) -> ServiceResult<ContentRecord> {
    record::get_record(conn, kind, id)
        .await?
        .ok_or_else(|| not_found(kind, id))
}

async fn insert_record(
    conn: &mut DbConnection<'_>,
    input: &RecordInput,
    author: &str,
) -> ServiceResult<ContentRecord> {
    let created_at = chrono::Utc::now().naive_utc();
    let sync_status = SyncStatus::Pending;

    let created: ContentRecord = match input {
        RecordInput::Activity(i) => activity::create_activity(
            conn,
            &NewActivity {
                title: i.titre.trim(),
                description: i.description.as_deref(),
                content: i.contenu.as_deref(),
                image_url: i.image_url.as_deref(),
                author: Some(author),
                created_at,
                is_published: i.est_publie.unwrap_or(true),
                sync_status,
            },
        )
        .await?
        .into(),
        RecordInput::Achievement(i) => {
            let achieved_on = i.achieved_on()?;
            achievement::create_achievement(
                conn,
                &NewAchievement {
                    title: i.titre.trim(),
                    description: i.description.as_deref(),
                    image_url: i.image_url.as_deref(),
                    category: i.categorie.as_deref(),
                    achieved_on,
                    created_at,
                    sync_status,
                },
            )
            .await?
            .into()
        }
        RecordInput::Announcement(i) => {
            let starts_at = i.starts_at()?;
            let ends_at = i.ends_at()?;
            announcement::create_announcement(
                conn,
                &NewAnnouncement {
                    title: i.titre.trim(),
                    content: i.contenu.as_deref(),
                    announcement_type: Some(i.announcement_type()),
                    starts_at,
                    ends_at,
                    created_at,
                    is_active: i.est_active.unwrap_or(true),
                    sync_status,
                },
            )
            .await?
            .into()
        }
        RecordInput::Offer(i) => {
            let deadline = i.deadline()?;
            offer::create_offer(
                conn,
                &NewOffer {
                    title: i.titre.trim(),
                    description: i.description.as_deref(),
                    offer_type: Some(i.offer_type()),
                    location: i.lieu.as_deref(),
                    deadline,
                    created_at,
                    is_active: i.est_active.unwrap_or(true),
                    sync_status,
                },
            )
            .await?
            .into()
        }
    };

    Ok(created)
}

async fn apply_changes(
    conn: &mut DbConnection<'_>,
    id: i32,
    input: &RecordInput,
) -> ServiceResult<Option<ContentRecord>> {
    let sync_status = SyncStatus::Pending;

    let updated: Option<ContentRecord> = match input {
        RecordInput::Activity(i) => activity::update_activity(
            conn,
            id,
            &ActivityChanges {
                title: i.titre.trim(),
                description: i.description.as_deref(),
                content: i.contenu.as_deref(),
                image_url: i.image_url.as_deref(),
                is_published: i.est_publie.unwrap_or(true),
                sync_status,
            },
        )
        .await?
        .map(Into::into),
        RecordInput::Achievement(i) => {
            let achieved_on = i.achieved_on()?;
            achievement::update_achievement(
                conn,
                id,
                &AchievementChanges {
                    title: i.titre.trim(),
                    description: i.description.as_deref(),
                    image_url: i.image_url.as_deref(),
                    category: i.categorie.as_deref(),
                    achieved_on,
                    sync_status,
                },
            )
            .await?
            .map(Into::into)
        }
        RecordInput::Announcement(i) => {
            let starts_at = i.starts_at()?;
            let ends_at = i.ends_at()?;
            announcement::update_announcement(
                conn,
                id,
                &AnnouncementChanges {
                    title: i.titre.trim(),
                    content: i.contenu.as_deref(),
                    announcement_type: Some(i.announcement_type()),
                    starts_at,
                    ends_at,
                    is_active: i.est_active.unwrap_or(true),
                    sync_status,
                },
            )
            .await?
            .map(Into::into)
        }
        RecordInput::Offer(i) => {
            let deadline = i.deadline()?;
            offer::update_offer(
                conn,
                id,
                &OfferChanges {
                    title: i.titre.trim(),
                    description: i.description.as_deref(),
                    offer_type: Some(i.offer_type()),
                    location: i.lieu.as_deref(),
                    deadline,
                    is_active: i.est_active.unwrap_or(true),
                    sync_status,
                },
            )
            .await?
            .map(Into::into)
        }
    };

    Ok(updated)
}

/// ## Summary
/// Creates a record and, if it is visible, mirrors it.
///
/// The visibility flag defaults to true. Activities are attributed to `author`.
///
/// ## Side Effects
/// - Inserts the record with `sync_status = pending`
/// - Pushes it to the remote site and stores the outcome when visible
///
/// ## Errors
/// Returns `ValidationError` for malformed dates, or a database error if the
/// insert fails. Remote failures are reported in the outcome instead.
#[tracing::instrument(skip(conn, mirror, input), fields(kind = %input.kind()))]
pub async fn create_record<'a>(
    conn: &mut DbConnection<'a>,
    mirror: &MirrorClient,
    input: &'a RecordInput,
    author: &'a str,
) -> ServiceResult<CreateOutcome> {
    let created = conn
        .transaction::<_, ServiceError, _>(|tx| {
            async move { insert_record(tx, input, author).await }.scope_boxed()
        })
        .await?;

    let kind = created.kind();
    let id = created.id();
    tracing::info!(%kind, id, "Record created");

    if !created.is_visible() {
        return Ok(CreateOutcome {
            id,
            synced: false,
            message: created_hidden_message(kind).to_string(),
        });
    }

    let outcome = push_and_record(conn, mirror, &created).await?;

    Ok(CreateOutcome {
        id,
        synced: outcome.ok,
        message: describe("Created", &outcome),
    })
}

/// ## Summary
/// Replaces the editable fields of a record and reconciles the remote site
/// with its new visibility.
///
/// | Visibility | Remote action | Reported message |
/// |---|---|---|
/// | now visible | push, outcome stored | push outcome |
/// | visible to hidden | delete, result ignored | "Unpublished" / "Deactivated" |
/// | hidden to hidden | none | "Modified" |
///
/// ## Side Effects
/// - Updates the record and resets `sync_status` to `pending`
/// - Calls the remote site as in the table above
///
/// ## Errors
/// Returns `NotFound` if the record does not exist, `ValidationError` for
/// malformed dates, or a database error if the update fails.
#[tracing::instrument(skip(conn, mirror, input), fields(kind = %input.kind()))]
pub async fn update_record<'a>(
    conn: &mut DbConnection<'a>,
    mirror: &MirrorClient,
    id: i32,
    input: &'a RecordInput,
) -> ServiceResult<UpdateOutcome> {
    let kind = input.kind();

    let (was_visible, updated) = conn
        .transaction::<_, ServiceError, _>(|tx| {
            async move {
                let previous = record::get_record(tx, kind, id)
                    .await?
                    .ok_or_else(|| not_found(kind, id))?;
                let updated = apply_changes(tx, id, input)
                    .await?
                    .ok_or_else(|| not_found(kind, id))?;
                Ok((previous.is_visible(), updated))
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(%kind, id, was_visible, visible = updated.is_visible(), "Record updated");

    if updated.is_visible() {
        let outcome = push_and_record(conn, mirror, &updated).await?;
        return Ok(UpdateOutcome {
            synced: outcome.ok,
            message: describe("Updated", &outcome),
        });
    }

    if was_visible {
        let removal = mirror.remove(kind, id).await;
        if !removal.ok {
            tracing::warn!(
                %kind,
                id,
                message = %removal.message,
                "Hidden record could not be removed from the site"
            );
        }
        return Ok(UpdateOutcome {
            synced: false,
            message: kind.hidden_message().to_string(),
        });
    }

    Ok(UpdateOutcome {
        synced: false,
        message: MODIFIED_MESSAGE.to_string(),
    })
}

/// ## Summary
/// Deletes a record locally, removing it from the remote site first if it is
/// visible there.
///
/// ## Side Effects
/// - Calls the remote delete endpoint when the record is visible; its result
///   does not affect the local delete
/// - Removes the local row
///
/// ## Errors
/// Returns `NotFound` if the record does not exist, or a database error if
/// the delete fails.
#[tracing::instrument(skip(conn, mirror))]
pub async fn delete_record(
    conn: &mut DbConnection<'_>,
    mirror: &MirrorClient,
    kind: RecordKind,
    id: i32,
) -> ServiceResult<String> {
    let existing = get_record(conn, kind, id).await?;

    if existing.is_visible() {
        let removal = mirror.remove(kind, id).await;
        if !removal.ok {
            tracing::warn!(
                %kind,
                id,
                message = %removal.message,
                "Remote delete failed, deleting locally anyway"
            );
        }
    }

    conn.transaction::<_, ServiceError, _>(|tx| {
        async move {
            record::delete_record(tx, kind, id).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!(%kind, id, "Record deleted");

    Ok(DELETED_MESSAGE.to_string())
}

/// ## Summary
/// Pushes the current state of one record to the remote site.
///
/// The usual guards apply: a hidden record or a missing API key yields an
/// unsuccessful outcome without a network call.
///
/// ## Errors
/// Returns `NotFound` if the record does not exist, or a database error if
/// storing the outcome fails.
#[tracing::instrument(skip(conn, mirror))]
pub async fn sync_record(
    conn: &mut DbConnection<'_>,
    mirror: &MirrorClient,
    kind: RecordKind,
    id: i32,
) -> ServiceResult<MirrorOutcome> {
    let existing = get_record(conn, kind, id).await?;
    push_and_record(conn, mirror, &existing).await
}
