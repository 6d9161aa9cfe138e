//! Tests for record CRUD and its reconciliation with the public site.

use salvo::http::StatusCode;

use super::helpers::*;

async fn stored(test_db: &TestDb, kind: RecordKind, id: i32) -> ContentRecord {
    test_db
        .record(kind, id)
        .await
        .expect("Failed to load record")
        .expect("Record should exist")
}

fn created_id(body: &serde_json::Value) -> i32 {
    body["id"]
        .as_i64()
        .and_then(|id| i32::try_from(id).ok())
        .expect("Create response carries an id")
}

// ============================================================================
// Create
// ============================================================================

/// ## Summary
/// Creating a published activity mirrors it; a 201 from the site marks the
/// record as synced.
#[test_log::test(tokio::test)]
async fn create_published_activity_is_mirrored() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    site.respond_with(201);
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let body = TestRequest::post(&records_path(RecordKind::Activity))
        .session(&token)
        .json_body(&serde_json::json!({
            "titre": "Journée des mathématiques",
            "description": "Conférences et ateliers",
            "contenu": "Programme complet",
            "est_publie": true,
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["synced"], true);
    let id = created_id(&body);

    let record = stored(&test_db, RecordKind::Activity, id).await;
    assert_eq!(record.sync_status(), SyncStatus::Success);
    assert!(record.last_sync().is_some());
    assert_eq!(record.sync_message(), None);

    let pushes = site.requests_to("POST", &remote_record_path(RecordKind::Activity, id));
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].api_key.as_deref(), Some(TEST_API_KEY));
    assert!(
        pushes[0]
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    );

    let payload = pushes[0].json();
    assert_eq!(payload["id"], id.to_string());
    assert_eq!(payload["titre"], "Journée des mathématiques");
    assert_eq!(payload["est_publie"], true);
    assert_eq!(payload["auteur"], ADMIN_USERNAME);
    assert!(payload["image_url"].is_null());
}

#[test_log::test(tokio::test)]
async fn create_inactive_announcement_makes_no_remote_call() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let body = TestRequest::post(&records_path(RecordKind::Announcement))
        .session(&token)
        .json_body(&serde_json::json!({
            "titre": "Séminaire reporté",
            "contenu": "Nouvelle date à venir",
            "est_active": false,
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["synced"], false);
    assert_eq!(body["message"], "Created (inactive)");

    let record = stored(&test_db, RecordKind::Announcement, created_id(&body)).await;
    assert_eq!(record.sync_status(), SyncStatus::Pending);
    assert!(site.requests().is_empty());
}

/// ## Summary
/// A rejected push still creates the record and stores a bounded failure message.
#[test_log::test(tokio::test)]
async fn failed_push_is_recorded() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    site.respond_with(503);
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let body = TestRequest::post(&records_path(RecordKind::Achievement))
        .session(&token)
        .json_body(&serde_json::json!({
            "titre": "Prix de thèse",
            "date_realisation": "2024-05-17",
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["synced"], false);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("HTTP 503"))
    );

    let record = stored(&test_db, RecordKind::Achievement, created_id(&body)).await;
    assert_eq!(record.sync_status(), SyncStatus::Failed);
    assert!(record.last_sync().is_none());
    let message = record.sync_message().expect("Failure message stored");
    assert!(!message.is_empty());
    assert!(message.chars().count() <= 100);
}

#[test_log::test(tokio::test)]
async fn unreachable_site_is_recorded_as_failure() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = create_test_service(
        &test_db,
        labmath_test::component::config::RemoteConfig {
            base_url: UNREACHABLE_SITE.to_string(),
            api_key: Some(TEST_API_KEY.to_string()),
        },
    );
    let token = login(&service).await;

    let body = TestRequest::post(&records_path(RecordKind::Offer))
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "Stage de recherche" }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["synced"], false);
    let record = stored(&test_db, RecordKind::Offer, created_id(&body)).await;
    assert_eq!(record.sync_status(), SyncStatus::Failed);
    let message = record.sync_message().expect("Failure message stored");
    assert!(!message.is_empty());
    assert!(message.chars().count() <= 100);
}

#[test_log::test(tokio::test)]
async fn missing_api_key_skips_mirroring() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(
        &test_db,
        labmath_test::component::config::RemoteConfig {
            base_url: site.base_url(),
            api_key: Some("  ".to_string()),
        },
    );
    let token = login(&service).await;

    let body = TestRequest::post(&records_path(RecordKind::Activity))
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "Sans clé", "est_publie": true }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["synced"], false);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("API key not configured"))
    );

    let record = stored(&test_db, RecordKind::Activity, created_id(&body)).await;
    assert_eq!(record.sync_status(), SyncStatus::Pending);
    assert!(site.requests().is_empty());
}

// ============================================================================
// Validation
// ============================================================================

#[test_log::test(tokio::test)]
async fn invalid_requests_are_rejected_without_side_effects() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let unknown = TestRequest::get("/api/records/actualite")
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(unknown.json()["success"], false);

    TestRequest::post(&records_path(RecordKind::Activity))
        .session(&token)
        .json_body(&serde_json::json!({ "description": "no title" }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post(&records_path(RecordKind::Activity))
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "   " }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post(&records_path(RecordKind::Offer))
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "Bourse", "date_limite": "31/12/2024" }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post(&records_path(RecordKind::Offer))
        .session(&token)
        .header("Content-Type", "application/json")
        .body("{\"titre\": ")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let list = TestRequest::get(&records_path(RecordKind::Offer))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(list["records"].as_array().map(Vec::len), Some(0));
    assert!(site.requests().is_empty());
}

#[test_log::test(tokio::test)]
async fn missing_record_is_not_found() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;
    let path = record_path(RecordKind::Offer, 4242);

    let body = TestRequest::get(&path)
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(body["success"], false);

    TestRequest::put(&path)
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "Ghost" }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    TestRequest::delete(&path)
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    TestRequest::post(&format!("{path}/sync"))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert!(site.requests().is_empty());
}

// ============================================================================
// Read
// ============================================================================

#[test_log::test(tokio::test)]
async fn list_and_fetch_return_persisted_fields() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let older = test_db.seed_offer("Ancienne offre", true).await.expect("seed");
    let newer = test_db.seed_offer("Nouvelle offre", false).await.expect("seed");

    let list = TestRequest::get(&records_path(RecordKind::Offer))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let records = list["records"].as_array().expect("records array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], newer);
    assert_eq!(records[1]["id"], older);
    assert_eq!(records[0]["est_active"], false);
    assert_eq!(records[0]["sync_status"], "pending");

    let one = TestRequest::get(&record_path(RecordKind::Offer, older))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(one["record"]["titre"], "Ancienne offre");
    assert_eq!(one["record"]["lieu"], "Marrakech");
}

// ============================================================================
// Update
// ============================================================================

/// ## Summary
/// Deactivating an active offer issues exactly one remote DELETE and reports
/// the deactivation whether or not that call succeeds.
#[test_log::test(tokio::test)]
async fn deactivating_offer_removes_it_from_site() {
    for remote_status in [200, 500] {
        let test_db = TestDb::new().await.expect("Failed to create test database");
        let site = MockSite::start().await;
        site.respond_with(remote_status);
        let service = create_test_service(&test_db, site.remote());
        let token = login(&service).await;

        let id = test_db.seed_offer("Post-doctorat", true).await.expect("seed");

        let body = TestRequest::put(&record_path(RecordKind::Offer, id))
            .session(&token)
            .json_body(&serde_json::json!({
                "titre": "Post-doctorat (pourvu)",
                "lieu": "Rabat",
                "est_active": false,
            }))
            .send(&service)
            .await
            .assert_status(StatusCode::OK)
            .json();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Deactivated");

        let requests = site.requests();
        assert_eq!(requests.len(), 1, "remote status {remote_status}");
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].path, remote_record_path(RecordKind::Offer, id));
        assert_eq!(requests[0].api_key.as_deref(), Some(TEST_API_KEY));

        let ContentRecord::Offer(offer) = stored(&test_db, RecordKind::Offer, id).await else {
            panic!("Expected an offer");
        };
        assert_eq!(offer.title, "Post-doctorat (pourvu)");
        assert_eq!(offer.location.as_deref(), Some("Rabat"));
        assert!(!offer.is_active);
    }
}

#[test_log::test(tokio::test)]
async fn unpublishing_activity_reports_unpublished() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let id = test_db.seed_activity("Colloque", true).await.expect("seed");

    let body = TestRequest::put(&record_path(RecordKind::Activity, id))
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "Colloque", "est_publie": false }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["message"], "Unpublished");
    assert_eq!(
        site.requests_to("DELETE", &remote_record_path(RecordKind::Activity, id))
            .len(),
        1
    );
}

#[test_log::test(tokio::test)]
async fn updating_visible_record_pushes_new_state() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let id = test_db.seed_announcement("Réunion", false).await.expect("seed");

    let body = TestRequest::put(&record_path(RecordKind::Announcement, id))
        .session(&token)
        .json_body(&serde_json::json!({
            "titre": "Réunion plénière",
            "type_annonce": "urgent",
            "date_debut": "2024-09-01T09:00",
            "est_active": true,
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["synced"], true);

    let pushes = site.requests_to("POST", &remote_record_path(RecordKind::Announcement, id));
    assert_eq!(pushes.len(), 1);
    let payload = pushes[0].json();
    assert_eq!(payload["titre"], "Réunion plénière");
    assert_eq!(payload["type_annonce"], "urgent");
    assert_eq!(payload["date_debut"], "2024-09-01T09:00:00");
    assert!(payload["date_fin"].is_null());

    let record = stored(&test_db, RecordKind::Announcement, id).await;
    assert_eq!(record.sync_status(), SyncStatus::Success);
}

#[test_log::test(tokio::test)]
async fn editing_hidden_record_makes_no_remote_call() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let id = test_db.seed_offer("Brouillon", false).await.expect("seed");

    let body = TestRequest::put(&record_path(RecordKind::Offer, id))
        .session(&token)
        .json_body(&serde_json::json!({ "titre": "Brouillon v2", "est_active": false }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["message"], "Modified");
    assert!(site.requests().is_empty());
}

// ============================================================================
// Delete
// ============================================================================

/// ## Summary
/// A visible record is removed from the site before it is deleted locally,
/// and a failed remote delete does not block the local one.
#[test_log::test(tokio::test)]
async fn deleting_visible_record_removes_remote_copy_first() {
    for remote_status in [204, 500] {
        let test_db = TestDb::new().await.expect("Failed to create test database");
        let site = MockSite::start().await;
        site.respond_with(remote_status);
        let service = create_test_service(&test_db, site.remote());
        let token = login(&service).await;

        let id = test_db.seed_achievement("Médaille").await.expect("seed");
        site.watch_row(test_db.pool(), RecordKind::Achievement, id);

        let body = TestRequest::delete(&record_path(RecordKind::Achievement, id))
            .session(&token)
            .send(&service)
            .await
            .assert_status(StatusCode::OK)
            .json();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Deleted");
        assert_eq!(
            site.requests_to("DELETE", &remote_record_path(RecordKind::Achievement, id))
                .len(),
            1
        );
        assert_eq!(
            site.rows_seen_on_delete(),
            vec![true],
            "local row must still exist when the remote delete arrives"
        );
        assert!(
            test_db
                .record(RecordKind::Achievement, id)
                .await
                .expect("query")
                .is_none()
        );
    }
}

#[test_log::test(tokio::test)]
async fn deleting_hidden_record_skips_remote() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let id = test_db.seed_activity("Brouillon", false).await.expect("seed");

    TestRequest::delete(&record_path(RecordKind::Activity, id))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    assert!(site.requests().is_empty());
    assert!(
        test_db
            .record(RecordKind::Activity, id)
            .await
            .expect("query")
            .is_none()
    );
}

// ============================================================================
// Manual sync
// ============================================================================

#[test_log::test(tokio::test)]
async fn manual_sync_pushes_visible_record() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let id = test_db.seed_activity("Atelier", true).await.expect("seed");

    let body = TestRequest::post(&format!("{}/sync", record_path(RecordKind::Activity, id)))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Synced");
    assert_eq!(
        stored(&test_db, RecordKind::Activity, id).await.sync_status(),
        SyncStatus::Success
    );
}

#[test_log::test(tokio::test)]
async fn manual_sync_of_hidden_record_is_refused() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let site = MockSite::start().await;
    let service = create_test_service(&test_db, site.remote());
    let token = login(&service).await;

    let id = test_db.seed_offer("Inactive", false).await.expect("seed");

    let body = TestRequest::post(&format!("{}/sync", record_path(RecordKind::Offer, id)))
        .session(&token)
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "not synced");
    assert!(site.requests().is_empty());
    assert_eq!(
        stored(&test_db, RecordKind::Offer, id).await.sync_status(),
        SyncStatus::Pending
    );
}
