//! Location CRUD through the console and its effect on cached lists.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use lunchdesk_client::{CONFIRM_DELETE_LOCATION, DeleteOutcome, NoticeLevel, QueryKey};
use lunchdesk_core::LocationId;
use lunchdesk_core::forms::LocationForm;
use lunchdesk_integration_tests::MockBackend;
use serde_json::json;

fn form(name: &str, address: &str) -> LocationForm {
    LocationForm {
        name: name.to_string(),
        address: address.to_string(),
    }
}

#[tokio::test]
async fn test_list_is_cached_per_page() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let pager = console.pager();

    let first = console.locations(&pager).await.unwrap();
    let second = console.locations(&pager).await.unwrap();

    assert_eq!(first.items().len(), 2);
    assert_eq!(first.pagination().total, 2);
    assert_eq!(first, second);
    assert_eq!(backend.count("GET", "/admin/locations"), 1);

    let request = &backend.requests_to("GET", "/admin/locations")[0];
    assert_eq!(request.param("page").as_deref(), Some("1"));
    assert_eq!(request.param("limit").as_deref(), Some("10"));
}

#[tokio::test]
async fn test_toggle_sends_only_active_flag() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let pager = console.pager();

    let page = console.locations(&pager).await.unwrap();
    let warehouse = page.items().iter().find(|l| l.name == "Warehouse").unwrap();
    assert!(!warehouse.is_active);

    let updated = console.toggle_location(warehouse).await.unwrap();
    assert!(updated.is_active);

    let put = backend.requests_to("PUT", &format!("/admin/locations/{}", warehouse.id));
    assert_eq!(put.len(), 1);
    assert_eq!(put[0].json, Some(json!({ "isActive": true })));

    // Name and address survive, and the list is refetched.
    let stored = backend.record("locations", warehouse.id.as_str()).unwrap();
    assert_eq!(stored["name"], "Warehouse");
    assert_eq!(stored["address"], "22 Dock Rd");

    let page = console.locations(&pager).await.unwrap();
    let warehouse = page.items().iter().find(|l| l.name == "Warehouse").unwrap();
    assert!(warehouse.is_active);
    assert_eq!(warehouse.status_label(), "Active");
    assert_eq!(backend.count("GET", "/admin/locations"), 2);
}

#[tokio::test]
async fn test_create_invalidates_and_notifies_watchers() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let pager = console.pager();
    console.locations(&pager).await.unwrap();

    let key = QueryKey::locations(pager.page(), pager.limit());
    let mut watch = console.watch(key.clone());
    let mut notices = console.notices().subscribe();

    let created = console
        .create_location(&form("  Riverside Kitchen ", "5 Quay St"))
        .await
        .unwrap();

    assert_eq!(created.name, "Riverside Kitchen");
    assert!(created.created_by.is_some());
    assert_eq!(
        backend.requests_to("POST", "/admin/locations")[0].json,
        Some(json!({ "name": "Riverside Kitchen", "address": "5 Quay St" }))
    );
    assert!(!console.cache().contains(&key));
    assert!(watch.is_stale());
    assert!(watch.invalidated().await);

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Location created successfully");

    let page = console.locations(&pager).await.unwrap();
    assert_eq!(page.pagination().total, 3);
}

#[tokio::test]
async fn test_failed_create_keeps_cache_and_shows_server_message() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let pager = console.pager();
    console.locations(&pager).await.unwrap();
    let key = QueryKey::locations(pager.page(), pager.limit());

    backend.fail_next("POST", "/admin/locations", 409, "Location already exists");
    let err = console.create_location(&form("HQ", "1 Main St")).await.unwrap_err();

    assert_eq!(err.to_string(), "Location already exists");
    assert_eq!(err.api_error().and_then(|e| e.status()), Some(409));
    assert!(console.cache().contains(&key));
    assert_eq!(backend.ids("locations").len(), 2);
}

#[tokio::test]
async fn test_failed_update_without_message_uses_fallback() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let id = LocationId::new(backend.ids("locations")[0].clone());

    backend.respond_next("PUT", &format!("/admin/locations/{id}"), 500, json!({ "message": "" }));
    let err = console.update_location(&id, &form("HQ", "2 Main St")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to update location");
}

#[tokio::test]
async fn test_update_sends_trimmed_fields() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let id = LocationId::new(backend.ids("locations")[0].clone());

    let updated = console
        .update_location(&id, &form("Head Office", " 100 Main St "))
        .await
        .unwrap();

    assert_eq!(updated.address, "100 Main St");
    assert_eq!(backend.record("locations", id.as_str()).unwrap()["address"], "100 Main St");
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let id = LocationId::new(backend.ids("locations")[0].clone());

    let mut asked = None;
    let outcome = console
        .delete_location(&id, |prompt| {
            asked = Some(prompt.to_string());
            false
        })
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(asked.as_deref(), Some(CONFIRM_DELETE_LOCATION));
    assert_eq!(backend.count("DELETE", &format!("/admin/locations/{id}")), 0);
    assert_eq!(backend.ids("locations").len(), 2);
}

#[tokio::test]
async fn test_confirmed_delete_removes_location() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let id = LocationId::new(backend.ids("locations")[0].clone());
    let pager = console.pager();
    console.locations(&pager).await.unwrap();

    let outcome = console.delete_location(&id, |_| true).await.unwrap();

    let DeleteOutcome::Deleted(ack) = outcome else {
        panic!("expected the location to be deleted");
    };
    assert_eq!(ack.success, Some(true));
    assert!(!backend.ids("locations").contains(&id.to_string()));

    let page = console.locations(&pager).await.unwrap();
    assert_eq!(page.items().len(), 1);
}
