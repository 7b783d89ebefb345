//! Coalesced reads and single-flight writes under latency.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use futures::future::join_all;
use lunchdesk_client::{ActionError, MutationError, QueryKey};
use lunchdesk_core::forms::LocationForm;
use lunchdesk_core::{LocationId, MealDay};
use lunchdesk_integration_tests::MockBackend;

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let backend = MockBackend::start().await;
    backend.set_latency(Duration::from_millis(150));
    let console = backend.signed_in_console().await;
    let pager = console.pager();

    let results = join_all((0..5).map(|_| {
        let console = console.clone();
        async move { console.meals(MealDay::Monday, &pager).await }
    }))
    .await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(backend.count("GET", "/admin/meals"), 1);
}

#[tokio::test]
async fn test_concurrent_reads_of_different_keys_are_independent() {
    let backend = MockBackend::start().await;
    backend.set_latency(Duration::from_millis(50));
    let console = backend.signed_in_console().await;
    let pager = console.pager();

    let (monday, tuesday) = tokio::join!(
        console.meals(MealDay::Monday, &pager),
        console.meals(MealDay::Tuesday, &pager),
    );

    assert_eq!(monday.unwrap().items().len(), 2);
    assert_eq!(tuesday.unwrap().items().len(), 1);
    assert_eq!(backend.count("GET", "/admin/meals"), 2);
}

#[tokio::test]
async fn test_second_submit_while_pending_is_refused() {
    let backend = MockBackend::start().await;
    backend.set_latency(Duration::from_millis(200));
    let console = backend.signed_in_console().await;
    let form = LocationForm {
        name: "Depot".to_string(),
        address: "9 Yard Ln".to_string(),
    };

    let (first, second) = tokio::join!(console.create_location(&form), console.create_location(&form));

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(ActionError::Mutation(MutationError::AlreadyPending("create_location")))
    ));
    assert_eq!(backend.count("POST", "/admin/locations"), 1);

    // Released once the first call finished.
    backend.set_latency(Duration::ZERO);
    console.create_location(&form).await.unwrap();
    assert_eq!(backend.count("POST", "/admin/locations"), 2);
}

#[tokio::test]
async fn test_different_mutations_run_side_by_side() {
    let backend = MockBackend::start().await;
    backend.set_latency(Duration::from_millis(100));
    let console = backend.signed_in_console().await;
    let pager = console.pager();
    console.locations(&pager).await.unwrap();

    let form = LocationForm {
        name: "Depot".to_string(),
        address: "9 Yard Ln".to_string(),
    };
    let page = console.locations(&pager).await.unwrap();
    let first = page.items()[0].clone();

    let (created, toggled) = tokio::join!(console.create_location(&form), console.toggle_location(&first));

    assert!(created.is_ok());
    assert!(toggled.is_ok());
    assert!(!console.cache().contains(&QueryKey::all_locations()));
    assert!(!console.cache().contains(&QueryKey::locations(pager.page(), pager.limit())));
}

#[tokio::test]
async fn test_list_loading_during_toggle_is_refetched() {
    let backend = MockBackend::start().await;
    let console = backend.signed_in_console().await;
    let pager = console.pager();
    let warehouse = LocationId::new(backend.ids("locations")[1].clone());

    backend.hold_next("GET", "/admin/locations", Duration::from_millis(300));
    let slow = tokio::spawn({
        let console = console.clone();
        async move { console.locations(&pager).await }
    });
    while backend.count("GET", "/admin/locations") == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let toggled = console.set_location_active(&warehouse, true).await.unwrap();
    assert!(toggled.is_active);

    // The read that was in flight still answers with what it loaded.
    let before = slow.await.unwrap().unwrap();
    let stale = before.items().iter().find(|l| l.id == warehouse).unwrap();
    assert!(!stale.is_active);

    let after = console.locations(&pager).await.unwrap();
    let fresh = after.items().iter().find(|l| l.id == warehouse).unwrap();
    assert!(fresh.is_active);
    assert_eq!(fresh.name, "Warehouse");
    assert_eq!(backend.count("GET", "/admin/locations"), 2);
}
