//! Integration Tests - Use Cases over Mocked and File-backed Stores
//!
//! Tests the interaction between usecases, ports, and adapters.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::mock;
use mockall::predicate::*;

use listing_profit_sim::adapters::api::ApiError;
use listing_profit_sim::adapters::persistence::JsonListingStore;
use listing_profit_sim::domain::listing::{Listing, ListingId, ListingStatus, NewListing};
use listing_profit_sim::domain::marketplace::{Marketplace, Yen};
use listing_profit_sim::domain::rules::RuleTables;
use listing_profit_sim::domain::shipping::ShippingSpec;
use listing_profit_sim::ports::listing_store::{ListingStore, SimulationInputsUpdate};
use listing_profit_sim::usecases::simulator::NO_FIT_WARNING;
use listing_profit_sim::usecases::{ListingManager, ServiceError, SimulateListingRequest, SimulatorService};

// ---- Mock Definitions ----

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl ListingStore for Store {
        async fn list_listings(&self) -> anyhow::Result<Vec<Listing>>;
        async fn get_listing(&self, id: &str) -> anyhow::Result<Option<Listing>>;
        async fn insert_listing(&self, draft: NewListing) -> anyhow::Result<ListingId>;
        async fn mark_sold(&self, id: &str, sold_price: Yen) -> anyhow::Result<Listing>;
        async fn delete_listings(&self, ids: &[ListingId]) -> anyhow::Result<usize>;
        async fn update_simulation_inputs(
            &self,
            id: &str,
            update: &SimulationInputsUpdate,
        ) -> anyhow::Result<()>;
        async fn is_healthy(&self) -> bool;
    }
}

// ---- Helpers ----

fn small_parcel() -> ShippingSpec {
    ShippingSpec {
        length_cm: 20.0,
        width_cm: 15.0,
        height_cm: 2.0,
        weight_g: 300.0,
        packaging_material_id: "box_nekopos".to_string(),
        packaging_material_cost: Some(70),
    }
}

fn draft(title: &str, price: Yen) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: String::new(),
        category: "books".to_string(),
        condition: "good".to_string(),
        price,
        marketplace: None,
        shipping_spec: None,
    }
}

fn listing(id: &str, marketplace: Option<Marketplace>, spec: Option<ShippingSpec>) -> Listing {
    let mut draft = draft("Paperback", 3_000);
    draft.marketplace = marketplace;
    draft.shipping_spec = spec;
    Listing::from_draft(id.to_string(), draft, Utc::now())
}

fn simulator(store: MockStore) -> SimulatorService<MockStore> {
    SimulatorService::new(Arc::new(RuleTables::builtin()), Arc::new(store))
}

fn temp_dir() -> String {
    std::env::temp_dir()
        .join(format!("listing_sim_it_{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .to_string()
}

// ---- Simulator Service ----

#[tokio::test]
async fn test_simulate_listing_uses_saved_inputs_and_writes_back() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .with(eq("l1"))
        .returning(|id| Ok(Some(listing(id, Some(Marketplace::Mercari), Some(small_parcel())))));
    store
        .expect_update_simulation_inputs()
        .withf(|id, update| {
            id == "l1"
                && update.marketplace == Some(Marketplace::Mercari)
                && update.shipping_spec.as_ref().is_some_and(|s| s.weight_g == 300.0)
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let report = simulator(store)
        .simulate_listing("l1", &SimulateListingRequest::reuse_saved(false))
        .await
        .unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(report.input.selling_price, 3_000);
    assert_eq!(report.input.marketplace_selection, Some(Marketplace::Mercari));
    assert!(report.result.candidates.iter().all(|c| c.marketplace == Marketplace::Mercari));
    assert!(report.result.candidates.iter().all(|c| c.packaging_cost == 70));
    assert!(report.result.recommended.is_some());
}

#[tokio::test]
async fn test_request_fields_override_saved_ones() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .returning(|id| Ok(Some(listing(id, Some(Marketplace::Mercari), Some(small_parcel())))));
    store
        .expect_update_simulation_inputs()
        .withf(|_, update| {
            update.marketplace == Some(Marketplace::Rakuma)
                && update
                    .shipping_spec
                    .as_ref()
                    .is_some_and(|s| s.weight_g == 1_235.0 && s.packaging_material_id == "none")
        })
        .returning(|_, _| Ok(()));

    let mut request = SimulateListingRequest::reuse_saved(false);
    request.marketplace = Some(Marketplace::Rakuma);
    request.selling_price = Some(4_500);
    request.weight_kg = Some(1.2346);
    request.packaging_material_id = Some("none".to_string());

    let report = simulator(store).simulate_listing("l1", &request).await.unwrap();

    assert_eq!(report.input.selling_price, 4_500);
    assert_eq!(report.input.shipping_spec.packaging_material_cost, Some(0));
    assert!(report.result.candidates.iter().all(|c| c.marketplace == Marketplace::Rakuma));
    assert!(report.result.candidates.iter().all(|c| c.platform_fee == 270));
}

#[tokio::test]
async fn test_unknown_listing_is_not_found() {
    let mut store = MockStore::new();
    store.expect_get_listing().returning(|_| Ok(None));
    store.expect_update_simulation_inputs().never();

    let err = simulator(store)
        .simulate_listing("missing", &SimulateListingRequest::reuse_saved(true))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::ListingNotFound(ref id) if id == "missing"));
    assert_eq!(ApiError(err).status().as_u16(), 404);
}

#[tokio::test]
async fn test_sold_listing_cannot_be_simulated() {
    let mut store = MockStore::new();
    store.expect_get_listing().returning(|id| {
        let mut sold = listing(id, Some(Marketplace::Mercari), Some(small_parcel()));
        sold.mark_sold(2_800, Utc::now());
        Ok(Some(sold))
    });

    let err = simulator(store)
        .simulate_listing("l1", &SimulateListingRequest::reuse_saved(false))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::ListingNotListed(_)));
    assert_eq!(ApiError(err).status().as_u16(), 422);
}

#[tokio::test]
async fn test_single_mode_without_marketplace_is_rejected() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .returning(|id| Ok(Some(listing(id, None, Some(small_parcel())))));
    store.expect_update_simulation_inputs().never();

    let err = simulator(store)
        .simulate_listing("l1", &SimulateListingRequest::reuse_saved(false))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::MarketplaceRequired));
}

#[tokio::test]
async fn test_missing_dimensions_are_rejected() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .returning(|id| Ok(Some(listing(id, Some(Marketplace::Mercari), None))));

    let err = simulator(store)
        .simulate_listing("l1", &SimulateListingRequest::reuse_saved(false))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotPositive { field: "length_cm" }));
}

#[tokio::test]
async fn test_failed_write_back_becomes_a_warning() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .returning(|id| Ok(Some(listing(id, Some(Marketplace::Mercari), Some(small_parcel())))));
    store
        .expect_update_simulation_inputs()
        .returning(|_, _| Err(anyhow::anyhow!("disk full")));

    let report = simulator(store)
        .simulate_listing("l1", &SimulateListingRequest::reuse_saved(true))
        .await
        .unwrap();

    assert!(!report.result.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("disk full"));
}

#[tokio::test]
async fn test_nothing_fits_warns_but_succeeds() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .returning(|id| Ok(Some(listing(id, Some(Marketplace::Mercari), Some(small_parcel())))));
    store.expect_update_simulation_inputs().returning(|_, _| Ok(()));

    let mut request = SimulateListingRequest::reuse_saved(true);
    request.weight_kg = Some(40.0);

    let report = simulator(store).simulate_listing("l1", &request).await.unwrap();

    assert!(report.result.is_empty());
    assert!(report.result.recommended.is_none());
    assert_eq!(report.warnings, vec![NO_FIT_WARNING.to_string()]);
}

// ---- Listing Manager ----

#[tokio::test]
async fn test_create_rejects_blank_title_and_bad_price() {
    let mut store = MockStore::new();
    store.expect_insert_listing().never();
    let manager = ListingManager::new(Arc::new(store));

    assert!(matches!(manager.create(draft("  ", 1_000)).await, Err(ServiceError::EmptyTitle)));
    assert!(matches!(
        manager.create(draft("Mug", 0)).await,
        Err(ServiceError::NotPositive { field: "price" })
    ));
}

#[tokio::test]
async fn test_mark_sold_checks_existence_first() {
    let mut store = MockStore::new();
    store
        .expect_get_listing()
        .with(eq("ghost"))
        .returning(|_| Ok(None));
    store.expect_mark_sold().never();
    let manager = ListingManager::new(Arc::new(store));

    let err = manager.mark_sold("ghost", 1_000).await.unwrap_err();
    assert!(matches!(err, ServiceError::ListingNotFound(_)));
}

#[tokio::test]
async fn test_store_failures_surface_as_server_errors() {
    let mut store = MockStore::new();
    store
        .expect_list_listings()
        .returning(|| Err(anyhow::anyhow!("unreadable")));
    let manager = ListingManager::new(Arc::new(store));

    let err = manager.summary().await.unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));
    assert_eq!(ApiError(err).status().as_u16(), 500);
}

// ---- JSON Store ----

#[tokio::test]
async fn test_json_store_lifecycle_survives_reopen() {
    let dir = temp_dir();
    let store = Arc::new(JsonListingStore::open(&dir).await.unwrap());
    let manager = ListingManager::new(Arc::clone(&store));
    let simulator = SimulatorService::new(Arc::new(RuleTables::builtin()), Arc::clone(&store));

    let kept = manager.create(draft("Mug", 1_200)).await.unwrap();
    let sold = manager.create(draft("Lamp", 4_000)).await.unwrap();
    let gone = manager.create(draft("Poster", 800)).await.unwrap();

    let mut request = SimulateListingRequest::reuse_saved(true);
    request.length_cm = Some(20.0);
    request.width_cm = Some(15.0);
    request.height_cm = Some(2.0);
    request.weight_kg = Some(0.3);
    let report = simulator.simulate_listing(&kept, &request).await.unwrap();
    assert!(report.warnings.is_empty());

    manager.mark_sold(&sold, 3_500).await.unwrap();
    assert_eq!(manager.delete(&[gone]).await.unwrap(), 1);
    drop(manager);
    drop(simulator);
    drop(store);

    let reopened = JsonListingStore::open(&dir).await.unwrap();
    let listings = reopened.list_listings().await.unwrap();
    assert_eq!(listings.len(), 2);

    let mug = reopened.get_listing(&kept).await.unwrap().unwrap();
    assert_eq!(mug.shipping_spec.unwrap().weight_g, 300.0);
    let lamp = reopened.get_listing(&sold).await.unwrap().unwrap();
    assert_eq!(lamp.status, ListingStatus::Sold);
    assert_eq!(lamp.sold_price, Some(3_500));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_summary_over_json_store_blocking() {
    let dir = temp_dir();
    tokio_test::block_on(async {
        let store = Arc::new(JsonListingStore::open(&dir).await.unwrap());
        let manager = ListingManager::new(store);

        let a = manager.create(draft("Mug", 1_200)).await.unwrap();
        manager.create(draft("Lamp", 4_000)).await.unwrap();
        manager.mark_sold(&a, 1_000).await.unwrap();

        let summary = manager.summary().await.unwrap();
        assert_eq!(summary.listed_count, 1);
        assert_eq!(summary.sold_count, 1);
        assert_eq!(summary.total_revenue, 1_000);
        assert_eq!(summary.monthly_revenue.values().sum::<Yen>(), 1_000);
    });
    let _ = std::fs::remove_dir_all(&dir);
}
