//! HTTP routes over the simulator and listing use cases.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::listing::{Listing, ListingId, NewListing, SalesSummary};
use crate::domain::marketplace::{PlatformFeeRule, Yen};
use crate::domain::shipping::{PackagingMaterial, ShippingMethod};
use crate::domain::simulation::{SimulationInput, SimulationResult};
use crate::ports::listing_store::ListingStore;
use crate::usecases::{ListingManager, SimulateListingRequest, SimulationReport, SimulatorService};

use super::error::ApiError;

/// Shared handler state.
pub struct AppState<S: ListingStore> {
    pub simulator: Arc<SimulatorService<S>>,
    pub listings: Arc<ListingManager<S>>,
    pub metrics: Arc<MetricsRegistry>,
}

impl<S: ListingStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            simulator: Arc::clone(&self.simulator),
            listings: Arc::clone(&self.listings),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Active rule tables as served by `GET /rules`.
#[derive(Debug, Serialize)]
pub struct RulesView<'a> {
    pub marketplaces: Vec<&'a PlatformFeeRule>,
    pub shipping_methods: &'a [ShippingMethod],
    pub packaging_materials: &'a [PackagingMaterial],
}

#[derive(Debug, Deserialize)]
pub struct DeleteListingsRequest {
    pub ids: Vec<ListingId>,
}

#[derive(Debug, Serialize)]
pub struct DeleteListingsResponse {
    pub deleted: usize,
}

#[derive(Debug, Deserialize)]
pub struct MarkSoldRequest {
    pub sold_price: Yen,
}

#[derive(Debug, Serialize)]
pub struct CreatedListing {
    pub id: ListingId,
}

/// Build the application router.
pub fn router<S: ListingStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness::<S>))
        .route("/metrics", get(render_metrics::<S>))
        .route("/rules", get(rules::<S>))
        .route("/simulate", post(simulate::<S>))
        .route(
            "/listings",
            get(list_listings::<S>)
                .post(create_listing::<S>)
                .delete(delete_listings::<S>),
        )
        .route("/listings/summary", get(summary::<S>))
        .route("/listings/:id/sold", post(mark_sold::<S>))
        .route("/listings/:id/simulate", post(simulate_listing::<S>))
        .with_state(state)
}

async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness<S: ListingStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    if state.listings.is_healthy().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

async fn render_metrics<S: ListingStore>(State(state): State<AppState<S>>) -> Result<String, ApiError> {
    Ok(state.metrics.render()?)
}

async fn rules<S: ListingStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let tables = state.simulator.tables();
    let view = RulesView {
        marketplaces: tables
            .marketplaces()
            .iter()
            .filter_map(|m| tables.fee_rule(*m))
            .collect(),
        shipping_methods: tables.shipping_methods(),
        packaging_materials: tables.packaging_materials(),
    };
    Json(view).into_response()
}

async fn simulate<S: ListingStore>(
    State(state): State<AppState<S>>,
    Json(input): Json<SimulationInput>,
) -> Json<SimulationResult> {
    let result = state.simulator.simulate(&input);
    state
        .metrics
        .observe_simulation(input.compare_all_platforms, &result);
    Json(result)
}

async fn list_listings<S: ListingStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    Ok(Json(state.listings.listings().await?))
}

async fn create_listing<S: ListingStore>(
    State(state): State<AppState<S>>,
    Json(draft): Json<NewListing>,
) -> Result<(StatusCode, Json<CreatedListing>), ApiError> {
    let id = state.listings.create(draft).await?;
    Ok((StatusCode::CREATED, Json(CreatedListing { id })))
}

async fn delete_listings<S: ListingStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<DeleteListingsRequest>,
) -> Result<Json<DeleteListingsResponse>, ApiError> {
    let deleted = state.listings.delete(&body.ids).await?;
    Ok(Json(DeleteListingsResponse { deleted }))
}

async fn summary<S: ListingStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<SalesSummary>, ApiError> {
    Ok(Json(state.listings.summary().await?))
}

async fn mark_sold<S: ListingStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<ListingId>,
    Json(body): Json<MarkSoldRequest>,
) -> Result<Json<Listing>, ApiError> {
    let listing = state.listings.mark_sold(&id, body.sold_price).await?;
    state.metrics.listings_sold.inc();
    Ok(Json(listing))
}

async fn simulate_listing<S: ListingStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<ListingId>,
    Json(request): Json<SimulateListingRequest>,
) -> Result<Json<SimulationReport>, ApiError> {
    let report = state.simulator.simulate_listing(&id, &request).await?;
    state
        .metrics
        .observe_simulation(request.compare_all_platforms, &report.result);
    Ok(Json(report))
}
