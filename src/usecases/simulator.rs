//! Simulator Service - Listing-Driven Profit Simulation
//!
//! Wraps the pure simulation engine with the listing workflow:
//! 1. Load the listing and its saved defaults
//! 2. Merge request fields over the saved marketplace / shipping spec
//! 3. Validate the merged inputs
//! 4. Run the engine
//! 5. Write the inputs back to the listing for the next run
//!
//! A failed write-back never hides a computed result; it is reported as
//! a warning instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::listing::Listing;
use crate::domain::marketplace::{Marketplace, Yen};
use crate::domain::rules::RuleTables;
use crate::domain::shipping::{NO_PACKAGING_ID, ShippingSpec};
use crate::domain::simulation::{SimulationEngine, SimulationInput, SimulationResult};
use crate::ports::listing_store::{ListingStore, SimulationInputsUpdate};

use super::error::ServiceError;

/// Warning attached when no shipping method fits.
pub const NO_FIT_WARNING: &str = "no shipping method fits these dimensions/weight";

/// Seller input for a listing simulation. Absent fields fall back to the
/// listing's saved values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateListingRequest {
  pub compare_all_platforms: bool,
  #[serde(default)]
  pub selling_price: Option<Yen>,
  #[serde(default)]
  pub marketplace: Option<Marketplace>,
  #[serde(default)]
  pub length_cm: Option<f64>,
  #[serde(default)]
  pub width_cm: Option<f64>,
  #[serde(default)]
  pub height_cm: Option<f64>,
  /// Entered in kilograms; stored in grams.
  #[serde(default)]
  pub weight_kg: Option<f64>,
  #[serde(default)]
  pub packaging_material_id: Option<String>,
  /// Overrides the catalog cost of the chosen packaging.
  #[serde(default)]
  pub packaging_material_cost: Option<Yen>,
}

impl SimulateListingRequest {
  /// Request that reuses every saved value.
  pub const fn reuse_saved(compare_all_platforms: bool) -> Self {
    Self {
      compare_all_platforms,
      selling_price: None,
      marketplace: None,
      length_cm: None,
      width_cm: None,
      height_cm: None,
      weight_kg: None,
      packaging_material_id: None,
      packaging_material_cost: None,
    }
  }
}

/// Engine result plus the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
  pub input: SimulationInput,
  pub result: SimulationResult,
  /// Non-fatal problems to surface to the seller.
  pub warnings: Vec<String>,
}

/// Runs simulations on behalf of listings.
pub struct SimulatorService<S: ListingStore> {
  /// Pure engine over shared rule tables.
  engine: SimulationEngine,
  /// Listing record store.
  store: Arc<S>,
}

impl<S: ListingStore> SimulatorService<S> {
  /// Create a new simulator service.
  pub fn new(tables: Arc<RuleTables>, store: Arc<S>) -> Self {
    Self {
      engine: SimulationEngine::new(tables),
      store,
    }
  }

  pub fn tables(&self) -> &RuleTables {
    self.engine.tables()
  }

  /// Run the engine on a fully specified input.
  pub fn simulate(&self, input: &SimulationInput) -> SimulationResult {
    self.engine.calculate(input)
  }

  /// Simulate for a stored listing, then save the inputs back to it.
  #[instrument(skip(self, request), fields(compare_all = request.compare_all_platforms))]
  pub async fn simulate_listing(
    &self,
    listing_id: &str,
    request: &SimulateListingRequest,
  ) -> Result<SimulationReport, ServiceError> {
    let listing = self
      .store
      .get_listing(listing_id)
      .await?
      .ok_or_else(|| ServiceError::ListingNotFound(listing_id.to_string()))?;
    if !listing.is_listed() {
      return Err(ServiceError::ListingNotListed(listing.id));
    }

    let effective_marketplace = request.marketplace.or(listing.marketplace);
    let input = self.resolve_input(&listing, request, effective_marketplace)?;
    let result = self.engine.calculate(&input);

    let mut warnings = Vec::new();
    if result.is_empty() {
      info!(listing_id, "No shipping method fits the package");
      warnings.push(NO_FIT_WARNING.to_string());
    }

    let update = SimulationInputsUpdate {
      marketplace: effective_marketplace,
      shipping_spec: Some(input.shipping_spec.clone()),
    };
    if let Err(e) = self.store.update_simulation_inputs(listing_id, &update).await {
      warn!(listing_id, error = %e, "Result computed but inputs were not saved");
      warnings.push(format!("result shown, but saving the inputs failed: {e}"));
    }

    Ok(SimulationReport {
      input,
      result,
      warnings,
    })
  }

  /// Merge request fields over the listing's saved values and validate.
  fn resolve_input(
    &self,
    listing: &Listing,
    request: &SimulateListingRequest,
    effective_marketplace: Option<Marketplace>,
  ) -> Result<SimulationInput, ServiceError> {
    let saved = listing.shipping_spec.as_ref();

    let selling_price = request.selling_price.unwrap_or(listing.price);
    if selling_price <= 0 {
      return Err(ServiceError::NotPositive {
        field: "selling_price",
      });
    }

    let length_cm = positive(request.length_cm.or(saved.map(|s| s.length_cm)), "length_cm")?;
    let width_cm = positive(request.width_cm.or(saved.map(|s| s.width_cm)), "width_cm")?;
    let height_cm = positive(request.height_cm.or(saved.map(|s| s.height_cm)), "height_cm")?;
    let weight_g = match request.weight_kg {
      Some(kg) => Some(kg_to_grams(positive(Some(kg), "weight_kg")?)),
      None => saved.map(|s| s.weight_g),
    };
    let weight_g = positive(weight_g, "weight_g")?;

    if !request.compare_all_platforms && effective_marketplace.is_none() {
      return Err(ServiceError::MarketplaceRequired);
    }

    let packaging_id = request
      .packaging_material_id
      .as_deref()
      .or(saved.map(|s| s.packaging_material_id.as_str()))
      .unwrap_or(NO_PACKAGING_ID);
    let packaging = self.engine.tables().resolve_packaging(packaging_id);

    Ok(SimulationInput {
      selling_price,
      compare_all_platforms: request.compare_all_platforms,
      marketplace_selection: if request.compare_all_platforms {
        None
      } else {
        effective_marketplace
      },
      shipping_spec: ShippingSpec {
        length_cm,
        width_cm,
        height_cm,
        weight_g,
        packaging_material_id: packaging.id.clone(),
        packaging_material_cost: Some(request.packaging_material_cost.unwrap_or(packaging.cost)),
      },
    })
  }
}

/// Kilograms to whole grams.
fn kg_to_grams(kg: f64) -> f64 {
  (kg * 1000.0).round()
}

fn positive(value: Option<f64>, field: &'static str) -> Result<f64, ServiceError> {
  value
    .filter(|v| v.is_finite() && *v > 0.0)
    .ok_or(ServiceError::NotPositive { field })
}
