//! Listing Store Port - Record Persistence Interface
//!
//! The simulation core never touches storage. Use cases read a listing's
//! defaults (marketplace, last shipping spec) through this trait and write
//! the inputs of a run back for reuse.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{Listing, ListingId, NewListing};
use crate::domain::marketplace::{Marketplace, Yen};
use crate::domain::shipping::ShippingSpec;

/// Partial update written back after a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationInputsUpdate {
  /// Marketplace used for the run, if any.
  pub marketplace: Option<Marketplace>,
  /// Package description used for the run.
  pub shipping_spec: Option<ShippingSpec>,
}

impl SimulationInputsUpdate {
  /// True when there is nothing to write.
  pub fn is_empty(&self) -> bool {
    self.marketplace.is_none() && self.shipping_spec.is_none()
  }
}

/// Trait for listing record storage.
///
/// Implementations must be shareable across request handlers.
#[async_trait]
pub trait ListingStore: Send + Sync + 'static {
  /// All listings, newest first.
  async fn list_listings(&self) -> anyhow::Result<Vec<Listing>>;

  /// A single listing, or `None` if the id is unknown.
  async fn get_listing(&self, id: &str) -> anyhow::Result<Option<Listing>>;

  /// Insert a new listed record and return its id.
  async fn insert_listing(&self, draft: NewListing) -> anyhow::Result<ListingId>;

  /// Record a sale. Errors if the id is unknown.
  async fn mark_sold(&self, id: &str, sold_price: Yen) -> anyhow::Result<Listing>;

  /// Delete listings by id. Unknown ids are ignored; an empty slice is a no-op.
  async fn delete_listings(&self, ids: &[ListingId]) -> anyhow::Result<usize>;

  /// Persist the marketplace / shipping spec used by a simulation run.
  /// An empty update is a no-op.
  async fn update_simulation_inputs(
    &self,
    id: &str,
    update: &SimulationInputsUpdate,
  ) -> anyhow::Result<()>;

  /// Check if the store is usable (directory present, file readable).
  async fn is_healthy(&self) -> bool;
}
