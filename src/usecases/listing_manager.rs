//! Listing Manager - Listing Lifecycle and Sale Tracking
//!
//! Manages listings from creation to sale:
//! - Creating listed records
//! - Marking listings as sold with the final price
//! - Bulk deletion
//! - Sales summary (counts, revenue, monthly revenue)

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::listing::{Listing, ListingId, NewListing, SalesSummary};
use crate::domain::marketplace::Yen;
use crate::ports::listing_store::ListingStore;

use super::error::ServiceError;

/// Listing CRUD and sale tracking over a store.
pub struct ListingManager<S: ListingStore> {
  /// Listing record store.
  store: Arc<S>,
}

impl<S: ListingStore> ListingManager<S> {
  /// Create a new listing manager.
  pub const fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  /// All listings, newest first.
  pub async fn listings(&self) -> Result<Vec<Listing>, ServiceError> {
    Ok(self.store.list_listings().await?)
  }

  /// Validate and insert a new listing.
  #[instrument(skip(self, draft), fields(title = %draft.title))]
  pub async fn create(&self, draft: NewListing) -> Result<ListingId, ServiceError> {
    if draft.title.trim().is_empty() {
      return Err(ServiceError::EmptyTitle);
    }
    if draft.price <= 0 {
      return Err(ServiceError::NotPositive { field: "price" });
    }
    Ok(self.store.insert_listing(draft).await?)
  }

  /// Record the sale of a listing.
  #[instrument(skip(self))]
  pub async fn mark_sold(&self, id: &str, sold_price: Yen) -> Result<Listing, ServiceError> {
    if sold_price <= 0 {
      return Err(ServiceError::NotPositive {
        field: "sold_price",
      });
    }
    let exists = self.store.get_listing(id).await?.is_some();
    if !exists {
      return Err(ServiceError::ListingNotFound(id.to_string()));
    }

    let listing = self.store.mark_sold(id, sold_price).await?;
    info!(listing_id = %id, sold_price, "Listing marked as sold");
    Ok(listing)
  }

  /// Delete listings by id; returns how many were removed.
  pub async fn delete(&self, ids: &[ListingId]) -> Result<usize, ServiceError> {
    Ok(self.store.delete_listings(ids).await?)
  }

  /// Counts and revenue across all listings.
  pub async fn summary(&self) -> Result<SalesSummary, ServiceError> {
    let listings = self.store.list_listings().await?;
    Ok(SalesSummary::from_listings(&listings))
  }

  /// Whether the backing store is usable.
  pub async fn is_healthy(&self) -> bool {
    self.store.is_healthy().await
  }
}
