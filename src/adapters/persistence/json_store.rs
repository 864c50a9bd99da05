//! JSON Listing Store - Atomic Snapshot Persistence
//!
//! Keeps every listing in memory and persists the full set to
//! `listings.json` using atomic writes (write to tmp file, then rename).
//! The file is always either the old or new version, never a partial write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::listing::{Listing, ListingId, NewListing};
use crate::domain::marketplace::Yen;
use crate::ports::listing_store::{ListingStore, SimulationInputsUpdate};

/// File-backed listing store.
///
/// All mutations hold the mutex across the write so concurrent requests
/// cannot interleave snapshots.
pub struct JsonListingStore {
    /// Path to listings.json.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// In-memory copy of the file contents.
    listings: Mutex<Vec<Listing>>,
}

impl JsonListingStore {
    /// Open (or create) the store in the given data directory.
    pub async fn open(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .context("Failed to create data directory")?;

        let path = dir.join("listings.json");
        let exists = fs::try_exists(&path)
            .await
            .context("Failed to check listings file")?;
        let listings = if exists {
            let json = fs::read_to_string(&path)
                .await
                .context("Failed to read listings file")?;
            serde_json::from_str::<Vec<Listing>>(&json).context("Failed to parse listings JSON")?
        } else {
            info!("No listings file found, starting empty");
            Vec::new()
        };

        info!(path = %path.display(), listings = listings.len(), "Listing store opened");

        Ok(Self {
            tmp_path: dir.join("listings.json.tmp"),
            path,
            listings: Mutex::new(listings),
        })
    }

    /// Write the snapshot atomically (tmp → rename).
    async fn persist(&self, listings: &[Listing]) -> Result<()> {
        let json = serde_json::to_string_pretty(listings).context("Failed to serialize listings")?;

        fs::write(&self.tmp_path, &json)
            .await
            .context("Failed to write tmp listings file")?;

        fs::rename(&self.tmp_path, &self.path)
            .await
            .context("Failed to rename listings file")?;

        Ok(())
    }
}

#[async_trait]
impl ListingStore for JsonListingStore {
    async fn list_listings(&self) -> Result<Vec<Listing>> {
        let mut listings = self.listings.lock().await.clone();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn get_listing(&self, id: &str) -> Result<Option<Listing>> {
        let listings = self.listings.lock().await;
        Ok(listings.iter().find(|l| l.id == id).cloned())
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn insert_listing(&self, draft: NewListing) -> Result<ListingId> {
        let id = Uuid::new_v4().to_string();
        let mut listings = self.listings.lock().await;
        listings.push(Listing::from_draft(id.clone(), draft, Utc::now()));
        if let Err(e) = self.persist(&listings).await {
            listings.pop();
            return Err(e);
        }
        info!(listing_id = %id, "Listing created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn mark_sold(&self, id: &str, sold_price: Yen) -> Result<Listing> {
        let mut listings = self.listings.lock().await;
        let index = listings
            .iter()
            .position(|l| l.id == id)
            .with_context(|| format!("Listing not found: {id}"))?;

        let previous = listings[index].clone();
        listings[index].mark_sold(sold_price, Utc::now());
        if let Err(e) = self.persist(&listings).await {
            listings[index] = previous;
            return Err(e);
        }
        Ok(listings[index].clone())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_listings(&self, ids: &[ListingId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut listings = self.listings.lock().await;
        let before = listings.clone();
        listings.retain(|l| !ids.contains(&l.id));
        let removed = before.len() - listings.len();
        if removed == 0 {
            return Ok(0);
        }
        if let Err(e) = self.persist(&listings).await {
            *listings = before;
            return Err(e);
        }
        info!(removed, "Listings deleted");
        Ok(removed)
    }

    #[instrument(skip(self, update))]
    async fn update_simulation_inputs(&self, id: &str, update: &SimulationInputsUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let mut listings = self.listings.lock().await;
        let index = listings
            .iter()
            .position(|l| l.id == id)
            .with_context(|| format!("Listing not found: {id}"))?;

        let previous = listings[index].clone();
        let listing = &mut listings[index];
        if let Some(marketplace) = update.marketplace {
            listing.marketplace = Some(marketplace);
        }
        if let Some(spec) = &update.shipping_spec {
            listing.shipping_spec = Some(spec.clone());
        }
        if let Err(e) = self.persist(&listings).await {
            warn!(error = %e, "Failed to save simulation inputs");
            listings[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        let Some(dir) = self.path.parent() else {
            return false;
        };
        if fs::metadata(dir).await.is_err() {
            return false;
        }
        // Nothing written yet is fine; an unreadable file is not.
        match fs::try_exists(&self.path).await {
            Ok(false) => true,
            Ok(true) => fs::metadata(&self.path).await.is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingStatus;
    use crate::domain::marketplace::Marketplace;
    use crate::domain::shipping::ShippingSpec;

    fn temp_dir() -> String {
        std::env::temp_dir()
            .join(format!("listing-store-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    fn draft(title: &str, price: Yen) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: String::new(),
            category: String::new(),
            condition: String::new(),
            price,
            marketplace: None,
            shipping_spec: None,
        }
    }

    #[tokio::test]
    async fn listings_survive_reopen() {
        let dir = temp_dir();
        let store = JsonListingStore::open(&dir).await.unwrap();
        let id = store.insert_listing(draft("lamp", 2500)).await.unwrap();
        store.mark_sold(&id, 2300).await.unwrap();
        drop(store);

        let reopened = JsonListingStore::open(&dir).await.unwrap();
        let listing = reopened.get_listing(&id).await.unwrap().unwrap();
        assert_eq!(listing.status, ListingStatus::Sold);
        assert_eq!(listing.sold_price, Some(2300));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn simulation_inputs_are_written_back() {
        let dir = temp_dir();
        let store = JsonListingStore::open(&dir).await.unwrap();
        let id = store.insert_listing(draft("mug", 1200)).await.unwrap();

        let spec = ShippingSpec {
            length_cm: 15.0,
            width_cm: 12.0,
            height_cm: 10.0,
            weight_g: 450.0,
            packaging_material_id: "box_60_generic".to_string(),
            packaging_material_cost: Some(120),
        };
        let update = SimulationInputsUpdate {
            marketplace: Some(Marketplace::Rakuma),
            shipping_spec: Some(spec.clone()),
        };
        store.update_simulation_inputs(&id, &update).await.unwrap();

        let listing = store.get_listing(&id).await.unwrap().unwrap();
        assert_eq!(listing.marketplace, Some(Marketplace::Rakuma));
        assert_eq!(listing.shipping_spec, Some(spec));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unknown_ids_are_reported_or_ignored() {
        let dir = temp_dir();
        let store = JsonListingStore::open(&dir).await.unwrap();
        assert!(store.mark_sold("missing", 100).await.is_err());
        assert_eq!(store.delete_listings(&["missing".to_string()]).await.unwrap(), 0);
        assert_eq!(store.delete_listings(&[]).await.unwrap(), 0);
        assert!(
            store
                .update_simulation_inputs("missing", &SimulationInputsUpdate::default())
                .await
                .is_ok()
        );
        assert!(store.is_healthy().await);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn delete_removes_only_named_listings() {
        let dir = temp_dir();
        let store = JsonListingStore::open(&dir).await.unwrap();
        let a = store.insert_listing(draft("a", 100)).await.unwrap();
        let b = store.insert_listing(draft("b", 200)).await.unwrap();
        assert_eq!(store.delete_listings(&[a.clone()]).await.unwrap(), 1);
        let remaining = store.list_listings().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn health_follows_the_data_directory() {
        let dir = temp_dir();
        let store = JsonListingStore::open(&dir).await.unwrap();
        assert!(store.is_healthy().await);

        store.insert_listing(draft("Mug", 1_200)).await.unwrap();
        assert!(store.is_healthy().await);

        fs::remove_dir_all(&dir).await.unwrap();
        assert!(!store.is_healthy().await);
    }
}
