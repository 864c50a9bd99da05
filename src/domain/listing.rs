//! Listing records and sale tracking.
//!
//! A listing is the seller's persisted draft: asking price, optional default
//! marketplace and the last package description used for simulation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::marketplace::{Marketplace, Yen};
use super::shipping::ShippingSpec;

/// Lightweight listing identifier used at the ports boundary.
pub type ListingId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Listed,
    Sold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    /// Asking price.
    pub price: Yen,
    #[serde(default)]
    pub marketplace: Option<Marketplace>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sold_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sold_price: Option<Yen>,
    /// Package description saved by the last simulation run.
    #[serde(default)]
    pub shipping_spec: Option<ShippingSpec>,
}

impl Listing {
    /// Turn a draft into a new listed record.
    pub fn from_draft(id: ListingId, draft: NewListing, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            condition: draft.condition,
            price: draft.price,
            marketplace: draft.marketplace,
            status: ListingStatus::Listed,
            created_at: now,
            sold_at: None,
            sold_price: None,
            shipping_spec: draft.shipping_spec,
        }
    }

    pub fn is_listed(&self) -> bool {
        self.status == ListingStatus::Listed
    }

    pub fn mark_sold(&mut self, sold_price: Yen, at: DateTime<Utc>) {
        self.status = ListingStatus::Sold;
        self.sold_price = Some(sold_price);
        self.sold_at = Some(at);
    }

    /// Revenue attributed to this listing: sold price, else asking price.
    pub fn revenue(&self) -> Yen {
        self.sold_price.unwrap_or(self.price)
    }
}

/// Fields supplied when creating a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub condition: String,
    pub price: Yen,
    #[serde(default)]
    pub marketplace: Option<Marketplace>,
    #[serde(default)]
    pub shipping_spec: Option<ShippingSpec>,
}

/// Counts and revenue across a seller's listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub listed_count: usize,
    pub sold_count: usize,
    /// Sum of revenue over sold listings.
    pub total_revenue: Yen,
    /// Sold revenue keyed by the `YYYY-MM` of `sold_at`.
    pub monthly_revenue: BTreeMap<String, Yen>,
}

impl SalesSummary {
    pub fn from_listings<'a>(listings: impl IntoIterator<Item = &'a Listing>) -> Self {
        let mut summary = Self::default();
        for listing in listings {
            match listing.status {
                ListingStatus::Listed => summary.listed_count += 1,
                ListingStatus::Sold => {
                    summary.sold_count += 1;
                    let revenue = listing.revenue();
                    summary.total_revenue = summary.total_revenue.saturating_add(revenue);
                    // Sales without a sale date have no month to land in.
                    if let Some(sold_at) = listing.sold_at {
                        let bucket = summary
                            .monthly_revenue
                            .entry(sold_at.format("%Y-%m").to_string())
                            .or_default();
                        *bucket = bucket.saturating_add(revenue);
                    }
                }
            }
        }
        summary
    }
}
