//! Use-case error taxonomy.
//!
//! The simulation engine itself never fails; these errors come from input
//! resolution and the record store around it.

use thiserror::Error;

use crate::domain::listing::ListingId;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("listing not found: {0}")]
    ListingNotFound(ListingId),
    #[error("listing {0} is not listed for sale")]
    ListingNotListed(ListingId),
    /// A required number is missing, non-finite or not greater than zero.
    #[error("{field} must be a number greater than 0")]
    NotPositive { field: &'static str },
    #[error("select a marketplace or compare all platforms")]
    MarketplaceRequired,
    #[error("listing title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    /// Caller-side problem (bad input or state) rather than a store fault.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ListingNotListed(_) | Self::NotPositive { .. } | Self::MarketplaceRequired | Self::EmptyTitle
        )
    }
}
