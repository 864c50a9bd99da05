//! Domain layer - Core business logic and models.
//!
//! Pure, synchronous simulation logic: marketplace fee rules, shipping
//! methods and the fit evaluator, tier deduplication, rule tables and the
//! profit simulation engine. No I/O here (hexagonal architecture inner
//! ring); everything is serializable and testable in isolation.

pub mod catalog;
pub mod listing;
pub mod marketplace;
pub mod rules;
pub mod shipping;
pub mod simulation;
pub mod tiers;

// Re-export core types for convenience
pub use listing::{Listing, ListingId, ListingStatus, NewListing, SalesSummary};
pub use marketplace::{Marketplace, PlatformFeeRule, Rounding, Yen};
pub use rules::{RuleOverrides, RuleTables, RulesError};
pub use shipping::{NO_PACKAGING_ID, PackagingMaterial, ShippingMethod, ShippingSpec, SizeTier, fits};
pub use simulation::{
    SimulationCandidate, SimulationEngine, SimulationInput, SimulationResult, calculate_simulation,
    rank_order,
};
pub use tiers::dedupe_tiers;
