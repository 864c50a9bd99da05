//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! seller-facing workflows. Each use case is a self-contained business
//! operation.
//!
//! Use cases:
//! - `SimulatorService`: listing-driven profit simulation with write-back
//! - `ListingManager`: listing lifecycle and sale tracking

pub mod error;
pub mod listing_manager;
pub mod simulator;

pub use error::ServiceError;
pub use listing_manager::ListingManager;
pub use simulator::{SimulateListingRequest, SimulationReport, SimulatorService};
