//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ListingStore`: listing records, sale tracking and saved simulation inputs

pub mod listing_store;

pub use listing_store::{ListingStore, SimulationInputsUpdate};
