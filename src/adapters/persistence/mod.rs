//! Persistence Adapters - JSON File Storage
//!
//! Implements the ListingStore port with a single atomically-replaced
//! JSON snapshot. No database dependency.

pub mod json_store;

pub use json_store::JsonListingStore;
