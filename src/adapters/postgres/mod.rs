//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresMembershipStore` - Membership records with row-locked transitions

mod membership_store;

pub use membership_store::PostgresMembershipStore;
