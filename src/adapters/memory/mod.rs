//! In-process adapters for local runs and tests.

mod membership_store;

pub use membership_store::InMemoryMembershipStore;
