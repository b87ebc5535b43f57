//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `membership` - VIP lifecycle and payment verification
//! - `pricing` - Cached price quotes and their freshness

pub mod foundation;
pub mod membership;
pub mod pricing;
