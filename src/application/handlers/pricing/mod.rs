//! Pricing handlers.
//!
//! Keeps the last known quote in memory and refreshes it in the background.

mod price_cache;

pub use price_cache::{PriceCache, PriceRefresher, PriceView};
