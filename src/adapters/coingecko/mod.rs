//! CoinGecko public price feed.

mod price_source;

pub use price_source::{CoinGeckoConfig, CoinGeckoPriceSource};
