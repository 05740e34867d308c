//! Redis adapters.

mod price_cache;

pub use price_cache::RedisPriceCache;
