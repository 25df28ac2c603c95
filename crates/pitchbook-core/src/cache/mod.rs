//! Local caching for offline access.
//!
//! Every collection fetched from the hosted database is written as
//! `{cache_dir}/{name}.json` holding `{data, cached_at}`. A cache is
//! considered stale after 60 minutes; stale data is still served when the
//! network is unavailable.

pub mod manager;

pub use manager::{format_age, CacheAges, CacheManager, CachedData};
