//! The incremental result cache: remembers the outcome of testing a gremlin
//! so that an unchanged gremlin, covered by unchanged tests, doesn't need to
//! be run again.

mod store;

pub use store::ResultCache;

use crate::hash::combine;

/// Build the cache key for one gremlin: its id, the hash of the source file
/// it mutates, and the combined hash of the tests selected to cover it.
///
/// Changing any of the three invalidates the entry, simply because the key
/// itself changes; stale entries are never explicitly deleted, only never
/// looked up again.
pub fn cache_key(gremlin_id: &str, source_hash: &str, covering_tests_hash: &str) -> String {
    combine([gremlin_id, source_hash, covering_tests_hash])
}
