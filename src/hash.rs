//! Content hashing used to key the incremental result cache.
//!
//! Source text is normalized to Unix line endings before hashing, so that
//! checking out a tree with different line-ending settings doesn't
//! invalidate the whole cache.

use sha2::{Digest, Sha256};

/// A hex-encoded SHA-256 digest.
pub type Digest256 = String;

/// Hash a single piece of source text.
pub fn hash_source(code: &str) -> Digest256 {
    let normalized = code.replace("\r\n", "\n");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Combine several already-computed digests into one, for cache keys that
/// depend on more than one input (for example, a gremlin's source hash and
/// the combined hash of the tests that cover it).
///
/// Each part is separated by a single `\0` byte before re-hashing, so that
/// `combine(["ab", "c"])` and `combine(["a", "bc"])` never collide.
pub fn combine<'a>(parts: impl IntoIterator<Item = &'a str>) -> Digest256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write;
        let bytes = bytes.as_ref();
        let mut s = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            write!(s, "{b:02x}").expect("writing to a String cannot fail");
        }
        s
    }
}
