//! # Name Hashing
//!
//! Hierarchical name hashing used to locate names in the Name Resolution
//! Registry. A node hash is computed innermost-last:
//!
//! ```text
//! node("")          = 0x00..00
//! node("a.b.tld")   = keccak(node("b.tld") ++ keccak("a"))
//! ```

use crate::primitives::Hash;
use sha3::{Digest, Keccak256};

/// Computes Keccak-256 of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    Hash::new(Keccak256::digest(data).into())
}

/// Hash of a single label (e.g. `"test"` in `"test.eth"`).
#[must_use]
pub fn labelhash(label: &str) -> Hash {
    keccak256(label.as_bytes())
}

/// Node hash of `label` directly below `parent`.
#[must_use]
pub fn subnode(parent: Hash, label_hash: Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(parent.as_bytes());
    hasher.update(label_hash.as_bytes());
    Hash::new(hasher.finalize().into())
}

/// Node hash of a fully-qualified, dot-separated name.
///
/// The empty string is the root and hashes to zero.
#[must_use]
pub fn namehash(name: &str) -> Hash {
    if name.is_empty() {
        return Hash::ZERO;
    }
    name.rsplit('.')
        .fold(Hash::ZERO, |node, label| subnode(node, labelhash(label)))
}
