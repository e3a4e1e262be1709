//! # Shared Types Crate
//!
//! Value types shared by the registrar crates.
//!
//! ## Design Principles
//!
//! - **Fixed-width identities**: `Address` is always 20 bytes and `Hash` is
//!   always 32 bytes; the zero value of either means "unset".
//! - **Integer money**: amounts are `U256`, never floating point.
//! - **Deterministic names**: a fully-qualified name maps to exactly one node
//!   hash through [`namehash`].

pub mod errors;
pub mod names;
pub mod primitives;

pub use errors::*;
pub use names::{keccak256, labelhash, namehash, subnode};
pub use primitives::{Address, Hash, U256};
