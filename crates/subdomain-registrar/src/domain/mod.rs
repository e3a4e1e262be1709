//! # Domain Module
//!
//! Core domain types for the subdomain registrar.

pub mod entities;
pub mod errors;
pub mod fees;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use fees::*;
pub use invariants::*;
pub use value_objects::*;
