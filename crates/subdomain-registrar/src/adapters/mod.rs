//! # Adapters Module
//!
//! In-memory implementations of every outbound port.

pub mod environment;
pub mod event_sink;
pub mod ledger;
pub mod legacy_registrar;
pub mod name_registry;
pub mod successors;

pub use environment::InMemoryEnvironment;
pub use event_sink::{InMemoryEventLog, JsonLinesEventSink};
pub use ledger::InMemoryLedger;
pub use legacy_registrar::InMemoryLegacyRegistrar;
pub use name_registry::{InMemoryNameRegistry, InMemoryResolver};
pub use successors::{InMemorySuccessorDirectory, VersionedSuccessor};
