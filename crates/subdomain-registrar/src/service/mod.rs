//! # Service Layer
//!
//! State machines binding the domain to the outbound ports.
//!
//! Every component built from one `RegistrarContext` shares its
//! `ExecutionLock`. A public state-changing call holds the lock for its whole
//! duration, so calls are applied one at a time even when they span several
//! registries (a migration calls into its successor while holding it).

mod custodian;
mod journal;
mod migration;
mod registry;
mod settlement;

pub use custodian::DeedCustodian;
pub use registry::{DomainRegistry, RegistrarStats};

use crate::config::RegistrarConfig;
use crate::ports::outbound::{
    AddressResolver, EventSink, LegacyRegistrar, NameRegistry, SuccessorDirectory, ValueTransfer,
};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::Arc;

/// Re-entrant lock serializing calls across components.
#[derive(Clone, Default)]
pub struct ExecutionLock(Arc<ReentrantMutex<()>>);

impl ExecutionLock {
    /// Create a fresh lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until this thread holds the lock.
    pub fn acquire(&self) -> ReentrantMutexGuard<'_, ()> {
        self.0.lock()
    }
}

/// Injected capabilities and settings shared by registrar components.
#[derive(Clone)]
pub struct RegistrarContext {
    /// Registrar configuration.
    pub config: RegistrarConfig,
    /// Name Resolution Registry.
    pub names: Arc<dyn NameRegistry>,
    /// Resolver address records.
    pub resolvers: Arc<dyn AddressResolver>,
    /// Legacy Parent Registrar.
    pub legacy: Arc<dyn LegacyRegistrar>,
    /// Value transfer.
    pub ledger: Arc<dyn ValueTransfer>,
    /// Event publication.
    pub events: Arc<dyn EventSink>,
    /// Successor lookup for migrations.
    pub successors: Arc<dyn SuccessorDirectory>,
    /// Serializes every call made through this context.
    pub lock: ExecutionLock,
}
