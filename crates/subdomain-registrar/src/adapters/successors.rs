//! Successor Registry Adapters
//!
//! Directory of live Domain Registry instances, plus the argument-order
//! shim for successors deployed with an older calling convention.

use crate::domain::{DomainQuery, MigratedDomain, RegistrarError, RegistrarVersion};
use crate::events::EmittedEvent;
use crate::ports::outbound::{SuccessorDirectory, SuccessorRegistry};
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// In-memory directory of successor registries.
///
/// Holds weak references so registries that share a context with the
/// directory do not keep each other alive.
#[derive(Default)]
pub struct InMemorySuccessorDirectory {
    entries: RwLock<HashMap<Address, Weak<dyn SuccessorRegistry>>>,
}

impl InMemorySuccessorDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `registry` reachable at its address.
    pub fn register(&self, registry: &Arc<dyn SuccessorRegistry>) {
        self.entries
            .write()
            .insert(registry.address(), Arc::downgrade(registry));
    }
}

impl SuccessorDirectory for InMemorySuccessorDirectory {
    fn resolve(&self, address: Address) -> Option<Arc<dyn SuccessorRegistry>> {
        self.entries.read().get(&address).and_then(Weak::upgrade)
    }
}

/// A successor answering in the positional order of `version`.
///
/// Wraps a registry that takes `(label, subdomain)`; incoming arguments
/// are reordered before being forwarded.
pub struct VersionedSuccessor {
    inner: Arc<dyn SuccessorRegistry>,
    version: RegistrarVersion,
}

impl VersionedSuccessor {
    /// Wrap `inner`.
    pub fn new(inner: Arc<dyn SuccessorRegistry>, version: RegistrarVersion) -> Self {
        Self { inner, version }
    }

    /// Calling convention of this successor.
    pub fn version(&self) -> RegistrarVersion {
        self.version
    }
}

impl SuccessorRegistry for VersionedSuccessor {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn prepare_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<(), RegistrarError> {
        self.inner.prepare_migrated_domain(from, domain)
    }

    fn receive_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<Vec<EmittedEvent>, RegistrarError> {
        self.inner.receive_migrated_domain(from, domain)
    }

    fn discard_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<(), RegistrarError> {
        self.inner.discard_migrated_domain(from, domain)
    }

    fn query(&self, first: &str, second: &str) -> DomainQuery {
        // Reordering is an involution, so the same mapping undoes it.
        let (label, subdomain) = self.version.order_args(first, second);
        self.inner.query(label, subdomain)
    }
}
