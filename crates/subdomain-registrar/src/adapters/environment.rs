//! In-Memory Environment
//!
//! Wires every in-memory adapter into one `RegistrarContext` and deploys
//! registrar components against it.

use super::{
    InMemoryEventLog, InMemoryLedger, InMemoryLegacyRegistrar, InMemoryNameRegistry,
    InMemoryResolver, InMemorySuccessorDirectory, VersionedSuccessor,
};
use crate::config::RegistrarConfig;
use crate::domain::RegistrarVersion;
use crate::ports::outbound::{EscrowView, NameRegistry, SuccessorRegistry};
use crate::service::{DeedCustodian, DomainRegistry, ExecutionLock, RegistrarContext};
use shared_types::Address;
use std::sync::Arc;

/// Address the legacy registrar acts as.
pub const LEGACY_REGISTRAR: Address = Address::repeat_byte(0xee);

/// Shared in-memory world for registrar components.
pub struct InMemoryEnvironment {
    /// Configuration handed to every component.
    pub config: RegistrarConfig,
    /// Name Resolution Registry.
    pub names: Arc<InMemoryNameRegistry>,
    /// Resolver records.
    pub resolvers: Arc<InMemoryResolver>,
    /// Legacy Parent Registrar; owns the TLD node initially.
    pub legacy: Arc<InMemoryLegacyRegistrar>,
    /// Balances.
    pub ledger: Arc<InMemoryLedger>,
    /// Published events.
    pub events: Arc<InMemoryEventLog>,
    /// Successor lookup.
    pub successors: Arc<InMemorySuccessorDirectory>,
    /// Lock shared by every deployed component.
    pub lock: ExecutionLock,
}

impl InMemoryEnvironment {
    /// Environment with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistrarConfig::default())
    }

    /// Environment for `config`. The legacy registrar owns the TLD node.
    pub fn with_config(config: RegistrarConfig) -> Self {
        let names = Arc::new(InMemoryNameRegistry::new());
        let tld_node = config.tld_node();
        // The in-memory registry never fails a write.
        let _ = names.set_owner(tld_node, LEGACY_REGISTRAR);
        let legacy = Arc::new(InMemoryLegacyRegistrar::new(
            LEGACY_REGISTRAR,
            tld_node,
            names.clone(),
        ));

        Self {
            config,
            names,
            resolvers: Arc::new(InMemoryResolver::new()),
            legacy,
            ledger: Arc::new(InMemoryLedger::new()),
            events: Arc::new(InMemoryEventLog::new()),
            successors: Arc::new(InMemorySuccessorDirectory::new()),
            lock: ExecutionLock::new(),
        }
    }

    /// Context over this environment's adapters.
    pub fn context(&self) -> RegistrarContext {
        RegistrarContext {
            config: self.config.clone(),
            names: self.names.clone(),
            resolvers: self.resolvers.clone(),
            legacy: self.legacy.clone(),
            ledger: self.ledger.clone(),
            events: self.events.clone(),
            successors: self.successors.clone(),
            lock: self.lock.clone(),
        }
    }

    /// Deploy a Deed Custodian at `address`.
    pub fn deploy_custodian(&self, address: Address) -> Arc<DeedCustodian> {
        Arc::new(DeedCustodian::new(address, self.context()))
    }

    /// Deploy a Domain Registry at `address` and make it reachable as a
    /// migration successor.
    pub fn deploy_registry(
        &self,
        address: Address,
        operator: Address,
        escrow: Arc<dyn EscrowView>,
    ) -> Arc<DomainRegistry> {
        let registry = Arc::new(DomainRegistry::new(address, operator, escrow, self.context()));
        let successor: Arc<dyn SuccessorRegistry> = registry.clone();
        self.successors.register(&successor);
        registry
    }

    /// Re-register `registry` behind the calling convention of `version`.
    ///
    /// The directory holds the shim weakly; keep the returned handle alive.
    pub fn expose_as(
        &self,
        registry: Arc<DomainRegistry>,
        version: RegistrarVersion,
    ) -> Arc<dyn SuccessorRegistry> {
        let shim: Arc<dyn SuccessorRegistry> = Arc::new(VersionedSuccessor::new(registry, version));
        self.successors.register(&shim);
        shim
    }

    /// Hand the TLD node to `owner`, ending the legacy registrar's control.
    pub fn replace_tld_owner(&self, owner: Address) {
        let _ = self.names.set_owner(self.config.tld_node(), owner);
    }
}

impl Default for InMemoryEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
