//! Name Resolution Registry Adapter
//!
//! Implements `NameRegistry` and `AddressResolver` over in-memory tables.

use crate::domain::RegistrarError;
use crate::ports::outbound::{AddressResolver, NameRegistry};
use parking_lot::RwLock;
use shared_types::{Address, Hash};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Owner and resolver of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct NodeRecord {
    owner: Address,
    resolver: Address,
}

/// In-memory Name Resolution Registry.
#[derive(Default)]
pub struct InMemoryNameRegistry {
    nodes: RwLock<HashMap<Hash, NodeRecord>>,
}

impl InMemoryNameRegistry {
    /// Create an empty registry. Every node starts unowned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes with an owner or resolver.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// True if no node has been written.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    fn update(&self, node: Hash, apply: impl FnOnce(&mut NodeRecord)) {
        let mut nodes = self.nodes.write();
        let record = nodes.entry(node).or_default();
        apply(record);
        if *record == NodeRecord::default() {
            nodes.remove(&node);
        }
    }
}

impl NameRegistry for InMemoryNameRegistry {
    fn owner(&self, node: Hash) -> Address {
        self.nodes.read().get(&node).map(|r| r.owner).unwrap_or_default()
    }

    fn set_owner(&self, node: Hash, owner: Address) -> Result<(), RegistrarError> {
        debug!(%node, %owner, "set owner");
        self.update(node, |r| r.owner = owner);
        Ok(())
    }

    fn resolver(&self, node: Hash) -> Address {
        self.nodes
            .read()
            .get(&node)
            .map(|r| r.resolver)
            .unwrap_or_default()
    }

    fn set_resolver(&self, node: Hash, resolver: Address) -> Result<(), RegistrarError> {
        debug!(%node, %resolver, "set resolver");
        self.update(node, |r| r.resolver = resolver);
        Ok(())
    }
}

/// In-memory public resolvers.
///
/// Only deployed resolver addresses answer; writing to any other address
/// fails like a call into an empty account would.
#[derive(Default)]
pub struct InMemoryResolver {
    deployed: RwLock<HashSet<Address>>,
    records: RwLock<HashMap<(Address, Hash), Address>>,
}

impl InMemoryResolver {
    /// Create with no deployed resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `resolver` answer calls.
    pub fn deploy(&self, resolver: Address) {
        self.deployed.write().insert(resolver);
    }
}

impl AddressResolver for InMemoryResolver {
    fn addr(&self, resolver: Address, node: Hash) -> Address {
        self.records
            .read()
            .get(&(resolver, node))
            .copied()
            .unwrap_or_default()
    }

    fn set_addr(
        &self,
        resolver: Address,
        node: Hash,
        addr: Address,
    ) -> Result<(), RegistrarError> {
        if !self.deployed.read().contains(&resolver) {
            return Err(RegistrarError::NameRegistry(format!(
                "no resolver deployed at {resolver:?}"
            )));
        }
        let mut records = self.records.write();
        if addr.is_zero() {
            records.remove(&(resolver, node));
        } else {
            records.insert((resolver, node), addr);
        }
        Ok(())
    }
}
