//! Legacy Parent Registrar Adapter
//!
//! Deed-issuing registrar for the TLD. While it still owns the TLD node it
//! keeps each label node's owner in step with the deed holder.

use crate::domain::RegistrarError;
use crate::ports::outbound::{LegacyRegistrar, NameRegistry};
use parking_lot::RwLock;
use shared_types::{labelhash, subnode, Address, Hash};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
struct Deed {
    owner: Address,
    previous_owner: Address,
}

/// In-memory legacy registrar.
pub struct InMemoryLegacyRegistrar {
    address: Address,
    tld_node: Hash,
    names: Arc<dyn NameRegistry>,
    deeds: RwLock<HashMap<Hash, Deed>>,
}

impl InMemoryLegacyRegistrar {
    /// Create a registrar acting as `address` for the TLD at `tld_node`.
    pub fn new(address: Address, tld_node: Hash, names: Arc<dyn NameRegistry>) -> Self {
        Self {
            address,
            tld_node,
            names,
            deeds: RwLock::new(HashMap::new()),
        }
    }

    /// Issue (or reissue) the deed for `label` to `owner`.
    pub fn issue(&self, label: &str, owner: Address) -> Result<(), RegistrarError> {
        let label_hash = labelhash(label);
        self.deeds.write().insert(
            label_hash,
            Deed {
                owner,
                previous_owner: Address::ZERO,
            },
        );
        self.sync_node(label_hash, owner)
    }

    /// True while the legacy registrar still owns the TLD node.
    pub fn holds_tld(&self) -> bool {
        self.names.owner(self.tld_node) == self.address
    }

    fn sync_node(&self, label_hash: Hash, owner: Address) -> Result<(), RegistrarError> {
        if self.holds_tld() {
            self.names
                .set_owner(subnode(self.tld_node, label_hash), owner)?;
        }
        Ok(())
    }
}

impl LegacyRegistrar for InMemoryLegacyRegistrar {
    fn address(&self) -> Address {
        self.address
    }

    fn deed_owner(&self, label_hash: Hash) -> Address {
        self.deeds
            .read()
            .get(&label_hash)
            .map(|d| d.owner)
            .unwrap_or_default()
    }

    fn previous_owner(&self, label_hash: Hash) -> Address {
        self.deeds
            .read()
            .get(&label_hash)
            .map(|d| d.previous_owner)
            .unwrap_or_default()
    }

    fn transfer_deed(&self, label_hash: Hash, to: Address) -> Result<(), RegistrarError> {
        {
            let mut deeds = self.deeds.write();
            let deed = deeds.get_mut(&label_hash).ok_or_else(|| {
                RegistrarError::LegacyRegistrar(format!("no deed issued for {label_hash}"))
            })?;
            deed.previous_owner = deed.owner;
            deed.owner = to;
        }
        debug!(label = %label_hash, %to, "deed transferred");
        self.sync_node(label_hash, to)
    }

    fn restore_deed(
        &self,
        label_hash: Hash,
        owner: Address,
        previous_owner: Address,
    ) -> Result<(), RegistrarError> {
        let mut deeds = self.deeds.write();
        let deed = deeds.get_mut(&label_hash).ok_or_else(|| {
            RegistrarError::LegacyRegistrar(format!("no deed issued for {label_hash}"))
        })?;
        *deed = Deed {
            owner,
            previous_owner,
        };
        Ok(())
    }
}
