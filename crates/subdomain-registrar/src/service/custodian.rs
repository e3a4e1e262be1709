//! # Deed Custodian
//!
//! Holds legacy deeds in escrow and tracks their beneficial owners apart
//! from the raw owner of the label node.
//!
//! The one-time assignment of a label node is kept in a ledger that outlives
//! the escrow entry, so a claimed and re-deposited deed stays assigned.

use super::journal::Journal;
use super::RegistrarContext;
use crate::domain::{invariant_valid_label, AssignmentState, DeedEscrow, RegistrarError};
use crate::events::RegistrarEvent;
use crate::ports::inbound::DeedCustodianApi;
use crate::ports::outbound::{EscrowView, LegacyRegistrar, NameRegistry};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{labelhash, subnode, Address, Hash};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Persisted tables of a custodian.
#[derive(Serialize, Deserialize)]
struct CustodianSnapshot {
    escrows: Vec<DeedEscrow>,
    assigned: Vec<(Hash, Address)>,
}

/// The Deed Custodian.
pub struct DeedCustodian {
    address: Address,
    ctx: RegistrarContext,
    escrows: RwLock<HashMap<Hash, DeedEscrow>>,
    /// Label hash -> assignment target. Never shrinks.
    assignments: RwLock<HashMap<Hash, Address>>,
}

impl DeedCustodian {
    /// Create a custodian acting as `address`.
    pub fn new(address: Address, ctx: RegistrarContext) -> Self {
        Self {
            address,
            ctx,
            escrows: RwLock::new(HashMap::new()),
            assignments: RwLock::new(HashMap::new()),
        }
    }

    /// Target `label` was assigned to, if its one assignment was used.
    pub fn assigned_target(&self, label: &str) -> Option<Address> {
        self.assignments.read().get(&labelhash(label)).copied()
    }

    /// Address of this custodian.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Number of deeds in custody.
    pub fn len(&self) -> usize {
        self.escrows.read().len()
    }

    /// True if no deed is in custody.
    pub fn is_empty(&self) -> bool {
        self.escrows.read().is_empty()
    }

    /// Look up an escrow entry the caller owns.
    fn owned_escrow(&self, caller: Address, label: &str) -> Result<DeedEscrow, RegistrarError> {
        invariant_valid_label(label, self.ctx.config.max_label_len)?;
        let escrow = self
            .escrows
            .read()
            .get(&labelhash(label))
            .cloned()
            .ok_or_else(|| RegistrarError::NotEscrowed(label.to_string()))?;
        if escrow.deed_owner != caller {
            warn!(%caller, label, "Caller does not own escrowed deed");
            return Err(RegistrarError::unauthorized(caller, label));
        }
        Ok(escrow)
    }

    /// Export the escrow table and the assignment ledger.
    pub fn snapshot(&self) -> Result<Vec<u8>, RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let mut escrows: Vec<DeedEscrow> = self.escrows.read().values().cloned().collect();
        escrows.sort_by_key(|e| e.label_hash);
        let mut assigned: Vec<(Hash, Address)> = self
            .assignments
            .read()
            .iter()
            .map(|(label_hash, target)| (*label_hash, *target))
            .collect();
        assigned.sort_by_key(|(label_hash, _)| *label_hash);
        let snapshot = CustodianSnapshot { escrows, assigned };
        bincode::serialize(&snapshot).map_err(|e| RegistrarError::Snapshot(e.to_string()))
    }

    /// Replace the escrow table and the assignment ledger with a snapshot.
    pub fn restore_snapshot(&self, bytes: &[u8]) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let snapshot: CustodianSnapshot =
            bincode::deserialize(bytes).map_err(|e| RegistrarError::Snapshot(e.to_string()))?;
        *self.escrows.write() = snapshot
            .escrows
            .into_iter()
            .map(|e| (e.label_hash, e))
            .collect();
        *self.assignments.write() = snapshot.assigned.into_iter().collect();
        Ok(())
    }
}

impl EscrowView for DeedCustodian {
    fn custodian_address(&self) -> Address {
        self.address
    }

    fn deed_owner_of(&self, label_hash: Hash) -> Address {
        self.escrows
            .read()
            .get(&label_hash)
            .map(|e| e.deed_owner)
            .unwrap_or_default()
    }
}

impl DeedCustodianApi for DeedCustodian {
    #[instrument(skip(self))]
    fn deposit(&self, caller: Address, label: &str) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        invariant_valid_label(label, self.ctx.config.max_label_len)?;
        let label_hash = labelhash(label);
        let holder = self.ctx.legacy.deed_owner(label_hash);
        if caller.is_zero() || holder != caller {
            return Err(RegistrarError::unauthorized(caller, label));
        }

        let mut escrow = DeedEscrow::new(label_hash, caller);
        if let Some(target) = self.assignments.read().get(&label_hash) {
            escrow.assignment = AssignmentState::Assigned { target: *target };
        }

        let mut journal = Journal::new(&self.ctx);
        journal.transfer_deed(label_hash, self.address)?;
        journal.emit(
            self.address,
            RegistrarEvent::DeedEscrowed {
                label: label_hash,
                owner: caller,
            },
        );
        journal.commit()?;
        self.escrows.write().insert(label_hash, escrow);

        info!("Deed escrowed");
        Ok(())
    }

    fn deed_owner(&self, label: &str) -> Address {
        self.deed_owner_of(labelhash(label))
    }

    fn escrow(&self, label: &str) -> Option<DeedEscrow> {
        self.escrows.read().get(&labelhash(label)).cloned()
    }

    #[instrument(skip(self))]
    fn transfer_deed(
        &self,
        caller: Address,
        label: &str,
        new_owner: Address,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let escrow = self.owned_escrow(caller, label)?;

        let mut journal = Journal::new(&self.ctx);
        journal.emit(
            self.address,
            RegistrarEvent::DeedTransferred {
                label: escrow.label_hash,
                owner: new_owner,
            },
        );
        journal.commit()?;
        if let Some(entry) = self.escrows.write().get_mut(&escrow.label_hash) {
            entry.deed_owner = new_owner;
        }

        info!("Deed ownership transferred");
        Ok(())
    }

    #[instrument(skip(self))]
    fn assign(&self, caller: Address, label: &str, target: Address) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let label_hash = labelhash(label);
        let mut escrow = self
            .escrow(label)
            .ok_or_else(|| RegistrarError::NotEscrowed(label.to_string()))?;
        if escrow.assignment.is_assigned() || self.assignments.read().contains_key(&label_hash) {
            return Err(RegistrarError::AlreadyAssigned(label.to_string()));
        }
        self.owned_escrow(caller, label)?;
        let node = subnode(self.ctx.config.tld_node(), label_hash);
        if self.ctx.names.owner(node) != self.address {
            warn!(label, "Label node no longer held in custody");
            return Err(RegistrarError::NodeNotHeld {
                label: label.to_string(),
                holder: self.address,
            });
        }
        escrow.assign(target, label)?;

        let mut journal = Journal::new(&self.ctx);
        journal.set_owner(node, target)?;
        journal.emit(
            self.address,
            RegistrarEvent::DeedAssigned {
                label: label_hash,
                target,
            },
        );
        journal.commit()?;
        self.escrows.write().insert(label_hash, escrow);
        self.assignments.write().insert(label_hash, target);

        info!("Label node assigned");
        Ok(())
    }

    #[instrument(skip(self))]
    fn claim(&self, caller: Address, label: &str) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let escrow = self.owned_escrow(caller, label)?;
        if self.ctx.names.owner(self.ctx.config.tld_node()) == self.ctx.legacy.address() {
            return Err(RegistrarError::ParentUnchanged);
        }

        let mut journal = Journal::new(&self.ctx);
        journal.transfer_deed(escrow.label_hash, caller)?;
        journal.emit(
            self.address,
            RegistrarEvent::DeedClaimed {
                label: escrow.label_hash,
                owner: caller,
            },
        );
        journal.commit()?;
        self.escrows.write().remove(&escrow.label_hash);

        info!("Deed claimed");
        Ok(())
    }
}
