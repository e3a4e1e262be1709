//! # Domain Registry
//!
//! Owns the label -> `DomainRecord` table and sells subdomains of listed
//! labels. Authority over a label is resolved on every call from the Name
//! Resolution Registry, the Deed Custodian, or, for label nodes held by this
//! registry, the owner recorded at migration or onboarding. An owner onboards
//! by handing the legacy deed to the registry; the deed's previous holder
//! then administers the label and is recorded at `configure_domain`.

use super::journal::Journal;
use super::settlement::{self, Payees};
use super::RegistrarContext;
use crate::domain::{
    invariant_authorized, invariant_subdomain_unowned, invariant_valid_label, settle, Authority,
    DomainQuery, DomainRecord, DomainStatus, ReferralFee, RegistrarError, RegistrarState,
    RegistrationRequest, SubdomainState,
};
use crate::events::RegistrarEvent;
use crate::ports::inbound::DomainRegistryApi;
use crate::ports::outbound::{EscrowView, LegacyRegistrar, NameRegistry};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{labelhash, subnode, Address, Hash, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Statistics for one Domain Registry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrarStats {
    /// Successful subdomain registrations.
    pub registrations: u64,
    /// Registration calls that failed.
    pub rejected_registrations: u64,
    /// Sum of prices settled.
    pub settled_volume: U256,
    /// Domains migrated out.
    pub migrations: u64,
}

/// Persisted tables of a registry.
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot {
    state: RegistrarState,
    domains: Vec<DomainRecord>,
}

/// The Domain Registry.
pub struct DomainRegistry {
    pub(super) address: Address,
    pub(super) operator: Address,
    pub(super) escrow: Arc<dyn EscrowView>,
    pub(super) ctx: RegistrarContext,
    pub(super) domains: RwLock<HashMap<Hash, DomainRecord>>,
    pub(super) state: RwLock<RegistrarState>,
    pub(super) stats: RwLock<RegistrarStats>,
}

impl DomainRegistry {
    /// Create an Active registry at `address`, stoppable by `operator`.
    pub fn new(
        address: Address,
        operator: Address,
        escrow: Arc<dyn EscrowView>,
        ctx: RegistrarContext,
    ) -> Self {
        Self {
            address,
            operator,
            escrow,
            ctx,
            domains: RwLock::new(HashMap::new()),
            state: RwLock::new(RegistrarState::default()),
            stats: RwLock::new(RegistrarStats::default()),
        }
    }

    /// Address of this registry.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Privileged operator.
    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Current registrar state.
    pub fn state(&self) -> RegistrarState {
        *self.state.read()
    }

    /// Current statistics.
    pub fn stats(&self) -> RegistrarStats {
        self.stats.read().clone()
    }

    /// Stored record for `label`, whatever its status.
    pub fn record(&self, label: &str) -> Option<DomainRecord> {
        self.domains.read().get(&labelhash(label)).cloned()
    }

    /// Node hash of a label under the TLD.
    pub fn label_node(&self, label_hash: Hash) -> Hash {
        subnode(self.ctx.config.tld_node(), label_hash)
    }

    /// Current authority over `label`.
    pub fn authority(&self, label: &str) -> Authority {
        self.authority_of(labelhash(label))
    }

    pub(super) fn authority_of(&self, label_hash: Hash) -> Authority {
        let holder = self.ctx.names.owner(self.label_node(label_hash));
        if !holder.is_zero() && holder == self.escrow.custodian_address() {
            Authority::Escrowed(self.escrow.deed_owner_of(label_hash))
        } else if holder == self.address {
            if self.ctx.legacy.deed_owner(label_hash) == self.address {
                return Authority::Custodial(self.ctx.legacy.previous_owner(label_hash));
            }
            let recorded = self
                .domains
                .read()
                .get(&label_hash)
                .map(|r| r.custodial_owner)
                .unwrap_or_default();
            Authority::Custodial(recorded)
        } else {
            Authority::Direct(holder)
        }
    }

    pub(super) fn check_label(&self, label: &str) -> Result<(), RegistrarError> {
        invariant_valid_label(label, self.ctx.config.max_label_len)
    }

    /// Fail if `label_hash` was migrated away.
    pub(super) fn check_not_migrated(&self, label_hash: Hash) -> Result<(), RegistrarError> {
        match self.domains.read().get(&label_hash) {
            Some(record) => record.ensure_not_migrated(),
            None => Ok(()),
        }
    }

    /// Fail unless the label node is held by this registry or the custodian,
    /// the only holders under which subdomains can be issued.
    pub(super) fn check_node_held(
        &self,
        label: &str,
        label_hash: Hash,
    ) -> Result<(), RegistrarError> {
        let holder = self.ctx.names.owner(self.label_node(label_hash));
        let custodian = self.escrow.custodian_address();
        if holder == self.address || (!holder.is_zero() && holder == custodian) {
            return Ok(());
        }
        Err(RegistrarError::NodeNotHeld {
            label: label.to_string(),
            holder: self.address,
        })
    }

    /// Fail unless `caller` currently administers `label`.
    pub(super) fn check_authority(
        &self,
        caller: Address,
        label: &str,
        label_hash: Hash,
    ) -> Result<Authority, RegistrarError> {
        let authority = self.authority_of(label_hash);
        invariant_authorized(&authority, caller, label)?;
        Ok(authority)
    }

    /// Checks shared by every authority-only administration call.
    fn check_admin(&self, caller: Address, label: &str) -> Result<Hash, RegistrarError> {
        self.check_label(label)?;
        let label_hash = labelhash(label);
        self.check_not_migrated(label_hash)?;
        self.state.read().active()?;
        self.check_authority(caller, label, label_hash)?;
        Ok(label_hash)
    }

    /// Answer a query. Unknown, unlisted and migrated labels report an empty
    /// label; an empty subdomain is always `Available`.
    pub fn query(&self, label: &str, subdomain: &str) -> DomainQuery {
        let _guard = self.ctx.lock.acquire();
        let label_hash = labelhash(label);

        let registration_state = if subdomain.is_empty() {
            SubdomainState::Available
        } else {
            let node = subnode(self.label_node(label_hash), labelhash(subdomain));
            SubdomainState::from_owner(self.ctx.names.owner(node))
        };

        debug!(label, subdomain, ?registration_state, "Query");
        match self.domains.read().get(&label_hash) {
            Some(record) if record.is_listed() => DomainQuery {
                label: record.label.clone(),
                price: record.price,
                registration_state,
                referral_fee_ppm: record.referral_fee.ppm(),
            },
            _ => DomainQuery::unlisted(registration_state),
        }
    }

    fn register_inner(
        &self,
        caller: Address,
        request: &RegistrationRequest,
    ) -> Result<U256, RegistrarError> {
        let label_hash = labelhash(&request.label);
        let record = self
            .domains
            .read()
            .get(&label_hash)
            .cloned()
            .ok_or_else(|| RegistrarError::DomainUnlisted(request.label.clone()))?;
        record.ensure_listed()?;
        self.state.read().active()?;
        self.check_label(&request.subdomain)?;

        self.check_node_held(&request.label, label_hash)?;

        let node = subnode(self.label_node(label_hash), labelhash(&request.subdomain));
        invariant_subdomain_unowned(
            self.ctx.names.owner(node),
            &request.label,
            &request.subdomain,
        )?;

        let owner = self.authority_of(label_hash).address();
        let settlement = settle(
            record.price,
            record.referral_fee,
            request.payment,
            request.referrer,
        )?;

        let mut journal = Journal::new(&self.ctx);
        settlement::execute(
            &mut journal,
            caller,
            request.payment,
            &settlement,
            &Payees {
                registry: self.address,
                owner,
                referrer: request.referrer,
            },
        )?;

        journal.set_resolver(node, request.resolver)?;
        if !request.resolver.is_zero() {
            journal.set_addr(request.resolver, node, request.new_owner)?;
        }
        journal.set_owner(node, request.new_owner)?;

        journal.emit(
            self.address,
            RegistrarEvent::NewRegistration {
                label: label_hash,
                subdomain: request.subdomain.clone(),
                owner: request.new_owner,
                price: record.price,
                referrer: request.referrer,
            },
        );
        journal.commit()?;
        Ok(record.price)
    }

    /// Export the record table and registrar state.
    pub fn snapshot(&self) -> Result<Vec<u8>, RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let mut domains: Vec<DomainRecord> = self.domains.read().values().cloned().collect();
        domains.sort_by(|a, b| a.label.cmp(&b.label));
        let snapshot = RegistrySnapshot {
            state: *self.state.read(),
            domains,
        };
        bincode::serialize(&snapshot).map_err(|e| RegistrarError::Snapshot(e.to_string()))
    }

    /// Replace the record table and registrar state with a snapshot.
    pub fn restore_snapshot(&self, bytes: &[u8]) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let snapshot: RegistrySnapshot =
            bincode::deserialize(bytes).map_err(|e| RegistrarError::Snapshot(e.to_string()))?;
        let count = snapshot.domains.len();
        *self.domains.write() = snapshot
            .domains
            .into_iter()
            .map(|r| (r.label_hash, r))
            .collect();
        *self.state.write() = snapshot.state;
        info!(domains = count, "Restored registry snapshot");
        Ok(())
    }
}

impl DomainRegistryApi for DomainRegistry {
    #[instrument(skip(self))]
    fn configure_domain(
        &self,
        caller: Address,
        label: &str,
        price: U256,
        referral_fee_ppm: u32,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let label_hash = self.check_admin(caller, label).inspect_err(|e| {
            warn!(error = %e, "Configuration rejected");
        })?;
        let referral_fee = ReferralFee::new(referral_fee_ppm)?;
        let custodial_owner = match self.authority_of(label_hash) {
            Authority::Custodial(owner) => owner,
            _ => Address::ZERO,
        };

        let mut journal = Journal::new(&self.ctx);
        journal.emit(
            self.address,
            RegistrarEvent::DomainConfigured {
                label: label_hash,
                price,
                referral_fee,
            },
        );
        journal.commit()?;

        let mut domains = self.domains.write();
        let record = domains
            .entry(label_hash)
            .and_modify(|r| r.relist(price, referral_fee))
            .or_insert_with(|| DomainRecord::new(label, price, referral_fee));
        if !custodial_owner.is_zero() {
            record.custodial_owner = custodial_owner;
        }
        drop(domains);

        info!(%price, %referral_fee, "Domain configured");
        Ok(())
    }

    fn query(&self, label: &str, subdomain: &str) -> DomainQuery {
        DomainRegistry::query(self, label, subdomain)
    }

    #[instrument(skip(self))]
    fn unlist_domain(&self, caller: Address, label: &str) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let label_hash = self.check_admin(caller, label).inspect_err(|e| {
            warn!(error = %e, "Unlist rejected");
        })?;

        if !self.domains.read().contains_key(&label_hash) {
            return Err(RegistrarError::DomainUnlisted(label.to_string()));
        }

        let mut journal = Journal::new(&self.ctx);
        journal.emit(
            self.address,
            RegistrarEvent::DomainUnlisted { label: label_hash },
        );
        journal.commit()?;

        if let Some(record) = self.domains.write().get_mut(&label_hash) {
            record.status = DomainStatus::Unlisted;
        }

        info!("Domain unlisted");
        Ok(())
    }

    #[instrument(skip(self, request), fields(label = %request.label, subdomain = %request.subdomain))]
    fn register(
        &self,
        caller: Address,
        request: RegistrationRequest,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        match self.register_inner(caller, &request) {
            Ok(price) => {
                let mut stats = self.stats.write();
                stats.registrations += 1;
                stats.settled_volume = stats.settled_volume.saturating_add(price);
                info!(owner = %request.new_owner, %price, "Subdomain registered");
                Ok(())
            }
            Err(e) => {
                self.stats.write().rejected_registrations += 1;
                warn!(error = %e, "Registration rejected");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    fn set_transfer_address(
        &self,
        caller: Address,
        label: &str,
        target: Address,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let label_hash = self.check_admin(caller, label)?;

        if !self.domains.read().contains_key(&label_hash) {
            return Err(RegistrarError::DomainUnlisted(label.to_string()));
        }

        let mut journal = Journal::new(&self.ctx);
        journal.emit(
            self.address,
            RegistrarEvent::TransferAddressSet {
                label: label_hash,
                addr: target,
            },
        );
        journal.commit()?;

        if let Some(record) = self.domains.write().get_mut(&label_hash) {
            record.transfer_address = target;
        }

        info!("Transfer address set");
        Ok(())
    }

    #[instrument(skip(self))]
    fn upgrade(&self, caller: Address, label: &str) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        self.check_label(label)?;
        let label_hash = labelhash(label);
        self.check_not_migrated(label_hash)?;
        self.check_authority(caller, label, label_hash)?;

        let transfer_address = self
            .domains
            .read()
            .get(&label_hash)
            .map(|r| r.transfer_address)
            .ok_or_else(|| RegistrarError::DomainUnlisted(label.to_string()))?;

        if self.ctx.names.owner(self.ctx.config.tld_node()) == self.ctx.legacy.address() {
            return Err(RegistrarError::ParentUnchanged);
        }
        if transfer_address.is_zero() {
            return Err(RegistrarError::NoTransferAddress(label.to_string()));
        }

        let mut journal = Journal::new(&self.ctx);
        journal.set_owner(self.label_node(label_hash), transfer_address)?;
        journal.emit(
            self.address,
            RegistrarEvent::DomainUpgraded {
                label: label_hash,
                name: label.to_string(),
            },
        );
        journal.commit()?;
        self.domains.write().remove(&label_hash);

        info!(to = %transfer_address, "Domain upgraded");
        Ok(())
    }
}
