//! # Migration Controller
//!
//! One-way stop switch and the per-domain hand-off to a successor registry.
//!
//! A migration is two-phase. The successor validates the incoming domain
//! before any effect, the label node is then reassigned through the journal,
//! and the successor's `receive_migrated_domain` installs the record and
//! hands back its events for this call to publish. If publishing fails the
//! journal returns the node and the successor discards the record, so any
//! failure leaves both registries and the Name Resolution Registry as they
//! were.

use super::journal::Journal;
use super::registry::DomainRegistry;
use crate::domain::{
    DomainQuery, DomainRecord, DomainStatus, MigratedDomain, RegistrarError, RegistrarVersion,
    SuccessorRef,
};
use crate::events::{EmittedEvent, RegistrarEvent};
use crate::ports::inbound::MigrationApi;
use crate::ports::outbound::{NameRegistry, SuccessorDirectory, SuccessorRegistry};
use shared_types::{labelhash, Address, Hash};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

impl DomainRegistry {
    fn check_operator(&self, caller: Address) -> Result<(), RegistrarError> {
        if caller != self.operator {
            return Err(RegistrarError::unauthorized(caller, "registrar"));
        }
        Ok(())
    }

    fn resolve_successor(
        &self,
        target: SuccessorRef,
    ) -> Result<Arc<dyn SuccessorRegistry>, RegistrarError> {
        self.ctx
            .successors
            .resolve(target.address)
            .ok_or_else(|| RegistrarError::SuccessorUnavailable {
                address: target.address,
                reason: "no registry at address".to_string(),
            })
    }

    /// Checks a successor applies to an incoming domain.
    fn check_incoming(&self, domain: &MigratedDomain) -> Result<Hash, RegistrarError> {
        self.state.read().active()?;
        self.check_label(&domain.label)?;
        let label_hash = labelhash(&domain.label);
        self.check_not_migrated(label_hash)?;
        Ok(label_hash)
    }
}

impl MigrationApi for DomainRegistry {
    #[instrument(skip(self))]
    fn stop(&self, caller: Address) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        self.check_operator(caller)?;
        self.state.read().active()?;

        let mut journal = Journal::new(&self.ctx);
        journal.emit(self.address, RegistrarEvent::RegistrarStopped);
        journal.commit()?;
        self.state.write().stop()?;

        info!("Registrar stopped");
        Ok(())
    }

    #[instrument(skip(self))]
    fn set_migration_address(
        &self,
        caller: Address,
        successor: Address,
        version: RegistrarVersion,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        self.check_operator(caller)?;
        if successor.is_zero() || successor == self.address {
            return Err(RegistrarError::SuccessorUnavailable {
                address: successor,
                reason: "registry cannot succeed itself".to_string(),
            });
        }

        self.state.read().stopped()?;

        let mut journal = Journal::new(&self.ctx);
        journal.emit(
            self.address,
            RegistrarEvent::MigrationAddressSet { successor, version },
        );
        journal.commit()?;
        self.state
            .write()
            .stopped_mut()?
            .set_migration_target(SuccessorRef::new(successor, version));

        info!("Migration address set");
        Ok(())
    }

    #[instrument(skip(self))]
    fn migrate(&self, caller: Address, label: &str) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let target = self.state.read().stopped()?.migration_target()?;
        self.check_label(label)?;
        let label_hash = labelhash(label);
        let authority = self
            .check_authority(caller, label, label_hash)
            .inspect_err(|e| warn!(error = %e, "Migration rejected"))?;

        let record = self
            .domains
            .read()
            .get(&label_hash)
            .cloned()
            .ok_or_else(|| RegistrarError::DomainUnlisted(label.to_string()))?;
        record.ensure_not_migrated()?;

        let successor = self.resolve_successor(target)?;
        let domain = MigratedDomain {
            label: record.label.clone(),
            price: record.price,
            referral_fee: record.referral_fee,
            owner: authority.address(),
            listed: record.is_listed(),
        };

        successor.prepare_migrated_domain(self.address, &domain)?;
        debug!(successor = %target.address, "Successor accepted hand-off");

        let mut journal = Journal::new(&self.ctx);
        journal.set_owner(self.label_node(label_hash), successor.address())?;
        let received = successor.receive_migrated_domain(self.address, &domain)?;
        for emitted in received {
            journal.emit(emitted.emitter, emitted.event);
        }
        journal.emit(
            self.address,
            RegistrarEvent::DomainMigrated {
                label: label_hash,
                successor: target.address,
            },
        );
        if let Err(e) = journal.commit() {
            if let Err(discard) = successor.discard_migrated_domain(self.address, &domain) {
                error!(error = %discard, "Successor kept a record it could not discard");
            }
            warn!(error = %e, "Migration rolled back");
            return Err(e);
        }

        if let Some(record) = self.domains.write().get_mut(&label_hash) {
            record.status = DomainStatus::Migrated {
                successor: target.address,
            };
        }
        self.stats.write().migrations += 1;

        info!(successor = %target.address, "Domain migrated");
        Ok(())
    }

    fn successor_query(
        &self,
        label: &str,
        subdomain: &str,
    ) -> Result<DomainQuery, RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let target = self.state.read().stopped()?.migration_target()?;
        let successor = self.resolve_successor(target)?;
        let (first, second) = target.version.order_args(label, subdomain);
        Ok(successor.query(first, second))
    }
}

impl SuccessorRegistry for DomainRegistry {
    fn address(&self) -> Address {
        self.address
    }

    fn prepare_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        self.check_incoming(domain)?;
        debug!(%from, label = %domain.label, "Prepared incoming domain");
        Ok(())
    }

    #[instrument(skip(self, domain), fields(label = %domain.label))]
    fn receive_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<Vec<EmittedEvent>, RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let label_hash = self.check_incoming(domain)?;
        if self.ctx.names.owner(self.label_node(label_hash)) != self.address {
            return Err(RegistrarError::unauthorized(from, domain.label.clone()));
        }

        let mut record = DomainRecord::new(&domain.label, domain.price, domain.referral_fee);
        record.custodial_owner = domain.owner;
        if !domain.listed {
            record.status = DomainStatus::Unlisted;
        }
        self.domains.write().insert(label_hash, record);

        let mut events = Vec::new();
        if domain.listed {
            events.push(EmittedEvent {
                emitter: self.address,
                event: RegistrarEvent::DomainConfigured {
                    label: label_hash,
                    price: domain.price,
                    referral_fee: domain.referral_fee,
                },
            });
        }

        info!(%from, owner = %domain.owner, "Received migrated domain");
        Ok(events)
    }

    #[instrument(skip(self, domain), fields(label = %domain.label))]
    fn discard_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<(), RegistrarError> {
        let _guard = self.ctx.lock.acquire();
        let label_hash = labelhash(&domain.label);
        if self.ctx.names.owner(self.label_node(label_hash)) == self.address {
            return Err(RegistrarError::unauthorized(from, domain.label.clone()));
        }

        let mut domains = self.domains.write();
        match domains.get(&label_hash) {
            Some(record) if record.custodial_owner == domain.owner => {
                domains.remove(&label_hash);
                info!(%from, "Discarded migrated domain");
                Ok(())
            }
            _ => Err(RegistrarError::unauthorized(from, domain.label.clone())),
        }
    }

    fn query(&self, first: &str, second: &str) -> DomainQuery {
        DomainRegistry::query(self, first, second)
    }
}
