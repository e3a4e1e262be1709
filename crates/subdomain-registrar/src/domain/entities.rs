//! # Domain Entities
//!
//! Persisted records and call payloads of the registrar.

use super::errors::RegistrarError;
use super::value_objects::{AssignmentState, DomainStatus, ReferralFee, SubdomainState};
use serde::{Deserialize, Serialize};
use shared_types::{labelhash, Address, Hash, U256};

/// One listed top-level label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Human-readable label (unique key).
    pub label: String,
    /// Keccak-256 of `label`.
    pub label_hash: Hash,
    /// Charged per subdomain registration.
    pub price: U256,
    /// Referrer share of `price`.
    pub referral_fee: ReferralFee,
    /// Listing lifecycle.
    pub status: DomainStatus,
    /// Owner recorded when the label node is held by this registry itself.
    /// Zero for domains administered directly or through the custodian.
    pub custodial_owner: Address,
    /// Hand-off target used by `upgrade`.
    pub transfer_address: Address,
}

impl DomainRecord {
    /// Create a listed record.
    pub fn new(label: &str, price: U256, referral_fee: ReferralFee) -> Self {
        Self {
            label: label.to_string(),
            label_hash: labelhash(label),
            price,
            referral_fee,
            status: DomainStatus::Listed,
            custodial_owner: Address::ZERO,
            transfer_address: Address::ZERO,
        }
    }

    /// Check if subdomains can be registered.
    pub fn is_listed(&self) -> bool {
        self.status == DomainStatus::Listed
    }

    /// Fail unless the record is still served by this registry.
    pub fn ensure_not_migrated(&self) -> Result<(), RegistrarError> {
        match self.status {
            DomainStatus::Migrated { successor } => Err(RegistrarError::DomainMigrated {
                label: self.label.clone(),
                successor,
            }),
            _ => Ok(()),
        }
    }

    /// Fail unless the record is open for registration.
    pub fn ensure_listed(&self) -> Result<(), RegistrarError> {
        self.ensure_not_migrated()?;
        if !self.is_listed() {
            return Err(RegistrarError::DomainUnlisted(self.label.clone()));
        }
        Ok(())
    }

    /// Overwrite price and fee and relist.
    pub fn relist(&mut self, price: U256, referral_fee: ReferralFee) {
        self.price = price;
        self.referral_fee = referral_fee;
        self.status = DomainStatus::Listed;
    }
}

/// Result of `query(label, subdomain)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuery {
    /// Label, empty for unlisted or unknown domains.
    pub label: String,
    /// Listed price.
    pub price: U256,
    /// Ownership state of the queried subdomain.
    pub registration_state: SubdomainState,
    /// Referral fee in parts-per-million.
    pub referral_fee_ppm: u32,
}

impl DomainQuery {
    /// Answer for an unlisted or unknown domain.
    pub fn unlisted(registration_state: SubdomainState) -> Self {
        Self {
            registration_state,
            ..Self::default()
        }
    }

    /// True if the domain is open for registration.
    pub fn is_listed(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Escrow entry for a legacy deed held by the Deed Custodian.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeedEscrow {
    /// Keccak-256 of the label.
    pub label_hash: Hash,
    /// Beneficial owner; may transfer, assign and claim.
    pub deed_owner: Address,
    /// One-time direct reassignment flag.
    pub assignment: AssignmentState,
}

impl DeedEscrow {
    /// Create an unassigned escrow entry.
    pub fn new(label_hash: Hash, deed_owner: Address) -> Self {
        Self {
            label_hash,
            deed_owner,
            assignment: AssignmentState::Unassigned,
        }
    }

    /// Apply the one-time assignment.
    pub fn assign(&mut self, target: Address, label: &str) -> Result<(), RegistrarError> {
        let next = AssignmentState::Assigned { target };
        if !self.assignment.can_transition_to(next) {
            return Err(RegistrarError::AlreadyAssigned(label.to_string()));
        }
        self.assignment = next;
        Ok(())
    }
}

/// Payload handed to a successor registry during migration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedDomain {
    /// Label being migrated.
    pub label: String,
    /// Price at migration time.
    pub price: U256,
    /// Referral fee at migration time.
    pub referral_fee: ReferralFee,
    /// Authority at migration time; becomes the successor's custodial owner.
    pub owner: Address,
    /// Whether the domain was listed when migrated.
    pub listed: bool,
}

/// Parameters for a subdomain registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Parent label.
    pub label: String,
    /// Subdomain to register under `label`.
    pub subdomain: String,
    /// Owner of the new subdomain.
    pub new_owner: Address,
    /// Receives the referral share; zero for none.
    pub referrer: Address,
    /// Resolver for the new subdomain; zero for none.
    pub resolver: Address,
    /// Value attached by the caller.
    pub payment: U256,
}

impl RegistrationRequest {
    /// Create a request without referrer or resolver.
    pub fn new(label: &str, subdomain: &str, new_owner: Address, payment: U256) -> Self {
        Self {
            label: label.to_string(),
            subdomain: subdomain.to_string(),
            new_owner,
            referrer: Address::ZERO,
            resolver: Address::ZERO,
            payment,
        }
    }

    /// Set referrer.
    pub fn referrer(mut self, referrer: Address) -> Self {
        self.referrer = referrer;
        self
    }

    /// Set resolver.
    pub fn resolver(mut self, resolver: Address) -> Self {
        self.resolver = resolver;
        self
    }
}
