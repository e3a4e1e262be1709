//! # Registrar Events
//!
//! Notifications for external observers. Events raised during a call are
//! buffered and only published once the call commits.

use crate::domain::{RegistrarVersion, ReferralFee};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, U256};

/// Events emitted by the Domain Registry, Migration Controller and Deed
/// Custodian.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RegistrarEvent {
    /// A domain was listed or relisted.
    DomainConfigured {
        /// Label hash
        label: Hash,
        /// Price per subdomain
        price: U256,
        /// Referral share
        referral_fee: ReferralFee,
    },
    /// A domain was withdrawn from registration.
    DomainUnlisted {
        /// Label hash
        label: Hash,
    },
    /// A subdomain was sold.
    NewRegistration {
        /// Parent label hash
        label: Hash,
        /// Subdomain registered
        subdomain: String,
        /// New owner
        owner: Address,
        /// Price paid
        price: U256,
        /// Referrer, zero for none
        referrer: Address,
    },
    /// A domain was handed to a successor registry.
    DomainMigrated {
        /// Label hash
        label: Hash,
        /// Successor registry
        successor: Address,
    },
    /// Hand-off target recorded for `upgrade`.
    TransferAddressSet {
        /// Label hash
        label: Hash,
        /// Hand-off target
        addr: Address,
    },
    /// A domain's node was handed to its transfer address.
    DomainUpgraded {
        /// Label hash
        label: Hash,
        /// Label
        name: String,
    },
    /// The registrar stopped accepting registrations.
    RegistrarStopped,
    /// Migration target configured.
    MigrationAddressSet {
        /// Successor registry
        successor: Address,
        /// Argument order of the successor
        version: RegistrarVersion,
    },
    /// A legacy deed entered custody.
    DeedEscrowed {
        /// Label hash
        label: Hash,
        /// Beneficial owner
        owner: Address,
    },
    /// Beneficial ownership of an escrowed deed changed.
    DeedTransferred {
        /// Label hash
        label: Hash,
        /// New beneficial owner
        owner: Address,
    },
    /// The label node was assigned once, directly.
    DeedAssigned {
        /// Label hash
        label: Hash,
        /// New node owner
        target: Address,
    },
    /// A deed left custody.
    DeedClaimed {
        /// Label hash
        label: Hash,
        /// Deed recipient
        owner: Address,
    },
}

impl RegistrarEvent {
    /// Event name as observed externally.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DomainConfigured { .. } => "DomainConfigured",
            Self::DomainUnlisted { .. } => "DomainUnlisted",
            Self::NewRegistration { .. } => "NewRegistration",
            Self::DomainMigrated { .. } => "DomainMigrated",
            Self::TransferAddressSet { .. } => "TransferAddressSet",
            Self::DomainUpgraded { .. } => "DomainUpgraded",
            Self::RegistrarStopped => "RegistrarStopped",
            Self::MigrationAddressSet { .. } => "MigrationAddressSet",
            Self::DeedEscrowed { .. } => "DeedEscrowed",
            Self::DeedTransferred { .. } => "DeedTransferred",
            Self::DeedAssigned { .. } => "DeedAssigned",
            Self::DeedClaimed { .. } => "DeedClaimed",
        }
    }
}

/// An event together with the component that emitted it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Address of the emitting registry or custodian.
    pub emitter: Address,
    /// Payload.
    pub event: RegistrarEvent,
}
