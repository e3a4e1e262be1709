//! # Domain Value Objects
//!
//! Immutable value types and the explicit state machines of the registrar.

use super::errors::RegistrarError;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::fmt;

/// Denominator of the referral fee: one million parts.
pub const PPM_DENOMINATOR: u32 = 1_000_000;

/// Referral fee in parts-per-million of the price, always `<= 1_000_000`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ReferralFee(u32);

impl ReferralFee {
    /// No referral share.
    pub const ZERO: Self = Self(0);

    /// Validates and wraps a parts-per-million value.
    pub fn new(ppm: u32) -> Result<Self, RegistrarError> {
        if ppm > PPM_DENOMINATOR {
            return Err(RegistrarError::InvalidFee(ppm));
        }
        Ok(Self(ppm))
    }

    /// Raw parts-per-million.
    #[must_use]
    pub const fn ppm(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ReferralFee {
    type Error = RegistrarError;

    fn try_from(ppm: u32) -> Result<Self, Self::Error> {
        Self::new(ppm)
    }
}

impl From<ReferralFee> for u32 {
    fn from(fee: ReferralFee) -> Self {
        fee.0
    }
}

impl fmt::Display for ReferralFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ppm", self.0)
    }
}

/// Whether a subdomain node currently has an owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SubdomainState {
    /// No owner recorded; can be registered.
    #[default]
    Available = 0,
    /// Owned in the Name Resolution Registry.
    Taken = 1,
}

impl SubdomainState {
    /// Derive the state from the recorded owner.
    #[must_use]
    pub fn from_owner(owner: Address) -> Self {
        if owner.is_zero() {
            Self::Available
        } else {
            Self::Taken
        }
    }
}

/// Lifecycle of a `DomainRecord`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStatus {
    /// Open for subdomain registration.
    Listed,
    /// Withdrawn by its authority; price and fee are kept for relisting.
    Unlisted,
    /// Handed to a successor registry. Terminal.
    Migrated {
        /// Registry now serving the label.
        successor: Address,
    },
}

impl DomainStatus {
    /// Check if terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Migrated { .. })
    }
}

/// Who currently administers a label, and through which source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authority {
    /// The Name Resolution Registry owner of the label node.
    Direct(Address),
    /// The beneficial owner of a deed held by the Deed Custodian.
    Escrowed(Address),
    /// Owner of a label node held by the registry itself: recorded at
    /// migration or onboarding, else the legacy deed's previous holder.
    Custodial(Address),
}

impl Authority {
    /// The address holding authority, zero when nobody does.
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Direct(a) | Self::Escrowed(a) | Self::Custodial(a) => *a,
        }
    }

    /// A zero authority never authorizes anyone.
    #[must_use]
    pub fn permits(&self, caller: Address) -> bool {
        let holder = self.address();
        !holder.is_zero() && holder == caller
    }
}

/// One-time assignment flag of a deed escrow entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentState {
    /// `assign` has not been used.
    #[default]
    Unassigned,
    /// `assign` moved the label node to `target`. Permanent.
    Assigned {
        /// Address the node was assigned to.
        target: Address,
    },
}

impl AssignmentState {
    /// Check if transition is valid.
    #[must_use]
    pub fn can_transition_to(&self, next: AssignmentState) -> bool {
        matches!(
            (self, next),
            (Self::Unassigned, Self::Assigned { .. })
        )
    }

    /// True once assigned.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned { .. })
    }
}

/// Argument-order generation of a registrar deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrarVersion {
    /// Early deployments; some took `(subdomain, label)`.
    V0_9 {
        /// Whether the label/subdomain positions are swapped.
        swapped_args: bool,
    },
    /// Current deployments: `(label, subdomain)`.
    V1_0,
}

impl RegistrarVersion {
    /// Order `(label, subdomain)` the way this version expects them.
    #[must_use]
    pub fn order_args<'a>(&self, label: &'a str, subdomain: &'a str) -> (&'a str, &'a str) {
        match self {
            Self::V0_9 { swapped_args: true } => (subdomain, label),
            Self::V0_9 { swapped_args: false } | Self::V1_0 => (label, subdomain),
        }
    }
}

impl Default for RegistrarVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

/// Reference to a successor Domain Registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessorRef {
    /// Successor address.
    pub address: Address,
    /// Argument order the successor expects.
    pub version: RegistrarVersion,
}

impl SuccessorRef {
    /// Create a new successor reference.
    #[must_use]
    pub fn new(address: Address, version: RegistrarVersion) -> Self {
        Self { address, version }
    }
}

// =============================================================================
// REGISTRAR STATE MACHINE
// =============================================================================

/// Active registrar. Only exposes the transition to `Stopped`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveState;

impl ActiveState {
    /// One-way transition.
    #[must_use]
    pub fn stop(self) -> StoppedState {
        StoppedState {
            migration_target: None,
        }
    }
}

/// Stopped registrar. Only exposes migration settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoppedState {
    migration_target: Option<SuccessorRef>,
}

impl StoppedState {
    /// Set or replace the successor.
    pub fn set_migration_target(&mut self, target: SuccessorRef) {
        self.migration_target = Some(target);
    }

    /// The configured successor.
    pub fn migration_target(&self) -> Result<SuccessorRef, RegistrarError> {
        self.migration_target
            .ok_or(RegistrarError::NoMigrationTarget)
    }
}

/// Process-wide state of one Domain Registry instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrarState {
    /// Accepting configuration and registrations.
    Active(ActiveState),
    /// Terminal for this instance; only migration remains.
    Stopped(StoppedState),
}

impl Default for RegistrarState {
    fn default() -> Self {
        Self::Active(ActiveState)
    }
}

impl RegistrarState {
    /// Require the Active state.
    pub fn active(&self) -> Result<ActiveState, RegistrarError> {
        match self {
            Self::Active(state) => Ok(*state),
            Self::Stopped(_) => Err(RegistrarError::RegistrarStopped),
        }
    }

    /// Require the Stopped state.
    pub fn stopped(&self) -> Result<&StoppedState, RegistrarError> {
        match self {
            Self::Stopped(state) => Ok(state),
            Self::Active(_) => Err(RegistrarError::NotStopped),
        }
    }

    /// Require the Stopped state, mutably.
    pub fn stopped_mut(&mut self) -> Result<&mut StoppedState, RegistrarError> {
        match self {
            Self::Stopped(state) => Ok(state),
            Self::Active(_) => Err(RegistrarError::NotStopped),
        }
    }

    /// Apply `Active -> Stopped`.
    pub fn stop(&mut self) -> Result<(), RegistrarError> {
        let active = self.active()?;
        *self = Self::Stopped(active.stop());
        Ok(())
    }

    /// True once stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }
}
