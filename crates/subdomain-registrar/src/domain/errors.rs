//! # Domain Errors
//!
//! Error kinds for the subdomain registrar. Every error aborts the call that
//! raised it with no observable effect; none is fatal to the process.

use shared_types::{Address, U256};
use thiserror::Error;

/// Value-transfer failures reported by the ledger port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Recipient is the zero address.
    #[error("Invalid recipient: {0:?}")]
    InvalidRecipient(Address),

    /// Recipient refuses incoming value.
    #[error("Recipient rejected transfer: {0:?}")]
    RecipientRejected(Address),

    /// Sender cannot cover the amount.
    #[error("Insufficient funds: {account:?} has {available}, needs {required}")]
    InsufficientFunds {
        /// Paying account
        account: Address,
        /// Balance held
        available: U256,
        /// Amount requested
        required: U256,
    },
}

/// Event publication failures reported by the event sink port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventSinkError {
    /// Event could not be encoded.
    #[error("Event encoding failed: {0}")]
    Encode(String),

    /// Encoded events could not be written out.
    #[error("Event write failed: {0}")]
    Write(String),
}

/// Registrar error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrarError {
    /// Caller lacks authority over the label, deed or registrar.
    #[error("Unauthorized: {caller:?} may not administer {subject}")]
    Unauthorized {
        /// Rejected caller
        caller: Address,
        /// Label or component the caller tried to administer
        subject: String,
    },

    /// Referral fee above one million parts-per-million.
    #[error("Invalid referral fee: {0} ppm exceeds 1000000")]
    InvalidFee(u32),

    /// Label or subdomain is empty, too long, or contains a dot.
    #[error("Invalid label: {0:?}")]
    InvalidLabel(String),

    /// Domain is unknown or has been unlisted.
    #[error("Domain unlisted: {0}")]
    DomainUnlisted(String),

    /// Domain now belongs to a successor registry.
    #[error("Domain {label} migrated to {successor:?}")]
    DomainMigrated {
        /// Migrated label
        label: String,
        /// Registry now serving the label
        successor: Address,
    },

    /// Subdomain already has an owner in the Name Resolution Registry.
    #[error("Subdomain {subdomain}.{label} already owned")]
    AlreadyOwned {
        /// Parent label
        label: String,
        /// Taken subdomain
        subdomain: String,
    },

    /// Payment below the listed price.
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        /// Listed price
        required: U256,
        /// Value sent
        provided: U256,
    },

    /// No deed has been transferred into custody for the label.
    #[error("Deed not escrowed: {0}")]
    NotEscrowed(String),

    /// The one-time assignment for the label was already used.
    #[error("Label already assigned: {0}")]
    AlreadyAssigned(String),

    /// The legacy parent registrar still holds the TLD namespace.
    #[error("Parent registrar unchanged")]
    ParentUnchanged,

    /// Operation requires a stopped registrar.
    #[error("Registrar not stopped")]
    NotStopped,

    /// Operation requires an active registrar.
    #[error("Registrar stopped")]
    RegistrarStopped,

    /// Migration attempted before a successor was configured.
    #[error("No migration target configured")]
    NoMigrationTarget,

    /// Upgrade attempted without a transfer address.
    #[error("No transfer address configured for {0}")]
    NoTransferAddress(String),

    /// Successor registry cannot be resolved or refused the hand-off.
    #[error("Successor unavailable at {address:?}: {reason}")]
    SuccessorUnavailable {
        /// Configured successor
        address: Address,
        /// Why the hand-off cannot proceed
        reason: String,
    },

    /// Value transfer failed.
    #[error("Transfer failed: {0}")]
    Transfer(#[from] LedgerError),

    /// Events of the call could not be published.
    #[error("Event publication failed: {0}")]
    EventSink(#[from] EventSinkError),

    /// The label node is not held by the component acting on it.
    #[error("Label node for {label} not held by {holder:?}")]
    NodeNotHeld {
        /// Label whose node was checked
        label: String,
        /// Address expected to hold the node
        holder: Address,
    },

    /// Name Resolution Registry port failure.
    #[error("Name registry error: {0}")]
    NameRegistry(String),

    /// Legacy Parent Registrar port failure.
    #[error("Legacy registrar error: {0}")]
    LegacyRegistrar(String),

    /// Snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl RegistrarError {
    /// Shorthand for an `Unauthorized` error.
    pub fn unauthorized(caller: Address, subject: impl Into<String>) -> Self {
        Self::Unauthorized {
            caller,
            subject: subject.into(),
        }
    }
}
