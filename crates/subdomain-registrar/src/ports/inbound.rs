//! # Inbound Ports
//!
//! Public operations of the registrar components. Every state-changing call
//! takes the caller's address first and either commits fully or returns an
//! error with no observable effect.

use crate::domain::{
    DeedEscrow, DomainQuery, RegistrarError, RegistrationRequest, RegistrarVersion,
};
use shared_types::{Address, U256};

/// Domain Registry API - inbound port.
pub trait DomainRegistryApi: Send + Sync {
    /// List or relist `label`. Caller must be the label's authority.
    fn configure_domain(
        &self,
        caller: Address,
        label: &str,
        price: U256,
        referral_fee_ppm: u32,
    ) -> Result<(), RegistrarError>;

    /// Read `(label, price, registration state, fee)`. Never fails.
    fn query(&self, label: &str, subdomain: &str) -> DomainQuery;

    /// Withdraw `label` from registration, keeping its price and fee.
    fn unlist_domain(&self, caller: Address, label: &str) -> Result<(), RegistrarError>;

    /// Register a subdomain and settle the payment.
    fn register(&self, caller: Address, request: RegistrationRequest)
        -> Result<(), RegistrarError>;

    /// Record the hand-off target used by `upgrade`.
    fn set_transfer_address(
        &self,
        caller: Address,
        label: &str,
        target: Address,
    ) -> Result<(), RegistrarError>;

    /// Hand the label node to its transfer address once the upstream
    /// registrar has changed.
    fn upgrade(&self, caller: Address, label: &str) -> Result<(), RegistrarError>;
}

/// Migration Controller API - inbound port.
pub trait MigrationApi: Send + Sync {
    /// `Active -> Stopped`. Operator only.
    fn stop(&self, caller: Address) -> Result<(), RegistrarError>;

    /// Configure the successor. Operator only, while stopped.
    fn set_migration_address(
        &self,
        caller: Address,
        successor: Address,
        version: RegistrarVersion,
    ) -> Result<(), RegistrarError>;

    /// Move `label` to the configured successor.
    fn migrate(&self, caller: Address, label: &str) -> Result<(), RegistrarError>;

    /// Query the configured successor in the argument order its version
    /// expects.
    fn successor_query(&self, label: &str, subdomain: &str)
        -> Result<DomainQuery, RegistrarError>;
}

/// Deed Custodian API - inbound port.
pub trait DeedCustodianApi: Send + Sync {
    /// Move the caller's legacy deed into custody.
    fn deposit(&self, caller: Address, label: &str) -> Result<(), RegistrarError>;

    /// Beneficial owner of the escrowed deed; zero if never escrowed.
    fn deed_owner(&self, label: &str) -> Address;

    /// Full escrow entry, if any.
    fn escrow(&self, label: &str) -> Option<DeedEscrow>;

    /// Reassign beneficial ownership.
    fn transfer_deed(
        &self,
        caller: Address,
        label: &str,
        new_owner: Address,
    ) -> Result<(), RegistrarError>;

    /// One-time direct reassignment of the label node.
    fn assign(&self, caller: Address, label: &str, target: Address)
        -> Result<(), RegistrarError>;

    /// Take the deed back once the legacy registrar no longer holds the TLD.
    fn claim(&self, caller: Address, label: &str) -> Result<(), RegistrarError>;
}
