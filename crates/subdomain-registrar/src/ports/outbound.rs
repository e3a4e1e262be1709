//! # Outbound Ports
//!
//! Capabilities the registrar calls synchronously. The core knows nothing of
//! how they are implemented; every state-changing method is undone by the
//! call journal if a later step of the same call fails.

use crate::domain::{DomainQuery, EventSinkError, LedgerError, MigratedDomain, RegistrarError};
use crate::events::EmittedEvent;
use shared_types::{Address, Hash, U256};
use std::sync::Arc;

/// Name Resolution Registry - outbound port.
///
/// Maps a node hash to an owner and a resolver. Unknown nodes report the
/// zero address for both.
pub trait NameRegistry: Send + Sync {
    /// Current owner of `node`.
    fn owner(&self, node: Hash) -> Address;

    /// Set the owner of `node`.
    fn set_owner(&self, node: Hash, owner: Address) -> Result<(), RegistrarError>;

    /// Current resolver of `node`.
    fn resolver(&self, node: Hash) -> Address;

    /// Set the resolver of `node`.
    fn set_resolver(&self, node: Hash, resolver: Address) -> Result<(), RegistrarError>;
}

/// Address records held by resolvers - outbound port.
pub trait AddressResolver: Send + Sync {
    /// Address recorded for `node` by `resolver`.
    fn addr(&self, resolver: Address, node: Hash) -> Address;

    /// Record `addr` for `node` on `resolver`. Fails if nothing answers at
    /// `resolver`.
    fn set_addr(&self, resolver: Address, node: Hash, addr: Address)
        -> Result<(), RegistrarError>;
}

/// Legacy Parent Registrar - outbound port.
pub trait LegacyRegistrar: Send + Sync {
    /// Address the legacy registrar acts as in the Name Resolution Registry.
    fn address(&self) -> Address;

    /// Current holder of the deed for `label_hash`; zero if none was issued.
    fn deed_owner(&self, label_hash: Hash) -> Address;

    /// Holder of the deed before its latest transfer; zero if never moved.
    fn previous_owner(&self, label_hash: Hash) -> Address;

    /// Move the deed for `label_hash` to `to`.
    fn transfer_deed(&self, label_hash: Hash, to: Address) -> Result<(), RegistrarError>;

    /// Put back the deed holders recorded before a transfer. Leaves the
    /// label node alone.
    fn restore_deed(
        &self,
        label_hash: Hash,
        owner: Address,
        previous_owner: Address,
    ) -> Result<(), RegistrarError>;
}

/// Value transfer - outbound port.
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` from `from` to `to`.
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError>;

    /// Undo a transfer made earlier in the same call. Bypasses recipient
    /// acceptance so a rollback cannot be refused.
    fn reverse(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError>;

    /// Balance of `account`.
    fn balance(&self, account: Address) -> U256;
}

/// A Domain Registry able to take over migrated domains - outbound port.
///
/// The hand-off is two-phase: `prepare_migrated_domain` validates without
/// effect, `receive_migrated_domain` records the domain on the successor side
/// and is always the last external step of a migration. The successor does
/// not publish its own events; it returns them for the migrating registry to
/// publish with the rest of the call.
pub trait SuccessorRegistry: Send + Sync {
    /// Address of the successor.
    fn address(&self) -> Address;

    /// Check that `domain` would be accepted from `from`.
    fn prepare_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<(), RegistrarError>;

    /// Take over `domain`. The label node must already be owned by the
    /// successor. Returns the events the hand-off produced.
    fn receive_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<Vec<EmittedEvent>, RegistrarError>;

    /// Drop a domain received from `from` whose migration was rolled back.
    /// Only valid once the label node has returned to its previous owner.
    fn discard_migrated_domain(
        &self,
        from: Address,
        domain: &MigratedDomain,
    ) -> Result<(), RegistrarError>;

    /// Query with arguments in the successor's own positional order.
    fn query(&self, first: &str, second: &str) -> DomainQuery;
}

/// Resolves successor addresses to callable registries.
pub trait SuccessorDirectory: Send + Sync {
    /// Successor registered at `address`, if it is still alive.
    fn resolve(&self, address: Address) -> Option<Arc<dyn SuccessorRegistry>>;
}

/// Event publication - outbound port.
pub trait EventSink: Send + Sync {
    /// Publish the events of one call. Either every event is accepted or
    /// the call is rolled back.
    fn publish(&self, events: &[EmittedEvent]) -> Result<(), EventSinkError>;
}

/// Read access to the Deed Custodian's escrow table.
pub trait EscrowView: Send + Sync {
    /// Address the custodian holds label nodes as.
    fn custodian_address(&self) -> Address;

    /// Beneficial owner of the escrowed deed; zero if not escrowed.
    fn deed_owner_of(&self, label_hash: Hash) -> Address;
}
