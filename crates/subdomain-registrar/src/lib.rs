//! # Subdomain Registrar
//!
//! Paid subdomain registration under listed labels, with referral fee
//! settlement, escrow of legacy deeds, and one-way migration of labels to a
//! successor registry.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | Domain Registry | Lists labels, sells subdomains, hands labels upstream |
//! | Fee Settlement | Splits each price between the label's authority and a referrer |
//! | Deed Custodian | Holds legacy deeds; one-time assignment and claim-back |
//! | Migration Controller | Stop switch and per-label hand-off to a successor |
//!
//! ## Guarantees
//!
//! - Every call commits fully or leaves no observable effect.
//! - Calls sharing a `RegistrarContext` are applied one at a time.
//! - `owner_amount + referral_amount == price` for every settlement.
//! - Assignment and stopping happen at most once.
//!
//! ## Module Structure
//!
//! ```text
//! subdomain-registrar/
//! ├── domain/          # Records, state machines, fee arithmetic, errors
//! ├── ports/           # DomainRegistryApi, MigrationApi, DeedCustodianApi, outbound traits
//! ├── adapters/        # In-memory Name Resolution Registry, ledger, event sinks
//! ├── service/         # DomainRegistry, DeedCustodian, call journal
//! ├── events.rs        # RegistrarEvent
//! └── config.rs        # RegistrarConfig
//! ```
//!
//! ## Example
//!
//! ```
//! use shared_types::{labelhash, Address, U256};
//! use subdomain_registrar::prelude::*;
//!
//! let env = InMemoryEnvironment::new();
//! let custodian = env.deploy_custodian(Address::repeat_byte(0xcc));
//! let registry = env.deploy_registry(
//!     Address::repeat_byte(0xaa),
//!     Address::repeat_byte(0x0f),
//!     custodian,
//! );
//!
//! let owner = Address::repeat_byte(1);
//! env.legacy.issue("test", owner).unwrap();
//! // Onboard: hand the deed, and with it the label node, to the registry.
//! env.legacy.transfer_deed(labelhash("test"), registry.address()).unwrap();
//! registry
//!     .configure_domain(owner, "test", U256::from(100), 100_000)
//!     .unwrap();
//!
//! let buyer = Address::repeat_byte(2);
//! env.ledger.mint(buyer, U256::from(100));
//! let request = RegistrationRequest::new("test", "foo", buyer, U256::from(100));
//! registry.register(buyer, request).unwrap();
//! assert_eq!(env.ledger.balance(owner), U256::from(100));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use config::{ConfigError, RegistrarConfig};
pub use domain::{
    Authority, DeedEscrow, DomainQuery, DomainRecord, DomainStatus, LedgerError, MigratedDomain,
    ReferralFee, RegistrarError, RegistrarState, RegistrarVersion, RegistrationRequest,
    Settlement, SubdomainState, SuccessorRef, PPM_DENOMINATOR,
};
pub use events::{EmittedEvent, RegistrarEvent};
pub use service::{DeedCustodian, DomainRegistry, ExecutionLock, RegistrarContext, RegistrarStats};

/// Everything needed to wire and drive registrar components.
pub mod prelude {
    pub use crate::adapters::*;
    pub use crate::config::RegistrarConfig;
    pub use crate::domain::*;
    pub use crate::events::{EmittedEvent, RegistrarEvent};
    pub use crate::ports::*;
    pub use crate::service::{DeedCustodian, DomainRegistry, RegistrarContext, RegistrarStats};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
