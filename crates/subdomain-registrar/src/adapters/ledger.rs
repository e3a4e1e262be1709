//! Value Transfer Adapter
//!
//! Account balances in the external value unit.

use crate::domain::LedgerError;
use crate::ports::outbound::ValueTransfer;
use parking_lot::RwLock;
use shared_types::{Address, U256};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// In-memory ledger.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<Address, U256>>,
    rejecting: RwLock<HashSet<Address>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&self, account: Address, amount: U256) {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Make `account` refuse incoming transfers.
    pub fn reject_incoming(&self, account: Address) {
        self.rejecting.write().insert(account);
    }

    /// Sum of all balances.
    pub fn total(&self) -> U256 {
        self.balances
            .read()
            .values()
            .fold(U256::zero(), |acc, b| acc.saturating_add(*b))
    }

    fn apply(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let available = balances.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from,
                available,
                required: amount,
            });
        }
        balances.insert(from, available - amount);
        let credit = balances.entry(to).or_default();
        *credit = credit.saturating_add(amount);
        Ok(())
    }
}

impl ValueTransfer for InMemoryLedger {
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient(to));
        }
        if self.rejecting.read().contains(&to) {
            return Err(LedgerError::RecipientRejected(to));
        }
        self.apply(from, to, amount)?;
        debug!(%from, %to, %amount, "transfer");
        Ok(())
    }

    fn reverse(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.apply(to, from, amount)
    }

    fn balance(&self, account: Address) -> U256 {
        self.balances
            .read()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }
}
