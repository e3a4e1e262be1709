//! # Fee Settlement
//!
//! Executes a computed `Settlement` through the call journal. The payer's
//! full payment lands at the registry first, then the shares leave it, so the
//! excess stays with the registry and a failed payout rolls everything back.

use super::journal::Journal;
use crate::domain::{invariant_fee_conservation, RegistrarError, Settlement};
use shared_types::{Address, U256};
use tracing::debug;

/// Parties of one settlement.
pub(super) struct Payees {
    pub registry: Address,
    pub owner: Address,
    pub referrer: Address,
}

pub(super) fn execute(
    journal: &mut Journal<'_>,
    payer: Address,
    payment: U256,
    settlement: &Settlement,
    payees: &Payees,
) -> Result<(), RegistrarError> {
    debug_assert!(invariant_fee_conservation(settlement, payment));

    journal.transfer(payer, payees.registry, payment)?;
    if !payees.referrer.is_zero() {
        journal.transfer(payees.registry, payees.referrer, settlement.referral_amount)?;
    }
    journal.transfer(payees.registry, payees.owner, settlement.owner_amount)?;

    debug!(
        owner_amount = %settlement.owner_amount,
        referral_amount = %settlement.referral_amount,
        excess = %settlement.excess,
        "Settled registration"
    );
    Ok(())
}
