//! # Domain Invariants
//!
//! Business rules checked before any effect of a registrar call.

use super::errors::RegistrarError;
use super::fees::Settlement;
use super::value_objects::Authority;
use shared_types::{Address, U256};

/// Invariant: a label is a single, non-empty name level.
pub fn invariant_valid_label(label: &str, max_len: usize) -> Result<(), RegistrarError> {
    if label.is_empty() || label.len() > max_len || label.contains('.') {
        return Err(RegistrarError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

/// Invariant: only the current authority administers a label.
pub fn invariant_authorized(
    authority: &Authority,
    caller: Address,
    label: &str,
) -> Result<(), RegistrarError> {
    if !authority.permits(caller) {
        return Err(RegistrarError::unauthorized(caller, label));
    }
    Ok(())
}

/// Invariant: a subdomain is registered only while unowned.
pub fn invariant_subdomain_unowned(
    current_owner: Address,
    label: &str,
    subdomain: &str,
) -> Result<(), RegistrarError> {
    if !current_owner.is_zero() {
        return Err(RegistrarError::AlreadyOwned {
            label: label.to_string(),
            subdomain: subdomain.to_string(),
        });
    }
    Ok(())
}

/// Invariant: settlement neither creates nor destroys value.
///
/// `owner + referral == price` and `price + excess == payment`.
pub fn invariant_fee_conservation(settlement: &Settlement, payment: U256) -> bool {
    settlement.owner_amount.checked_add(settlement.referral_amount) == Some(settlement.price)
        && settlement.price.checked_add(settlement.excess) == Some(payment)
}
