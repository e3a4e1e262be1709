//! # Fee Settlement Arithmetic
//!
//! Pure computation of the owner/referrer split. Integer only; the
//! truncated remainder of the referral share accrues to the owner.

use super::errors::RegistrarError;
use super::value_objects::{ReferralFee, PPM_DENOMINATOR};
use shared_types::{Address, U256};

/// How a registration payment is distributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Listed price being settled.
    pub price: U256,
    /// Paid to the referrer.
    pub referral_amount: U256,
    /// Paid to the domain's authority.
    pub owner_amount: U256,
    /// `payment - price`, kept by the registry.
    pub excess: U256,
}

/// Split `price` into `(owner_amount, referral_amount)`.
///
/// `price * ppm / 1_000_000` is evaluated as
/// `(price / D) * ppm + (price % D) * ppm / D`, which is exact and never
/// overflows because `ppm <= D`.
#[must_use]
pub fn split_price(price: U256, fee: ReferralFee) -> (U256, U256) {
    let denominator = U256::from(PPM_DENOMINATOR);
    let ppm = U256::from(fee.ppm());
    let referral = (price / denominator) * ppm + (price % denominator) * ppm / denominator;
    (price - referral, referral)
}

/// Compute the settlement of one registration.
///
/// A zero referrer forfeits its share to the owner.
pub fn settle(
    price: U256,
    fee: ReferralFee,
    payment: U256,
    referrer: Address,
) -> Result<Settlement, RegistrarError> {
    if payment < price {
        return Err(RegistrarError::InsufficientPayment {
            required: price,
            provided: payment,
        });
    }

    let (mut owner_amount, mut referral_amount) = split_price(price, fee);
    if referrer.is_zero() {
        owner_amount = price;
        referral_amount = U256::zero();
    }

    Ok(Settlement {
        price,
        referral_amount,
        owner_amount,
        excess: payment - price,
    })
}
