//! Deposit arithmetic for the get-started funnel.
//!
//! All amounts are USD. The funnel quotes a fixed project estimate and
//! collects a 25% deposit through the hosted checkout; Stripe-style APIs
//! want that amount in minor units (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Deposit share collected up front (25%).
const DEPOSIT_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// The fixed project estimate quoted in the funnel, in whole dollars.
const STANDARD_ESTIMATE_DOLLARS: i64 = 5400;

/// A quoted project estimate in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectEstimate(Decimal);

impl ProjectEstimate {
    /// The fixed estimate the funnel currently quotes ($5,400).
    #[must_use]
    pub fn standard() -> Self {
        Self(Decimal::from(STANDARD_ESTIMATE_DOLLARS))
    }

    /// An estimate of `dollars` whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }

    /// Total estimate in dollars.
    #[must_use]
    pub const fn total_dollars(&self) -> Decimal {
        self.0
    }

    /// The 25% deposit, rounded to whole dollars, half away from zero.
    #[must_use]
    pub fn deposit_dollars(&self) -> Decimal {
        (self.0 * DEPOSIT_RATE).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// The deposit in minor currency units (cents), the form checkout
    /// APIs expect.
    #[must_use]
    pub fn deposit_minor_units(&self) -> i64 {
        (self.deposit_dollars() * Decimal::ONE_HUNDRED)
            .to_i64()
            .unwrap_or(0)
    }
}
