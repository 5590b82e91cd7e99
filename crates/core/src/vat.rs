//! VAT (IVA) rates.
//!
//! The rate set is a compiled-in constant; it is not runtime-configurable.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the four VAT rates the business invoices with.
///
/// Persisted as the fractional rate (`0.21`, `0.1`, `0.04`, `0`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub enum VatRate {
    /// 0%
    Exempt,
    /// 4%
    SuperReduced,
    /// 10%
    Reduced,
    /// 21%
    #[default]
    General,
}

/// All rates in invoice presentation order (highest first).
pub const VAT_RATES: [VatRate; 4] = [
    VatRate::General,
    VatRate::Reduced,
    VatRate::SuperReduced,
    VatRate::Exempt,
];

/// Rate charged on a line whose hamper cost gives no usable breakdown
/// (unknown hamper, no components, or mixed rates at zero cost).
///
/// Business default; confirm with the product owner before changing.
pub const FALLBACK_VAT_RATE: VatRate = VatRate::General;

impl VatRate {
    /// Rate in basis points (2100 = 21%).
    pub const fn bps(&self) -> u32 {
        match self {
            VatRate::Exempt => 0,
            VatRate::SuperReduced => 400,
            VatRate::Reduced => 1_000,
            VatRate::General => 2_100,
        }
    }

    pub fn from_bps(bps: u32) -> Option<Self> {
        VAT_RATES.into_iter().find(|r| r.bps() == bps)
    }

    pub fn as_fraction(&self) -> f64 {
        self.bps() as f64 / 10_000.0
    }
}

impl core::fmt::Display for VatRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.bps() / 100)
    }
}

impl From<VatRate> for f64 {
    fn from(value: VatRate) -> Self {
        value.as_fraction()
    }
}

impl TryFrom<f64> for VatRate {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let bps = (value * 10_000.0).round();
        if bps < 0.0 || bps > u32::MAX as f64 {
            return Err(DomainError::validation(format!("unsupported VAT rate {value}")));
        }
        VatRate::from_bps(bps as u32)
            .ok_or_else(|| DomainError::validation(format!("unsupported VAT rate {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_round_trip_through_json() {
        for rate in VAT_RATES {
            let json = serde_json::to_string(&rate).unwrap();
            let back: VatRate = serde_json::from_str(&json).unwrap();
            assert_eq!(rate, back);
        }
        assert_eq!(serde_json::to_string(&VatRate::General).unwrap(), "0.21");
    }

    #[test]
    fn rejects_rates_outside_the_set() {
        assert!(serde_json::from_str::<VatRate>("0.16").is_err());
        assert!(VatRate::try_from(-0.1).is_err());
    }

    #[test]
    fn fallback_is_general_rate() {
        assert_eq!(FALLBACK_VAT_RATE.bps(), 2_100);
        assert_eq!(VAT_RATES[0], FALLBACK_VAT_RATE);
        assert_eq!(VatRate::default(), FALLBACK_VAT_RATE);
    }
}
