//! Monetary amounts in Saudi riyals.
//!
//! Amounts are held in halalas (smallest currency unit, 1 SAR = 100 halalas)
//! as unsigned integers; all arithmetic is checked. The marketplace service
//! delivers prices as decimal strings ("1299.50"), parsed here once at the
//! boundary.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

const HALALAS_PER_SAR: u64 = 100;

/// An amount of money in halalas.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_halalas(halalas: u64) -> Self {
        Self(halalas)
    }

    pub fn from_sar(sar: u64) -> DomainResult<Self> {
        let halalas = sar
            .checked_mul(HALALAS_PER_SAR)
            .ok_or_else(|| DomainError::invalid_amount("amount overflow"))?;
        Ok(Self(halalas))
    }

    /// Parse a decimal-string price as delivered by the marketplace service.
    ///
    /// Accepts an optional fractional part of at most two digits; rejects
    /// signs, exponents, and any other character.
    pub fn parse_sar(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::invalid_amount("empty amount"));
        }

        let (whole, fraction) = match raw.split_once('.') {
            // A decimal point must be followed by digits; "1." is malformed.
            Some((_, "")) => {
                return Err(DomainError::invalid_amount(format!(
                    "malformed amount: {raw}"
                )));
            }
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_amount(format!(
                "malformed amount: {raw}"
            )));
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_amount(format!(
                "malformed amount: {raw}"
            )));
        }

        let sar: u64 = whole
            .parse()
            .map_err(|_| DomainError::invalid_amount(format!("amount too large: {raw}")))?;

        let mut halalas_fraction: u64 = 0;
        if !fraction.is_empty() {
            halalas_fraction = fraction
                .parse::<u64>()
                .map_err(|_| DomainError::invalid_amount(format!("malformed amount: {raw}")))?;
            if fraction.len() == 1 {
                halalas_fraction *= 10;
            }
        }

        let halalas = sar
            .checked_mul(HALALAS_PER_SAR)
            .and_then(|h| h.checked_add(halalas_fraction))
            .ok_or_else(|| DomainError::invalid_amount(format!("amount too large: {raw}")))?;

        Ok(Self(halalas))
    }

    pub fn halalas(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invalid_amount("amount overflow"))
    }

    /// Multiply a unit price by a line quantity.
    pub fn mul_qty(self, qty: u32) -> DomainResult<Money> {
        self.0
            .checked_mul(qty as u64)
            .map(Money)
            .ok_or_else(|| DomainError::invalid_amount("line amount overflow"))
    }

    /// Integer percentage of this amount, truncating toward zero.
    pub fn percent(self, pct: u64) -> DomainResult<Money> {
        let scaled = (self.0 as u128)
            .checked_mul(pct as u128)
            .ok_or_else(|| DomainError::invalid_amount("amount overflow"))?;
        let halalas = scaled / 100;
        u64::try_from(halalas)
            .map(Money)
            .map_err(|_| DomainError::invalid_amount("amount overflow"))
    }

    /// Whole riyals, rounded half-up. This is what the storefront displays;
    /// fractional digits are never shown.
    pub fn to_sar_rounded(&self) -> u64 {
        (self.0 + HALALAS_PER_SAR / 2) / HALALAS_PER_SAR
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} SAR", self.to_sar_rounded())
    }
}
