use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Upper bound for asset and currency codes, mirrors the `VARCHAR(10)` columns
pub const MAX_CODE_LEN: usize = 10;

/// Canonical price quote, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPriceRecord {
    /// Quoted price, always positive
    pub value: f64,
    /// Asset code (e.g., "BTC")
    pub asset: String,
    /// Quote currency code (e.g., "USD")
    pub quote_currency: String,
    /// Capture time in UTC, without offset
    pub captured_at: NaiveDateTime,
}

/// A price quote as persisted, with its store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: i32,
    pub value: f64,
    pub asset: String,
    pub quote_currency: String,
    pub captured_at: NaiveDateTime,
}

impl NewPriceRecord {
    /// Checks the record invariants: positive finite value and short, non-empty codes.
    pub fn validate(&self) -> Result<()> {
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(Error::ValidationError(format!(
                "price must be a positive number, got {}",
                self.value
            )));
        }
        check_code("asset", &self.asset)?;
        check_code("quote currency", &self.quote_currency)?;
        Ok(())
    }

    pub fn into_stored(self, id: i32) -> PriceRecord {
        PriceRecord {
            id,
            value: self.value,
            asset: self.asset,
            quote_currency: self.quote_currency,
            captured_at: self.captured_at,
        }
    }
}

fn check_code(field: &str, code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(Error::ValidationError(format!("{} code is empty", field)));
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(Error::ValidationError(format!(
            "{} code '{}' is longer than {} characters",
            field, code, MAX_CODE_LEN
        )));
    }
    Ok(())
}
