use chrono::Utc;
use common::{models::NewPriceRecord, Error, Result};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotPrice,
}

#[derive(Debug, Deserialize)]
struct SpotPrice {
    amount: String,
    base: String,
    currency: String,
}

/// Map a raw spot payload (`{"data": {"amount", "base", "currency"}}`) to a canonical record.
///
/// The capture time is taken from the local clock in UTC; the upstream payload carries none.
pub fn normalize(payload: &serde_json::Value) -> Result<NewPriceRecord> {
    let response = SpotResponse::deserialize(payload).map_err(|e| {
        warn!("Unexpected spot payload {}: {}", payload, e);
        Error::ValidationError(format!("Unexpected spot payload shape: {}", e))
    })?;

    let spot = response.data;
    let value = spot
        .amount
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::ValidationError(format!("Failed to parse price '{}': {}", spot.amount, e)))?;

    let record = NewPriceRecord {
        value,
        asset: spot.base,
        quote_currency: spot.currency,
        captured_at: Utc::now().naive_utc(),
    };
    record.validate()?;

    Ok(record)
}
