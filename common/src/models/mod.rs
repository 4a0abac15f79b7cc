mod pair;
mod price;

pub use pair::TradingPair;
pub use price::{NewPriceRecord, PriceRecord, MAX_CODE_LEN};
