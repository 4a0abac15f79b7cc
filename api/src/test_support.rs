use async_trait::async_trait;
use common::{
    models::{NewPriceRecord, PriceRecord, TradingPair},
    Error, Result,
};
use connectors::QuoteFetcher;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use store::{effective_limit, PriceRepository};

pub fn spot_payload(amount: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {"amount": amount, "base": "BTC", "currency": "USD"}
    })
}

/// Replays scripted responses, then keeps returning `fallback` (or a fetch error)
pub struct ScriptedFetcher {
    pair: TradingPair,
    script: Mutex<VecDeque<Result<serde_json::Value>>>,
    fallback: Option<serde_json::Value>,
    panic_first: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<serde_json::Value>>) -> Self {
        Self {
            pair: TradingPair::default(),
            script: Mutex::new(script.into()),
            fallback: None,
            panic_first: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(payload: serde_json::Value) -> Self {
        Self::new(Vec::new()).then_always(payload)
    }

    pub fn then_always(mut self, payload: serde_json::Value) -> Self {
        self.fallback = Some(payload);
        self
    }

    pub fn panic_first(self) -> Self {
        self.panic_first.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteFetcher for ScriptedFetcher {
    fn pair(&self) -> &TradingPair {
        &self.pair
    }

    async fn fetch(&self) -> Result<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_first.swap(false, Ordering::SeqCst) {
            panic!("scripted fetcher panic");
        }

        let step = self.script.lock().unwrap().pop_front();
        if let Some(step) = step {
            return step;
        }
        self.fallback
            .clone()
            .ok_or_else(|| Error::FetchError("script exhausted".into()))
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    records: Mutex<Vec<PriceRecord>>,
    fail_writes: bool,
}

impl MemoryRepository {
    pub fn failing() -> Self {
        Self {
            records: Mutex::default(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl PriceRepository for MemoryRepository {
    async fn save(&self, record: &NewPriceRecord) -> Result<PriceRecord> {
        record.validate()?;
        if self.fail_writes {
            return Err(Error::DbError("connection refused".into()));
        }

        let mut records = self.records.lock().unwrap();
        let stored = record.clone().into_stored(records.len() as i32 + 1);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<PriceRecord>> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.captured_at.cmp(&a.captured_at).then(b.id.cmp(&a.id)));
        records.truncate(effective_limit(limit) as usize);
        Ok(records)
    }
}
