//! history.rs — simple in-memory log of recent assessment outcomes for
//! diagnostics. Transient by design; nothing is persisted.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::quality::{QualityLevel, QualityView, Trend};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub level: QualityLevel,
    pub trend: Trend,
    pub score: f64,
    // compact partition fingerprint for quick diagnostics:
    pub healthy: usize,
    pub drifted: usize,
    pub low_confidence: usize,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, score: f64, view: &QualityView) {
        let entry = HistoryEntry {
            ts_unix: now_unix(),
            level: view.level,
            trend: view.trend,
            score,
            healthy: view.healthy,
            drifted: view.drifted,
            low_confidence: view.low_confidence,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
