use bourse_core::Timestamp;
use bourse_ports::Clock;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

/// Clock that only moves when told to; for deterministic tests
#[derive(Debug)]
pub struct FixedClock {
    inner: Arc<RwLock<Timestamp>>,
}

impl FixedClock {
    pub fn at(time: Timestamp) -> Self {
        FixedClock {
            inner: Arc::new(RwLock::new(time)),
        }
    }

    pub fn set(&self, time: Timestamp) {
        *self.inner.write() = time;
    }

    pub fn advance(&self, by: Duration) {
        *self.inner.write() += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clone for FixedClock {
    fn clone(&self) -> Self {
        FixedClock {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.inner.read()
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
