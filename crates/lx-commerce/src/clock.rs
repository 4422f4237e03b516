use std::cell::Cell;

/// Wall-clock source for `addedAt` stamps, in milliseconds since the epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// `std` clock; the browser build supplies its own backed by `Date.now()`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct FixedClock {
    now: Cell<u64>,
}

impl FixedClock {
    pub fn at(now_ms: u64) -> Self {
        Self { now: Cell::new(now_ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
