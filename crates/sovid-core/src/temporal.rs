//! # Temporal Types: Ledger Time and Clocks
//!
//! Ledger time is a monotonically non-decreasing count of seconds supplied
//! by the host environment. The registry never reads the wall clock
//! directly; it asks a [`Clock`].
//!
//! ## Clocks
//!
//! - [`SystemClock`]: UTC wall-clock seconds via `chrono`, clamped so a
//!   reading never goes backwards relative to an earlier reading.
//! - [`ManualClock`]: externally driven. `set` never moves time backwards,
//!   `advance` adds seconds. Used by tests and by hosts that already own a
//!   logical clock (a block height or consensus timestamp).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point in ledger time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerTime(u64);

impl LedgerTime {
    /// Ledger time zero.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw seconds value.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The raw seconds value.
    pub const fn secs(self) -> u64 {
        self.0
    }

    /// This time plus `secs`, saturating at `u64::MAX`.
    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Interpret as Unix epoch seconds, if representable.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.0).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

impl std::fmt::Display for LedgerTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// Source of the current ledger time.
pub trait Clock: Send + Sync {
    /// The current ledger time. Successive calls never decrease.
    fn now(&self) -> LedgerTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> LedgerTime {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> LedgerTime {
        (**self).now()
    }
}

// ─── SystemClock ─────────────────────────────────────────────────────

/// UTC wall-clock seconds, never decreasing.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    /// Create a system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> LedgerTime {
        let wall = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let previous = self.last.fetch_max(wall, Ordering::AcqRel);
        LedgerTime(previous.max(wall))
    }
}

// ─── ManualClock ─────────────────────────────────────────────────────

/// An externally driven clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn new(start: LedgerTime) -> Self {
        Self {
            secs: AtomicU64::new(start.0),
        }
    }

    /// Move the clock to `to`. Earlier values are ignored.
    pub fn set(&self, to: LedgerTime) -> LedgerTime {
        let previous = self.secs.fetch_max(to.0, Ordering::AcqRel);
        LedgerTime(previous.max(to.0))
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) -> LedgerTime {
        let mut current = self.secs.load(Ordering::Acquire);
        loop {
            let next = current.saturating_add(secs);
            match self
                .secs
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return LedgerTime(next),
                Err(observed) => current = observed,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LedgerTime {
        LedgerTime(self.secs.load(Ordering::Acquire))
    }
}
