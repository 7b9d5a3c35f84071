//! Injectable wall clock.
//!
//! Every date computation in the services goes through a [`Clock`] so tests can
//! pin "now" and walk it across day, week and month boundaries.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: RwLock::new(now) }
    }

    /// Clock set to a local wall-clock time.
    pub fn at_local(naive: NaiveDateTime) -> Self {
        Self::new(local_from_naive(naive))
    }

    pub fn set(&self, now: DateTime<Local>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    pub fn set_local(&self, naive: NaiveDateTime) {
        self.set(local_from_naive(naive));
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Resolve a local wall-clock time, taking the earlier instant when it is ambiguous.
/// Times skipped by a DST jump are read as UTC.
pub(crate) fn local_from_naive(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}
