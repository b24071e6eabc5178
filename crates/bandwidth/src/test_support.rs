use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

fn recorded_sleeps() -> &'static Mutex<Vec<Duration>> {
    static RECORDED_SLEEPS: OnceLock<Mutex<Vec<Duration>>> = OnceLock::new();
    RECORDED_SLEEPS.get_or_init(|| Mutex::new(Vec::new()))
}

fn session_lock() -> &'static Mutex<()> {
    static SESSION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    SESSION_LOCK.get_or_init(|| Mutex::new(()))
}

pub(crate) fn append_recorded_sleep(duration: Duration) {
    recorded_sleeps().lock().unwrap_or_else(|poison| poison.into_inner()).push(duration);
}

/// Exclusive access to the recorded sleep durations, so parallel tests don't
/// observe each other's pacing calls.
pub struct RecordedSleepSession<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl RecordedSleepSession<'_> {
    pub fn clear(&mut self) {
        recorded_sleeps().lock().unwrap_or_else(|poison| poison.into_inner()).clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        recorded_sleeps().lock().unwrap_or_else(|poison| poison.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn take(&mut self) -> Vec<Duration> {
        std::mem::take(&mut *recorded_sleeps().lock().unwrap_or_else(|poison| poison.into_inner()))
    }
}

/// Acquires the process-wide recorded-sleep session guard.
#[must_use]
pub fn recorded_sleep_session() -> RecordedSleepSession<'static> {
    let guard = session_lock().lock().unwrap_or_else(|poison| poison.into_inner());
    RecordedSleepSession { _guard: guard }
}
