//! Engine clocks.
//!
//! The engine measures elapsed time through an injectable [`Clock`]. Readings
//! are absolute; the scope subtracts the reading taken when the search starts.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time readings.
pub trait Clock: Send + Debug {
    /// Returns the current reading.
    fn now(&self) -> Duration;
}

/// CPU time consumed by the calling thread.
///
/// The time base is fixed at construction: thread CPU time if the per-thread
/// counter can be read, wall-clock time otherwise. A reading that fails later
/// repeats the last good one.
#[derive(Debug)]
pub struct ThreadCpuClock {
    base: TimeBase,
    last: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
enum TimeBase {
    ThreadCpu,
    Wall(Instant),
}

impl ThreadCpuClock {
    pub fn new() -> Self {
        match thread_cpu_time() {
            Some(first) => Self {
                base: TimeBase::ThreadCpu,
                last: AtomicU64::new(first.as_nanos() as u64),
            },
            None => Self::wall(),
        }
    }

    /// A clock on the wall-clock base, as used where the counter is missing.
    pub fn wall() -> Self {
        Self {
            base: TimeBase::Wall(Instant::now()),
            last: AtomicU64::new(0),
        }
    }

    /// Whether readings are thread CPU time.
    pub fn is_thread_cpu(&self) -> bool {
        matches!(self.base, TimeBase::ThreadCpu)
    }
}

impl Default for ThreadCpuClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ThreadCpuClock {
    fn now(&self) -> Duration {
        match self.base {
            TimeBase::Wall(origin) => origin.elapsed(),
            TimeBase::ThreadCpu => match thread_cpu_time() {
                Some(reading) => {
                    self.last.store(reading.as_nanos() as u64, Ordering::Relaxed);
                    reading
                }
                None => Duration::from_nanos(self.last.load(Ordering::Relaxed)),
            },
        }
    }
}

#[cfg(unix)]
fn thread_cpu_time() -> Option<Duration> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
    (rc == 0).then(|| Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
}

#[cfg(not(unix))]
fn thread_cpu_time() -> Option<Duration> {
    None
}

/// Wall-clock time since construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock for tests.
///
/// Every reading advances the clock by a fixed tick. Clones share the same
/// time, so a test can keep a handle and move time forward explicitly.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ails_solver::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(Duration::from_millis(10));
/// assert_eq!(clock.now(), Duration::from_millis(0));
/// assert_eq!(clock.now(), Duration::from_millis(10));
///
/// let handle = clock.clone();
/// handle.advance(Duration::from_secs(1));
/// assert_eq!(clock.now(), Duration::from_millis(1020));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    tick: u64,
}

impl ManualClock {
    /// Creates a clock at zero advancing `tick` per reading.
    pub fn new(tick: Duration) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            tick: tick.as_nanos() as u64,
        }
    }

    /// A clock that only moves through [`ManualClock::advance`].
    pub fn frozen() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Moves time forward without taking a reading.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Current time without advancing.
    pub fn peek(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.fetch_add(self.tick, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_ticks() {
        let clock = ManualClock::new(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_secs(2));
        assert_eq!(clock.peek(), Duration::from_secs(4));
    }

    #[test]
    fn test_frozen_clock() {
        let clock = ManualClock::frozen();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(5));
    }

    #[test]
    fn test_monotonic_clocks_never_go_back() {
        let wall = MonotonicClock::new();
        let cpu = ThreadCpuClock::new();
        let (w1, c1) = (wall.now(), cpu.now());
        let mut x = 0u64;
        for i in 0..10_000u64 {
            x = x.wrapping_add(i * i);
        }
        assert!(x > 0);
        assert!(wall.now() >= w1);
        assert!(cpu.now() >= c1);
    }

    #[test]
    fn test_thread_cpu_base_is_chosen_once() {
        let cpu = ThreadCpuClock::new();
        assert_eq!(cpu.is_thread_cpu(), cfg!(unix));

        let wall = ThreadCpuClock::wall();
        assert!(!wall.is_thread_cpu());
        let first = wall.now();
        std::thread::sleep(Duration::from_millis(2));
        assert!(wall.now() >= first + Duration::from_millis(2));
    }
}
