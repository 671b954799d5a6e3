//! Clock abstraction for the measurement harness.
//!
//! A [`Clock`] supplies a monotonic timestamp and a way to turn two
//! timestamps into an elapsed [`Duration`]. The harness is generic over this
//! capability so the same measurement code can run against wall-clock time
//! ([`Monotonic`]) or per-thread CPU time ([`ThreadCpu`], Linux only).
//!
//! # Which clock?
//!
//! | Clock       | Measures                        | Availability          |
//! |-------------|---------------------------------|-----------------------|
//! | `Monotonic` | wall-clock time                 | all platforms         |
//! | `ThreadCpu` | CPU time of the calling thread  | Linux, query at runtime |
//!
//! `ThreadCpu` excludes time the thread spends suspended or sleeping, which
//! makes it the right choice when scheduling noise would otherwise dominate
//! a measurement. Its availability depends on the kernel, so callers must
//! check [`ThreadCpu::supported`] first.

use std::time::Duration;

#[cfg(target_os = "linux")]
mod thread;

#[cfg(target_os = "linux")]
pub use thread::ThreadCpu;

/// A monotonic source of timestamps.
///
/// Implementations must guarantee that `now()` never regresses with
/// wall-clock adjustments and that `elapsed` of two readings taken in
/// program order is never negative.
pub trait Clock {
    /// An opaque instant in time. Only meaningful relative to another
    /// instant from the same clock.
    type Instant: Copy;

    /// Read the current instant.
    fn now() -> Self::Instant;

    /// Elapsed time between two readings, saturating to zero if `end`
    /// somehow precedes `start`.
    fn elapsed(start: Self::Instant, end: Self::Instant) -> Duration;
}

/// Wall-clock monotonic time, backed by [`std::time::Instant`].
///
/// This is the default clock of [`Bench`](crate::Bench) and the one to use
/// unless you specifically need CPU time.
#[derive(Debug, Clone, Copy)]
pub struct Monotonic;

impl Clock for Monotonic {
    type Instant = std::time::Instant;

    #[inline]
    fn now() -> Self::Instant {
        std::time::Instant::now()
    }

    #[inline]
    fn elapsed(start: Self::Instant, end: Self::Instant) -> Duration {
        // duration_since saturates to zero for out-of-order instants.
        end.duration_since(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_of_swapped_instants_is_zero() {
        let a = Monotonic::now();
        std::thread::sleep(Duration::from_millis(1));
        let b = Monotonic::now();
        assert_eq!(Monotonic::elapsed(b, a), Duration::ZERO);
        assert!(Monotonic::elapsed(a, b) >= Duration::from_millis(1));
    }
}
