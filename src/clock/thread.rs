//! Per-thread CPU-time clock backed by `CLOCK_THREAD_CPUTIME_ID`.

use std::time::Duration;

use super::Clock;

/// CPU time consumed by the calling thread.
///
/// Unlike [`Monotonic`](super::Monotonic), time the thread spends sleeping
/// or suspended does not accumulate. Support depends on the kernel exposing
/// a per-thread CPU clock; callers must check [`supported`](Self::supported)
/// before relying on readings. When the underlying syscall fails, readings
/// are zeroed rather than surfaced as errors.
#[derive(Debug, Clone, Copy)]
pub struct ThreadCpu;

impl ThreadCpu {
    /// Whether the platform exposes a CPU-time clock for the calling thread.
    pub fn supported() -> bool {
        let mut clock_id: libc::clockid_t = 0;
        // SAFETY: pthread_self() is always a valid handle for the calling
        // thread, and clock_id is a valid out-pointer.
        unsafe { libc::pthread_getcpuclockid(libc::pthread_self(), &mut clock_id) == 0 }
    }
}

impl Clock for ThreadCpu {
    /// CPU time consumed since some unspecified thread-local epoch.
    type Instant = Duration;

    fn now() -> Self::Instant {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: ts is a valid out-pointer for the duration of the call.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
        if rc != 0 {
            tracing::debug!(
                "clock_gettime(CLOCK_THREAD_CPUTIME_ID) failed: {}",
                std::io::Error::last_os_error()
            );
            return Duration::ZERO;
        }
        Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
    }

    #[inline]
    fn elapsed(start: Self::Instant, end: Self::Instant) -> Duration {
        end.saturating_sub(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_cpu_clock_is_supported_on_linux() {
        assert!(ThreadCpu::supported());
    }

    #[test]
    fn busy_work_accumulates_cpu_time() {
        let start = ThreadCpu::now();
        let mut acc = 0u64;
        for i in 0..5_000_000u64 {
            acc = acc.wrapping_add(std::hint::black_box(i));
        }
        std::hint::black_box(acc);
        let end = ThreadCpu::now();
        assert!(ThreadCpu::elapsed(start, end) > Duration::ZERO);
    }
}
