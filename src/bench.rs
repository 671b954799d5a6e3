//! Measurement harness: one-shot marking and scoped probes.
//!
//! [`GenericBench`] is a zero-sized utility generic over a [`Clock`]. It
//! reads a timestamp before and after a unit of work and turns the
//! difference into a [`Mark`] sample, either around a single call
//! ([`GenericBench::mark`]) or across an arbitrary code region via a scoped
//! [`Probe`]. [`Bench`] pins the clock to wall-clock time and is the alias
//! almost all callers want.
//!
//! The harness adds no retries, timeouts or error handling of its own: the
//! measured code runs exactly once and panics unwind through unmodified. A
//! probe still delivers its sample while unwinding, so every probe
//! contributes exactly one measurement no matter how the region exits.

use std::marker::PhantomData;

use crate::clock::{Clock, Monotonic};
use crate::mark::Mark;

/// Measurement harness parameterized by a clock.
///
/// Use the [`Bench`] alias for wall-clock measurements, or
/// [`ThreadBench`](crate::ThreadBench) (Linux) for per-thread CPU time.
///
/// ```
/// use stopmark::Bench;
///
/// let (mark, value) = Bench::mark(|| 1 + 2);
/// assert_eq!(value, 3);
/// assert_eq!(mark.iterations(), 1);
/// ```
pub struct GenericBench<C: Clock>(PhantomData<C>);

/// Harness measuring wall-clock time via [`Monotonic`]. The default choice.
pub type Bench = GenericBench<Monotonic>;

impl<C: Clock> GenericBench<C> {
    /// Measure a single invocation of `f`.
    ///
    /// Returns the elapsed time as a single-sample [`Mark`] together with
    /// whatever `f` returned; for callables without a return value the
    /// payload is simply `()`. The callable runs exactly once and failures
    /// propagate to the caller before any timing result exists.
    pub fn mark<T>(f: impl FnOnce() -> T) -> (Mark, T) {
        let start = C::now();
        let value = f();
        let elapsed = C::elapsed(start, C::now());
        (Mark::from(elapsed), value)
    }

    /// Open a scoped probe that delivers one sample to `mark` when the
    /// surrounding region exits.
    ///
    /// ```
    /// use stopmark::{Bench, Mark};
    ///
    /// let mut mark = Mark::new();
    /// {
    ///     let _probe = Bench::probe(&mut mark);
    ///     // ... measured region, any number of exit paths ...
    /// }
    /// assert_eq!(mark.iterations(), 1);
    /// ```
    pub fn probe(mark: &mut Mark) -> Probe<'_, C> {
        Probe::new(mark)
    }
}

/// Scoped measurement of one code region.
///
/// Captures a start timestamp on construction and merges the elapsed time
/// into its target accumulator exactly once: on the first [`done`](Self::done)
/// call, or implicitly when dropped (normal scope exit and unwinding alike).
/// Subsequent `done` calls are no-ops.
///
/// The probe borrows the accumulator mutably for its whole lifetime, so the
/// sample it delivers can never race with other writers.
pub struct Probe<'a, C: Clock = Monotonic> {
    mark: &'a mut Mark,
    start: C::Instant,
    done: bool,
}

impl<'a, C: Clock> Probe<'a, C> {
    /// Open a probe against `mark`, capturing the current instant.
    pub fn new(mark: &'a mut Mark) -> Self {
        Self {
            mark,
            start: C::now(),
            done: false,
        }
    }

    /// Complete the measurement now instead of at scope exit.
    ///
    /// Idempotent: the first call merges the sample, every later call (and
    /// the eventual drop) does nothing.
    pub fn done(&mut self) {
        if self.done {
            return;
        }
        self.done = true;

        let elapsed = C::elapsed(self.start, C::now());
        self.mark.add(elapsed);
    }
}

impl<C: Clock> Drop for Probe<'_, C> {
    fn drop(&mut self) {
        self.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn mark_passes_return_value_through() {
        let (mark, text) = Bench::mark(|| String::from("Benchmark :)"));
        assert_eq!(text, "Benchmark :)");
        assert_eq!(mark.iterations(), 1);
    }

    #[test]
    fn mark_of_unit_callable_yields_only_timing() {
        let (mark, ()) = Bench::mark(|| {});
        assert_eq!(mark.iterations(), 1);
    }

    #[test]
    fn done_is_idempotent() {
        let mut mark = Mark::new();
        {
            let mut probe = Bench::probe(&mut mark);
            probe.done();
            probe.done();
            probe.done();
        }
        assert_eq!(mark.iterations(), 1);
    }

    #[test]
    fn implicit_completion_on_drop() {
        let mut mark = Mark::new();
        {
            let _probe = Bench::probe(&mut mark);
        }
        assert_eq!(mark.iterations(), 1);
    }

    #[test]
    fn explicit_done_excludes_trailing_work() {
        let mut mark = Mark::new();
        {
            let mut probe = Bench::probe(&mut mark);
            probe.done();
            // Anything after done() is outside the measurement.
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(mark.iterations(), 1);
        assert!(mark.total() < Duration::from_millis(20));
    }
}
