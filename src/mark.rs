//! Elapsed-time accumulator with overflow-safe arithmetic.
//!
//! A [`Mark`] folds zero or more timing samples into running statistics:
//! total, minimum, maximum and iteration count. Samples arrive either as raw
//! [`Duration`]s or as the aggregate state of another `Mark`, and both paths
//! go through one merge rule so the statistics stay consistent regardless of
//! how measurements are combined.
//!
//! # Overflow policy
//!
//! The running total lives in a [`Duration`], so wrapping it takes an
//! accumulated total beyond anything a profiler will ever see. When it does
//! happen, the accumulator resets total and iteration count to the incoming
//! sample and keeps going: a deliberate best-effort trade of perfect
//! accounting for a simple non-fallible hot path. The discarded state is
//! observable through an optional handler registered at construction, and
//! min/max tracking is never affected by the reset. Extensions that need
//! lossless accounting should treat this as a quirk to design around, not a
//! bug to fix in place.

use std::fmt;
use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handler invoked with the pre-reset accumulator when the running total
/// would overflow. Side-effect-only (logging, metrics): the reset itself is
/// not overridable.
pub type OverflowHandler = Arc<dyn Fn(&Mark) + Send + Sync>;

/// Running statistics over zero or more elapsed-time samples.
///
/// Created empty (or seeded with one sample via `From<Duration>`), mutated
/// by [`add`](Self::add), [`merge`](Self::merge) and [`clear`](Self::clear),
/// and read through unit readouts and the derived views
/// [`average`](Self::average), [`minimal`](Self::minimal) and
/// [`maximal`](Self::maximal).
///
/// `Mark` deliberately implements neither `PartialEq` nor `PartialOrd`:
/// once aggregation is involved, comparison is ambiguous between totals and
/// averages. Convert to the unit you care about and compare that.
#[derive(Clone)]
pub struct Mark {
    min: Duration,
    max: Duration,
    total: Duration,
    iterations: u64,
    overflow_handler: Option<OverflowHandler>,
}

impl Mark {
    // Sentinels of the empty state. iterations == 0 is the authoritative
    // emptiness check; the sentinels never leak through the public API.
    const EMPTY_MIN: Duration = Duration::MAX;
    const EMPTY_MAX: Duration = Duration::ZERO;

    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            min: Self::EMPTY_MIN,
            max: Self::EMPTY_MAX,
            total: Duration::ZERO,
            iterations: 0,
            overflow_handler: None,
        }
    }

    /// Create an empty accumulator with an overflow handler.
    ///
    /// The handler runs synchronously, immediately before an overflow reset,
    /// with the accumulator still holding its pre-reset state.
    ///
    /// ```
    /// use stopmark::Mark;
    ///
    /// let mut mark = Mark::with_overflow_handler(|pre_reset| {
    ///     tracing::warn!("discarding {} iterations", pre_reset.iterations());
    /// });
    /// # mark.add(std::time::Duration::from_nanos(1));
    /// ```
    pub fn with_overflow_handler<F>(handler: F) -> Self
    where
        F: Fn(&Mark) + Send + Sync + 'static,
    {
        Self {
            overflow_handler: Some(Arc::new(handler)),
            ..Self::new()
        }
    }

    /// Merge a single elapsed-time sample.
    pub fn add(&mut self, duration: Duration) {
        self.fold(1, duration, duration, duration);
    }

    /// Merge another accumulator's aggregate state into this one.
    ///
    /// Equivalent to replaying every sample `other` has seen: iteration
    /// counts and totals combine, min/max take the extrema of both sides.
    pub fn merge(&mut self, other: &Mark) {
        self.fold(other.iterations, other.total, other.max, other.min);
    }

    /// Reset to the empty state, discarding min/max history as well.
    pub fn clear(&mut self) {
        self.min = Self::EMPTY_MIN;
        self.max = Self::EMPTY_MAX;
        self.total = Duration::ZERO;
        self.iterations = 0;
    }

    /// The merge rule both [`add`](Self::add) and [`merge`](Self::merge)
    /// reduce to.
    ///
    /// Overflow of the running total triggers the reset policy described in
    /// the module docs; min/max tracking happens on both branches.
    fn fold(&mut self, iterations: u64, total: Duration, max: Duration, min: Duration) {
        match self.total.checked_add(total) {
            Some(sum) => {
                self.total = sum;
                self.iterations += iterations;
            }
            None => {
                tracing::warn!(
                    discarded_iterations = self.iterations,
                    discarded_total_secs = self.total.as_secs(),
                    "accumulated total overflowed; resetting to incoming sample"
                );
                if let Some(handler) = &self.overflow_handler {
                    handler(self);
                }
                self.total = total;
                self.iterations = iterations;
            }
        }

        self.max = self.max.max(max);
        self.min = self.min.min(min);
    }

    /// Number of samples folded into the total since the last reset.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Accumulated total since the last reset.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Mean sample as a single-sample accumulator, truncated to whole
    /// nanoseconds. Empty when no samples have been merged.
    pub fn average(&self) -> Mark {
        if self.iterations == 0 {
            return Mark::new();
        }
        let nanos = self.total.as_nanos() / u128::from(self.iterations);
        Mark::from(duration_from_nanos(nanos))
    }

    /// Smallest individual sample ever merged, as a single-sample
    /// accumulator. Empty when no samples have been merged.
    ///
    /// Survives overflow resets; only [`clear`](Self::clear) discards it.
    pub fn minimal(&self) -> Mark {
        if self.iterations == 0 {
            return Mark::new();
        }
        Mark::from(self.min)
    }

    /// Largest individual sample ever merged, as a single-sample
    /// accumulator. Empty when no samples have been merged.
    ///
    /// Survives overflow resets; only [`clear`](Self::clear) discards it.
    pub fn maximal(&self) -> Mark {
        if self.iterations == 0 {
            return Mark::new();
        }
        Mark::from(self.max)
    }

    /// Total in whole nanoseconds.
    pub fn as_nanos(&self) -> u128 {
        self.total.as_nanos()
    }

    /// Total in whole microseconds, truncated.
    pub fn as_micros(&self) -> u128 {
        self.total.as_micros()
    }

    /// Total in whole milliseconds, truncated.
    pub fn as_millis(&self) -> u128 {
        self.total.as_millis()
    }

    /// Total in whole seconds, truncated.
    pub fn as_secs(&self) -> u64 {
        self.total.as_secs()
    }

    /// Total in whole minutes, truncated.
    pub fn as_minutes(&self) -> u64 {
        self.total.as_secs() / 60
    }

    /// Total in whole hours, truncated.
    pub fn as_hours(&self) -> u64 {
        self.total.as_secs() / 3600
    }

    /// Plain-data snapshot of the current statistics, suitable for
    /// serialization. Min/max/average are `None` for an empty accumulator.
    pub fn summary(&self) -> Summary {
        let nonempty = self.iterations > 0;
        Summary {
            iterations: self.iterations,
            total_ns: self.total.as_nanos(),
            min_ns: nonempty.then(|| self.min.as_nanos()),
            max_ns: nonempty.then(|| self.max.as_nanos()),
            average_ns: nonempty.then(|| self.total.as_nanos() / u128::from(self.iterations)),
        }
    }
}

impl Default for Mark {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Duration> for Mark {
    /// Accumulator seeded with one sample.
    fn from(duration: Duration) -> Self {
        let mut mark = Mark::new();
        mark.add(duration);
        mark
    }
}

impl AddAssign<Duration> for Mark {
    fn add_assign(&mut self, duration: Duration) {
        self.add(duration);
    }
}

impl AddAssign<&Mark> for Mark {
    fn add_assign(&mut self, other: &Mark) {
        self.merge(other);
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total of {}ns after {} iterations",
            self.total.as_nanos(),
            self.iterations
        )
    }
}

impl fmt::Debug for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mark")
            .field("iterations", &self.iterations)
            .field("total", &self.total)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("overflow_handler", &self.overflow_handler.is_some())
            .finish()
    }
}

/// Serializable snapshot of a [`Mark`], produced by [`Mark::summary`].
///
/// All values are whole nanoseconds; `min_ns`, `max_ns` and `average_ns`
/// are absent when the accumulator was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of samples folded into the total.
    pub iterations: u64,
    /// Accumulated total in nanoseconds.
    pub total_ns: u128,
    /// Smallest individual sample in nanoseconds.
    pub min_ns: Option<u128>,
    /// Largest individual sample in nanoseconds.
    pub max_ns: Option<u128>,
    /// Truncated mean sample in nanoseconds.
    pub average_ns: Option<u128>,
}

/// Rebuild a `Duration` from a nanosecond count wider than `u64`.
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    Duration::new(
        (nanos / NANOS_PER_SEC) as u64,
        (nanos % NANOS_PER_SEC) as u32,
    )
}
