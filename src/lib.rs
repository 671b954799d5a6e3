//! # stopmark
//!
//! Scoped micro-benchmarking primitives: measure the elapsed time of
//! arbitrary operations and accumulate statistics (total, min, max,
//! iteration count, average) across repeated invocations, directly from
//! application code and without external tooling.
//!
//! Three pieces fit together:
//! - [`Mark`] - an accumulator that folds timing samples with overflow-safe
//!   arithmetic
//! - [`Bench`] - a harness that measures a single call or hands out a scoped
//!   [`Probe`] for an arbitrary code region
//! - [`Clock`] - the timestamp capability the harness is generic over, with
//!   a wall-clock implementation ([`Monotonic`]) and a per-thread CPU-time
//!   implementation ([`ThreadCpu`], Linux only)
//!
//! ## Quick start
//!
//! ```
//! use stopmark::{Bench, Mark};
//!
//! // One-shot: measure a call, keep its return value.
//! let (mark, sum) = Bench::mark(|| (1..=100).sum::<u64>());
//! assert_eq!(sum, 5050);
//! assert_eq!(mark.iterations(), 1);
//!
//! // Scoped: every probe contributes exactly one sample, on every exit path.
//! let mut lookups = Mark::new();
//! for _ in 0..3 {
//!     let _probe = Bench::probe(&mut lookups);
//!     // ... measured region ...
//! }
//! assert_eq!(lookups.iterations(), 3);
//! println!("{lookups}");
//! ```
//!
//! ## Common pitfall: comparing accumulators
//!
//! `Mark` intentionally implements neither `PartialEq` nor `PartialOrd`.
//! Once aggregation is involved it is ambiguous whether a comparison should
//! apply to totals or averages. Convert to the unit you care about and
//! compare that instead:
//!
//! ```
//! # use stopmark::Mark;
//! # use std::time::Duration;
//! # let (a, b) = (Mark::from(Duration::from_micros(5)), Mark::new());
//! if a.average().as_nanos() > b.average().as_nanos() {
//!     // ...
//! }
//! ```
//!
//! ## Concurrency
//!
//! This is a passive, synchronous library: no threads, no schedulers, no
//! locking. An accumulator belongs to one counter site; a [`Probe`] borrows
//! it mutably, so the single-writer rule is enforced at compile time. To
//! merge from several threads, accumulate per thread and [`Mark::merge`] the
//! results, or wrap one `Mark` in a mutex yourself.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bench;
mod mark;

pub mod clock;

pub use bench::{Bench, GenericBench, Probe};
pub use clock::{Clock, Monotonic};
pub use mark::{Mark, OverflowHandler, Summary};

#[cfg(target_os = "linux")]
pub use clock::ThreadCpu;

/// Harness measuring per-thread CPU time instead of wall-clock time.
///
/// Check [`ThreadCpu::supported`] before relying on its readings.
#[cfg(target_os = "linux")]
pub type ThreadBench = GenericBench<ThreadCpu>;
