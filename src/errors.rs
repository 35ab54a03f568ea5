//! Precondition failures surfaced by the sampler and the evaluator.
//!
//! Everything here is a synchronous, caller-side mistake: a degenerate
//! region, a zero density, a meaningless threshold.  There is nothing
//! to retry and nothing is recovered internally.  Orbit overflow is
//! deliberately *not* an error; an overflowed orbit is clamped and the
//! cell simply counts as escaped.

use failure::Fail;

/// The error type shared by every fallible operation in this crate.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The requested sampling region has zero or inverted extent, or a
    /// view conversion was given an unusable scale.
    #[fail(display = "invalid region: {}", _0)]
    InvalidRegion(String),

    /// A numeric argument fails its precondition before any
    /// computation begins: zero density, a non-positive or non-finite
    /// threshold, a zero worker count.
    #[fail(display = "invalid parameters: {}", _0)]
    InvalidParameters(String),
}
