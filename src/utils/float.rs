//! Floating-point helpers for keyframe times.
//!
//! Times imported from different formats (e.g. 30 fps sampling) are rarely
//! bit-identical between insertion and query, so every time comparison in the
//! crate goes through [`equal`] instead of `==`.

/// Tolerance used when comparing two keyframe times or coordinates.
pub const TIME_EPSILON: f64 = 1e-6;

/// Returns `true` when `a` and `b` differ by at most [`TIME_EPSILON`].
#[inline]
#[must_use]
pub fn equal(a: f64, b: f64) -> bool {
    equal_with(a, b, TIME_EPSILON)
}

/// Same as [`equal`] with an explicit tolerance.
#[inline]
#[must_use]
pub fn equal_with(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Wraps `value` into `(0, period]` the way repeated subtraction of `period`
/// would, without looping once per period.
///
/// Values already `<= period` are returned unchanged. A period that is not
/// strictly positive cannot wrap anything and yields `period` (a clamp), as
/// do `+inf` and NaN values, which have no position within a period.
#[must_use]
pub fn wrap_periodic(value: f64, period: f64) -> f64 {
    if value <= period {
        return value;
    }
    if !value.is_finite() || period <= TIME_EPSILON {
        return period;
    }

    let cycles = (value / period).ceil() - 1.0;
    let mut wrapped = value - period * cycles;

    // Division rounding can land one period off on either side.
    if wrapped > period {
        wrapped -= period;
    }
    if wrapped <= 0.0 {
        wrapped += period;
    }
    wrapped
}
