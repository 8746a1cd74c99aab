//! Point-or-interval values with outward-rounded arithmetic.
//!
//! Every device and circuit evaluation in this crate accepts a [`Value`],
//! which is either an exact scalar or a closed interval. Arithmetic on
//! scalars is plain floating point. As soon as one operand is an interval the
//! result is an [`Interval`] whose bounds are rounded outward whenever the
//! floating-point operation was inexact, so the result always encloses the
//! real-valued result.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{PruneError, Result};

/// A closed interval `[lo, hi]` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// Create an interval. Bounds must satisfy `lo <= hi`.
    pub fn new(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi, "interval bounds out of order: [{lo}, {hi}]");
        Self { lo, hi }
    }

    /// Create an interval, rejecting out-of-order or NaN bounds.
    pub fn try_new(lo: f64, hi: f64) -> Result<Self> {
        if lo <= hi {
            Ok(Self { lo, hi })
        } else {
            Err(PruneError::InvalidInterval { lo, hi })
        }
    }

    /// Bounds as given, skipping the order check.
    #[cfg(test)]
    pub(crate) fn unchecked(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Degenerate interval `[x, x]`.
    pub fn point(x: f64) -> Self {
        Self { lo: x, hi: x }
    }

    /// Lower bound.
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper bound.
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Width `hi - lo`.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    /// Check whether `x` lies in the interval.
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }

    /// Check whether `other` is a subset of this interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    /// Smallest interval containing both operands.
    pub fn hull(&self, other: &Interval) -> Self {
        Self::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    /// Widen both bounds outward by `pad`.
    pub fn pad(&self, pad: f64) -> Self {
        Self::new(round_add(self.lo, -pad).0, round_add(self.hi, pad).1)
    }

    /// Clamp both bounds from below: `[max(lo, floor), max(hi, floor)]`.
    pub fn max_with(&self, floor: f64) -> Self {
        Self::new(self.lo.max(floor), self.hi.max(floor))
    }

    /// Multiply by a scalar.
    pub fn scale(&self, k: f64) -> Self {
        *self * Interval::point(k)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        Interval::new(round_add(self.lo, rhs.lo).0, round_add(self.hi, rhs.hi).1)
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval::new(-self.hi, -self.lo)
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        let products = [
            round_mul(self.lo, rhs.lo),
            round_mul(self.lo, rhs.hi),
            round_mul(self.hi, rhs.lo),
            round_mul(self.hi, rhs.hi),
        ];
        let lo = products.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let hi = products.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        Interval::new(lo, hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// A node voltage, current or derivative: exact or interval-valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Exactly known value
    Scalar(f64),
    /// Value known to lie in a closed interval
    Interval(Interval),
}

impl Value {
    /// Interval-valued constructor. Bounds must satisfy `lo <= hi`.
    pub fn interval(lo: f64, hi: f64) -> Self {
        Value::Interval(Interval::new(lo, hi))
    }

    /// True for the interval variant, even when it is degenerate.
    pub fn is_interval(&self) -> bool {
        matches!(self, Value::Interval(_))
    }

    /// Lower bound (the value itself for scalars).
    pub fn lo(&self) -> f64 {
        match self {
            Value::Scalar(x) => *x,
            Value::Interval(i) => i.lo(),
        }
    }

    /// Upper bound (the value itself for scalars).
    pub fn hi(&self) -> f64 {
        match self {
            Value::Scalar(x) => *x,
            Value::Interval(i) => i.hi(),
        }
    }

    /// Scalar payload, if any.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Interval(_) => None,
        }
    }

    /// View as an interval; scalars become degenerate intervals.
    pub fn to_interval(&self) -> Interval {
        match self {
            Value::Scalar(x) => Interval::point(*x),
            Value::Interval(i) => *i,
        }
    }

    /// Check whether `x` is admitted by this value.
    pub fn contains(&self, x: f64) -> bool {
        match self {
            Value::Scalar(v) => *v == x,
            Value::Interval(i) => i.contains(x),
        }
    }

    /// Smallest value containing both operands.
    pub fn hull(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) if a == b => Value::Scalar(*a),
            _ => Value::Interval(self.to_interval().hull(&other.to_interval())),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Interval> for Value {
    fn from(i: Interval) -> Self {
        Value::Interval(i)
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a + b),
            (a, b) => Value::Interval(a.to_interval() + b.to_interval()),
        }
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a - b),
            (a, b) => Value::Interval(a.to_interval() - b.to_interval()),
        }
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a * b),
            (a, b) => Value::Interval(a.to_interval() * b.to_interval()),
        }
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Value::Scalar(a) => Value::Scalar(-a),
            Value::Interval(i) => Value::Interval(-i),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{x}"),
            Value::Interval(i) => write!(f, "{i}"),
        }
    }
}

/// Largest float strictly below `x`.
pub(crate) fn next_down(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

/// Smallest float strictly above `x`.
pub(crate) fn next_up(x: f64) -> f64 {
    -next_down(-x)
}

/// `a + b` rounded toward -inf and +inf. Exact sums return the same value twice.
fn round_add(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    if !s.is_finite() {
        return (s, s);
    }
    // TwoSum: err is the exact rounding error of s.
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    direct(s, err)
}

/// `a * b` rounded toward -inf and +inf.
fn round_mul(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    if !p.is_finite() {
        return (p, p);
    }
    let err = a.mul_add(b, -p);
    direct(p, err)
}

fn direct(v: f64, err: f64) -> (f64, f64) {
    if err < 0.0 {
        (next_down(v), v)
    } else if err > 0.0 {
        (v, next_up(v))
    } else {
        (v, v)
    }
}
