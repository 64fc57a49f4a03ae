//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Creates a new interval.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Restricts a value to the interval. NaN maps to `max`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.max
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }

    pub fn inv_lerp(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Returns `count` evenly spaced values from `min` to `max` inclusive.
    /// Fewer than two values yields just the two end points.
    pub fn linspace(self, count: usize) -> impl Iterator<Item = f64> {
        let count = count.max(2);
        let last = (count - 1) as f64;
        (0..count).map(move |i| {
            if i + 1 == count {
                self.max
            } else {
                self.lerp(i as f64 / last)
            }
        })
    }
}

impl Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}
