// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ProbabilityError;

/// Shared, adjustable failure probability for simulated requests.
///
/// Clones share one cell: a settings panel can hold one handle while the
/// [`MockNetwork`](crate::MockNetwork) reads another on every call. The value
/// is stored atomically, so handles may live on different threads.
#[derive(Clone, Debug)]
pub struct ErrorProbability {
    bits: Arc<AtomicU64>,
}

impl Default for ErrorProbability {
    /// One request in ten fails.
    fn default() -> Self {
        Self::from_valid(0.1)
    }
}

impl ErrorProbability {
    /// Creates a handle holding `p`.
    pub fn new(p: f64) -> Result<Self, ProbabilityError> {
        validate(p)?;
        Ok(Self::from_valid(p))
    }

    fn from_valid(p: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(p.to_bits())),
        }
    }

    /// Current probability in `[0, 1]`.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Replaces the probability for every handle sharing this cell.
    ///
    /// Values outside `[0, 1]` (including NaN) are rejected and leave the
    /// current value in place.
    pub fn set(&self, p: f64) -> Result<(), ProbabilityError> {
        validate(p)?;
        self.bits.store(p.to_bits(), Ordering::Release);
        Ok(())
    }
}

fn validate(p: f64) -> Result<(), ProbabilityError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ProbabilityError::OutOfRange(p))
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorProbability;
    use crate::error::ProbabilityError;

    #[test]
    fn clones_share_the_value() {
        let a = ErrorProbability::new(0.25).unwrap();
        let b = a.clone();
        b.set(0.75).unwrap();
        assert_eq!(a.get(), 0.75);
    }

    #[test]
    fn rejects_out_of_range() {
        let p = ErrorProbability::new(0.5).unwrap();
        assert_eq!(p.set(1.5), Err(ProbabilityError::OutOfRange(1.5)));
        assert!(p.set(-0.1).is_err());
        assert!(p.set(f64::NAN).is_err());
        assert_eq!(p.get(), 0.5);
        assert!(ErrorProbability::new(2.0).is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let p = ErrorProbability::default();
        assert_eq!(p.get(), 0.1);
        p.set(0.0).unwrap();
        assert_eq!(p.get(), 0.0);
        p.set(1.0).unwrap();
        assert_eq!(p.get(), 1.0);
    }
}
