//! Exposure Engine - bracket planning for HDR bursts
//!
//! The camera reports exposure compensation as an integer index range. A burst
//! is captured at under / base / over indices clamped into that range.

use crate::error::{ImagingError, Result};

/// Default EV index distance of the under/over frames from the base frame
pub const DEFAULT_BRACKET_SPREAD: i32 = 2;

/// Device exposure-compensation index range (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureRange {
    pub lower: i32,
    pub upper: i32,
}

impl ExposureRange {
    pub fn new(lower: i32, upper: i32) -> Result<Self> {
        if lower > upper {
            return Err(ImagingError::InvalidRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn clamp(&self, steps: i32) -> i32 {
        self.lower.max(self.upper.min(steps))
    }
}

/// Clamp a requested EV index; without a known range everything maps to 0
pub fn clamp_exposure(range: Option<&ExposureRange>, steps: i32) -> i32 {
    match range {
        Some(range) => range.clamp(steps),
        None => 0,
    }
}

/// EV indices of a three-frame burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPlan {
    pub under: i32,
    pub base: i32,
    pub over: i32,
}

impl BracketPlan {
    pub fn for_range(range: Option<&ExposureRange>) -> Self {
        Self::with_spread(range, DEFAULT_BRACKET_SPREAD)
    }

    pub fn with_spread(range: Option<&ExposureRange>, spread: i32) -> Self {
        let spread = spread.saturating_abs();
        Self {
            under: clamp_exposure(range, spread.saturating_neg()),
            base: clamp_exposure(range, 0),
            over: clamp_exposure(range, spread),
        }
    }

    /// Indices in capture order; the caller restores `base` afterwards
    pub fn steps(&self) -> [i32; 3] {
        [self.under, self.base, self.over]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_without_range() {
        assert_eq!(clamp_exposure(None, -2), 0);
        assert_eq!(clamp_exposure(None, 5), 0);
    }

    #[test]
    fn test_clamp_inside_and_outside_range() {
        let range = ExposureRange::new(-1, 3).unwrap();
        assert_eq!(range.clamp(-2), -1);
        assert_eq!(range.clamp(2), 2);
        assert_eq!(range.clamp(7), 3);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            ExposureRange::new(2, -2),
            Err(ImagingError::InvalidRange { lower: 2, upper: -2 })
        ));
    }

    #[test]
    fn test_bracket_plan() {
        let range = ExposureRange::new(-1, 3).unwrap();
        let plan = BracketPlan::for_range(Some(&range));
        assert_eq!(plan.steps(), [-1, 0, 2]);

        let wide = ExposureRange::new(-12, 12).unwrap();
        assert_eq!(BracketPlan::for_range(Some(&wide)).steps(), [-2, 0, 2]);
        assert_eq!(BracketPlan::with_spread(Some(&wide), -4).steps(), [-4, 0, 4]);

        assert_eq!(BracketPlan::for_range(None).steps(), [0, 0, 0]);
    }

    #[test]
    fn test_base_clamped_when_range_excludes_zero() {
        let range = ExposureRange::new(1, 4).unwrap();
        assert_eq!(BracketPlan::for_range(Some(&range)).steps(), [1, 1, 2]);
    }
}
