//! Custom ease curves.
//!
//! Curves come from an external curve editor as a list of segments, each a
//! quadratic Bezier in value space (`s` start, `cp` control, `e` end). The
//! segments split `[0, 1]` into equal-width time slices.
//!
//! # Example
//!
//! ```
//! use plume::ease::{generate_ease, EaseSegment};
//!
//! let ease = generate_ease(vec![EaseSegment { s: 0.0, cp: 0.5, e: 1.0 }]);
//! assert_eq!(ease.eval(0.0), 0.0);
//! assert_eq!(ease.eval(0.5), 0.5);
//! assert_eq!(ease.eval(1.0), 1.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One authored curve segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EaseSegment {
    /// Value at the start of the slice.
    pub s: f32,
    /// Control value.
    pub cp: f32,
    /// Value at the end of the slice.
    pub e: f32,
}

/// A compiled ease curve.
///
/// Immutable after construction; cloning shares the segment table.
#[derive(Clone, PartialEq)]
pub struct Ease {
    segments: Arc<[EaseSegment]>,
}

/// Build an ease function from authored segments.
///
/// Segments are used verbatim; no monotonicity or range checks are made.
pub fn generate_ease(segments: impl Into<Arc<[EaseSegment]>>) -> Ease {
    Ease {
        segments: segments.into(),
    }
}

impl Ease {
    /// Evaluate the curve at `time` in `[0, 1]`.
    ///
    /// The covering segment is `floor(qty * time)`; at `time == 1` that index
    /// equals `qty`, so it falls back to the last segment, which is then
    /// evaluated at its end (`t == 1`).
    pub fn eval(&self, time: f32) -> f32 {
        let qty = self.segments.len();
        if qty == 0 {
            return 0.0;
        }
        let qty_f = qty as f32;
        let index = ((qty_f * time) as usize).min(qty - 1);
        let seg = &self.segments[index];
        let t = (time - index as f32 / qty_f) * qty_f;
        seg.s + t * (2.0 * (1.0 - t) * (seg.cp - seg.s) + t * (seg.e - seg.s))
    }

    pub fn segments(&self) -> &[EaseSegment] {
        &self.segments
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ease")
            .field("segments", &self.segments.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(s: f32, cp: f32, e: f32) -> EaseSegment {
        EaseSegment { s, cp, e }
    }

    #[test]
    fn test_symmetric_single_segment() {
        let ease = generate_ease(vec![seg(0.0, 0.5, 1.0)]);
        assert_eq!(ease.eval(0.0), 0.0);
        assert_eq!(ease.eval(0.5), 0.5);
        assert_eq!(ease.eval(1.0), 1.0);
    }

    #[test]
    fn test_end_of_curve_uses_last_segment() {
        let ease = generate_ease(vec![seg(0.0, 0.0, 0.25), seg(0.25, 0.5, 0.75), seg(0.75, 0.9, 1.0)]);
        assert!((ease.eval(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_selection() {
        let ease = generate_ease(vec![seg(0.0, 0.0, 0.0), seg(10.0, 10.0, 10.0)]);
        assert_eq!(ease.eval(0.25), 0.0);
        assert_eq!(ease.eval(0.5), 10.0);
        assert_eq!(ease.eval(0.75), 10.0);
    }

    #[test]
    fn test_ease_in_shape() {
        // Control at the start gives a slow-in curve.
        let ease = generate_ease(vec![seg(0.0, 0.0, 1.0)]);
        assert!(ease.eval(0.25) < 0.25);
        assert!((ease.eval(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_empty_curve() {
        let ease = generate_ease(Vec::<EaseSegment>::new());
        assert_eq!(ease.eval(0.3), 0.0);
    }

    #[test]
    fn test_ease_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ease>();
    }
}
