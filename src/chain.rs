//! Geometry chains for shape-based emission.
//!
//! A [`PolygonalChain`] is an ordered list of connected segments (straight
//! lines, quadratic or cubic curves). Its one job at runtime is
//! [`PolygonalChain::get_random_point`]: pick a point uniformly by arc
//! length, so a long edge receives proportionally more particles than a
//! short one.
//!
//! # Building
//!
//! Chains are built from [`PolygonConfig`], which accepts:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `[{x,y}, ...]` | one open chain through the vertices |
//! | `[[{x,y}, ...], ...]` | several open chains, sampled as one |
//! | `{points, closed}` | one chain, optionally closed back to its start |
//! | `{start, segments, closed}` | a path of line/curve segments |

use crate::config::{PathSegmentConfig, PointConfig, PolygonConfig};
use crate::error::ChainError;
use glam::Vec2;
use rand::Rng;

/// Number of straight pieces a curve is flattened into for arc-length lookup.
const CURVE_STEPS: usize = 16;

/// The geometric shape of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line { from: Vec2, to: Vec2 },
    Quadratic { from: Vec2, control: Vec2, to: Vec2 },
    Cubic { from: Vec2, control1: Vec2, control2: Vec2, to: Vec2 },
}

impl Curve {
    /// Point at curve parameter `t` in `[0, 1]`.
    pub fn at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        match *self {
            Curve::Line { from, to } => from.lerp(to, t),
            Curve::Quadratic { from, control, to } => {
                from * (u * u) + control * (2.0 * u * t) + to * (t * t)
            }
            Curve::Cubic { from, control1, control2, to } => {
                from * (u * u * u)
                    + control1 * (3.0 * u * u * t)
                    + control2 * (3.0 * u * t * t)
                    + to * (t * t * t)
            }
        }
    }

    pub fn start(&self) -> Vec2 {
        match *self {
            Curve::Line { from, .. } | Curve::Quadratic { from, .. } | Curve::Cubic { from, .. } => from,
        }
    }

    pub fn end(&self) -> Vec2 {
        match *self {
            Curve::Line { to, .. } | Curve::Quadratic { to, .. } | Curve::Cubic { to, .. } => to,
        }
    }
}

/// A curve together with its measured length.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    curve: Curve,
    length: f32,
    /// Cumulative length at `t = i / CURVE_STEPS`. Empty for lines.
    arc: Vec<f32>,
}

impl Segment {
    pub fn new(curve: Curve) -> Self {
        match curve {
            Curve::Line { from, to } => Self {
                curve,
                length: from.distance(to),
                arc: Vec::new(),
            },
            _ => {
                let mut arc = Vec::with_capacity(CURVE_STEPS + 1);
                let mut total = 0.0;
                let mut prev = curve.start();
                arc.push(0.0);
                for i in 1..=CURVE_STEPS {
                    let p = curve.at(i as f32 / CURVE_STEPS as f32);
                    total += prev.distance(p);
                    arc.push(total);
                    prev = p;
                }
                Self { curve, length: total, arc }
            }
        }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Point `distance` units along the segment, measured from its start.
    pub fn point_at_distance(&self, distance: f32) -> Vec2 {
        if self.length <= 0.0 {
            return self.curve.start();
        }
        if self.arc.is_empty() {
            return self.curve.at(distance / self.length);
        }
        let upper = self
            .arc
            .partition_point(|&len| len <= distance)
            .clamp(1, CURVE_STEPS);
        let (lo, hi) = (self.arc[upper - 1], self.arc[upper]);
        let local = if hi > lo { (distance - lo) / (hi - lo) } else { 0.0 };
        let t = ((upper - 1) as f32 + local) / CURVE_STEPS as f32;
        self.curve.at(t.clamp(0.0, 1.0))
    }
}

/// Connected segments sampled uniformly by arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonalChain {
    segments: Vec<Segment>,
    /// Running total of segment lengths, one entry per segment.
    counting_lengths: Vec<f32>,
    total_length: f32,
}

impl PolygonalChain {
    /// Build a chain from configuration.
    ///
    /// Every chain needs at least two vertices (or a start point plus one
    /// segment). Coincident vertices are allowed and give zero-length
    /// segments, which are never selected while any other segment has length.
    pub fn new(config: &PolygonConfig) -> Result<Self, ChainError> {
        let mut segments = Vec::new();
        match config {
            // `[]` is also what an empty list of chains looks like.
            PolygonConfig::Chain(points) if points.is_empty() => return Err(ChainError::Empty),
            PolygonConfig::Chain(points) => push_polyline(&mut segments, 0, points, false)?,
            PolygonConfig::Chains(chains) => {
                if chains.is_empty() {
                    return Err(ChainError::Empty);
                }
                for (i, chain) in chains.iter().enumerate() {
                    push_polyline(&mut segments, i, chain, false)?;
                }
            }
            PolygonConfig::Polygon { points, closed } => {
                push_polyline(&mut segments, 0, points, *closed)?
            }
            PolygonConfig::Path { start, segments: path, closed } => {
                if path.is_empty() {
                    return Err(ChainError::NotEnoughPoints { chain: 0, found: 1 });
                }
                let origin = Vec2::from(*start);
                let mut from = origin;
                for seg in path {
                    let curve = match *seg {
                        PathSegmentConfig::Line { to } => Curve::Line { from, to: to.into() },
                        PathSegmentConfig::Quadratic { control, to } => Curve::Quadratic {
                            from,
                            control: control.into(),
                            to: to.into(),
                        },
                        PathSegmentConfig::Cubic { control1, control2, to } => Curve::Cubic {
                            from,
                            control1: control1.into(),
                            control2: control2.into(),
                            to: to.into(),
                        },
                    };
                    from = curve.end();
                    segments.push(Segment::new(curve));
                }
                if *closed && from != origin {
                    segments.push(Segment::new(Curve::Line { from, to: origin }));
                }
            }
        }
        Ok(Self::from_segments(segments))
    }

    /// Build from already measured segments. `segments` must not be empty.
    fn from_segments(segments: Vec<Segment>) -> Self {
        let mut total_length = 0.0;
        let counting_lengths = segments
            .iter()
            .map(|s| {
                total_length += s.length();
                total_length
            })
            .collect();
        Self {
            segments,
            counting_lengths,
            total_length,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Write a random point on the chain into `out`, in the chain's own
    /// coordinates.
    ///
    /// A chain with zero total length always yields its first vertex.
    pub fn get_random_point<R: Rng + ?Sized>(&self, out: &mut Vec2, rng: &mut R) {
        if self.total_length <= 0.0 {
            *out = self.segments[0].curve().start();
            return;
        }
        let distance = rng.gen::<f32>() * self.total_length;
        let index = self
            .counting_lengths
            .partition_point(|&len| len <= distance)
            .min(self.segments.len() - 1);
        let before = if index == 0 { 0.0 } else { self.counting_lengths[index - 1] };
        *out = self.segments[index].point_at_distance(distance - before);
    }
}

fn push_polyline(
    segments: &mut Vec<Segment>,
    chain: usize,
    points: &[PointConfig],
    closed: bool,
) -> Result<(), ChainError> {
    if points.len() < 2 {
        return Err(ChainError::NotEnoughPoints {
            chain,
            found: points.len(),
        });
    }
    let mut from = Vec2::from(points[0]);
    for &p in &points[1..] {
        let to = Vec2::from(p);
        segments.push(Segment::new(Curve::Line { from, to }));
        from = to;
    }
    let first = Vec2::from(points[0]);
    if closed && from != first {
        segments.push(Segment::new(Curve::Line { from, to: first }));
    }
    Ok(())
}
