//! Emitter configuration.
//!
//! These types mirror the JSON written by particle authoring tools, so a
//! saved effect can be loaded directly with [`EmitterConfig::from_json`].
//! Every field has a default; an empty object `{}` describes a point emitter
//! spawning one particle per wave.
//!
//! # Example
//!
//! ```
//! use plume::config::EmitterConfig;
//!
//! let config = EmitterConfig::from_json(r##"{
//!     "spawnType": "polygonalChain",
//!     "spawnPolygon": [{"x": 0, "y": 0}, {"x": 100, "y": 0}],
//!     "startRotation": {"min": 45, "max": 45},
//!     "alpha": {"start": 1, "end": 0},
//!     "color": {"list": [{"value": "#ff0000", "time": 0}, {"value": "0000ff", "time": 1}]}
//! }"##).unwrap();
//! assert_eq!(config.spawn_type, "polygonalChain");
//! ```

use crate::ease::EaseSegment;
use crate::error::Result;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A 2D point as written in configuration (`{"x": .., "y": ..}`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointConfig {
    pub x: f32,
    pub y: f32,
}

impl From<PointConfig> for Vec2 {
    fn from(p: PointConfig) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Inclusive `min..=max` range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: f32,
    pub max: f32,
}

impl RangeConfig {
    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }
}

/// `spawnRect`: top-left corner plus size, in emitter-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectConfig {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// `spawnCircle`: center, outer radius, and inner radius for rings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleConfig {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub r: f32,
    #[serde(default, rename = "minR")]
    pub min_r: f32,
}

/// `spawnPolygon`: the vertex data for a polygonal-chain emitter.
///
/// See [`PolygonalChain`](crate::chain::PolygonalChain) for how each form is
/// interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolygonConfig {
    /// One open chain.
    Chain(Vec<PointConfig>),
    /// Several open chains.
    Chains(Vec<Vec<PointConfig>>),
    /// One chain with an explicit closed flag.
    Polygon {
        points: Vec<PointConfig>,
        #[serde(default)]
        closed: bool,
    },
    /// A start point followed by line and curve segments.
    Path {
        start: PointConfig,
        segments: Vec<PathSegmentConfig>,
        #[serde(default)]
        closed: bool,
    },
}

/// One step of a [`PolygonConfig::Path`]. Each segment starts where the
/// previous one ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathSegmentConfig {
    Line {
        to: PointConfig,
    },
    Quadratic {
        control: PointConfig,
        to: PointConfig,
    },
    Cubic {
        control1: PointConfig,
        control2: PointConfig,
        to: PointConfig,
    },
}

/// One stop of a value list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStep<V> {
    pub value: V,
    /// Normalized particle age in `[0, 1]`.
    pub time: f32,
}

/// A property that changes over a particle's life.
///
/// Accepted forms: `{"list": [...], "isStepped": bool}`, `{"start", "end"}`,
/// or a bare constant. The first two take an optional `ease`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueList<V> {
    List {
        list: Vec<ValueStep<V>>,
        #[serde(default, rename = "isStepped")]
        is_stepped: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<Vec<EaseSegment>>,
    },
    StartEnd {
        start: V,
        end: V,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<Vec<EaseSegment>>,
    },
    Constant(V),
}

/// Full emitter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterConfig {
    /// Spawn shape tag: `point`, `rect`, `circle`, `ring`, `burst`,
    /// `polygonalChain`, or a name registered in a
    /// [`SpawnRegistry`](crate::spawn::SpawnRegistry).
    pub spawn_type: String,
    pub spawn_rect: Option<RectConfig>,
    pub spawn_circle: Option<CircleConfig>,
    pub spawn_polygon: Option<PolygonConfig>,
    pub particles_per_wave: u32,
    /// Burst only: degrees between consecutive particles of a wave.
    pub particle_spacing: f32,
    /// Burst only: rotation of the first particle of a wave.
    pub angle_start: f32,
    /// Initial particle facing, in degrees.
    pub start_rotation: RangeConfig,
    /// Spawn offset from the owner position.
    pub pos: PointConfig,
    /// Emitter rotation in degrees.
    pub rotation: f32,
    /// Particle lifetime in seconds.
    pub lifetime: RangeConfig,
    pub alpha: Option<ValueList<f32>>,
    pub scale: Option<ValueList<f32>>,
    pub speed: Option<ValueList<f32>>,
    pub color: Option<ValueList<String>>,
    /// When set, colors are baked into this many evenly spaced steps.
    pub color_steps: Option<u32>,
    pub blend_mode: Option<String>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            spawn_type: "point".to_string(),
            spawn_rect: None,
            spawn_circle: None,
            spawn_polygon: None,
            particles_per_wave: 1,
            particle_spacing: 0.0,
            angle_start: 0.0,
            start_rotation: RangeConfig::default(),
            pos: PointConfig::default(),
            rotation: 0.0,
            lifetime: RangeConfig::fixed(1.0),
            alpha: None,
            scale: None,
            speed: None,
            color: None,
            color_steps: None,
            blend_mode: None,
        }
    }
}

impl EmitterConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runtime options that are not part of an authored effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmitterOptions {
    /// Log recoverable fallbacks (unknown blend modes, bad colors).
    pub verbose: bool,
    /// Fixed RNG seed for reproducible emission.
    pub seed: Option<u64>,
}
