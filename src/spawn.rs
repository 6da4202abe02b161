//! Spawn strategies: where a new particle starts and which way it faces.
//!
//! Each emission shape is a [`SpawnStrategy`] with two operations:
//!
//! - [`parse_config`](SpawnStrategy::parse_config) turns the shape's block of
//!   an [`EmitterConfig`] into strategy state, rejecting degenerate shapes.
//! - [`spawn`](SpawnStrategy::spawn) writes a particle's initial rotation and
//!   world position.
//!
//! # Built-in shapes
//!
//! | Tag | Strategy | Config block |
//! |-----|----------|--------------|
//! | `point` | [`PointSpawn`] | - |
//! | `rect` | [`RectSpawn`] | `spawnRect` (zero height gives a line) |
//! | `circle` | [`CircleSpawn`] | `spawnCircle` |
//! | `ring` | [`RingSpawn`] | `spawnCircle` with `minR` |
//! | `burst` | [`BurstSpawn`] | `particleSpacing`, `angleStart` |
//! | `polygonalChain` | [`PolygonalChainSpawn`] | `spawnPolygon` |
//!
//! New shapes implement [`SpawnStrategy`] and are registered by name in a
//! [`SpawnRegistry`]; the emitter never needs to know about them.
//!
//! # Scratch points
//!
//! Every `spawn` works on a stack-local [`Vec2`]. Emission is single-threaded
//! and sequential, and a `Vec2` is two floats, so there is no shared scratch
//! buffer to guard.

use crate::chain::PolygonalChain;
use crate::config::{CircleConfig, EmitterConfig, RectConfig};
use crate::emitter::EmissionSettings;
use crate::error::{ConfigError, Result};
use crate::math::rotate_point;
use crate::particle::Particle;
use glam::Vec2;
use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::fmt;

/// The shape tag an emitter stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpawnType {
    Point,
    Rect,
    Circle,
    Ring,
    Burst,
    PolygonalChain,
    /// A shape supplied through a [`SpawnRegistry`].
    Custom(String),
}

impl SpawnType {
    /// Map a configuration tag to a spawn type. Unknown names become
    /// [`SpawnType::Custom`].
    pub fn from_name(name: &str) -> SpawnType {
        match name {
            "point" => SpawnType::Point,
            "rect" => SpawnType::Rect,
            "circle" => SpawnType::Circle,
            "ring" => SpawnType::Ring,
            "burst" => SpawnType::Burst,
            "polygonalChain" => SpawnType::PolygonalChain,
            other => SpawnType::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SpawnType::Point => "point",
            SpawnType::Rect => "rect",
            SpawnType::Circle => "circle",
            SpawnType::Ring => "ring",
            SpawnType::Burst => "burst",
            SpawnType::PolygonalChain => "polygonalChain",
            SpawnType::Custom(name) => name,
        }
    }
}

impl fmt::Display for SpawnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The contract every emission shape satisfies.
///
/// `index` is the particle's position within the current wave. Most shapes
/// ignore it; it is always passed so shapes that lay particles out evenly
/// (like [`BurstSpawn`]) work through the same call.
pub trait SpawnStrategy: fmt::Debug + Send + Sync {
    /// Build the strategy from configuration.
    ///
    /// Called again whenever the configuration changes; the result replaces
    /// the previous strategy entirely.
    fn parse_config(config: &EmitterConfig) -> Result<Self>
    where
        Self: Sized;

    fn spawn_type(&self) -> SpawnType;

    /// Write `particle.rotation` and `particle.position`.
    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        index: u32,
        rng: &mut dyn RngCore,
    );
}

/// Initial facing shared by the positional shapes.
///
/// Equal bounds are compared exactly and give a fixed angle; otherwise the
/// angle is uniform in `[min, max]`. Both are offset by the emitter rotation.
pub fn start_rotation(settings: &EmissionSettings, rng: &mut dyn RngCore) -> f32 {
    let (min, max) = (settings.min_start_rotation, settings.max_start_rotation);
    if min == max {
        min + settings.rotation
    } else {
        rng.gen::<f32>() * (max - min) + min + settings.rotation
    }
}

/// Move a shape-local point into world space: rotate by the emitter
/// rotation, then translate to the emission origin.
#[inline]
fn place(settings: &EmissionSettings, mut local: Vec2, emit_x: f32, emit_y: f32) -> Vec2 {
    rotate_point(settings.rotation, &mut local);
    Vec2::new(local.x + emit_x, local.y + emit_y)
}

fn degenerate(spawn_type: SpawnType, reason: impl Into<String>) -> ConfigError {
    ConfigError::DegenerateShape {
        spawn_type: spawn_type.name().to_string(),
        reason: reason.into(),
    }
}

// ========== Point ==========

/// Every particle starts exactly at the emission origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointSpawn;

impl SpawnStrategy for PointSpawn {
    fn parse_config(_config: &EmitterConfig) -> Result<Self> {
        Ok(PointSpawn)
    }

    fn spawn_type(&self) -> SpawnType {
        SpawnType::Point
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        _index: u32,
        rng: &mut dyn RngCore,
    ) {
        particle.rotation = start_rotation(settings, rng);
        particle.position = Vec2::new(emit_x, emit_y);
    }
}

// ========== Rect ==========

/// Uniform inside an axis-aligned rectangle (in emitter space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSpawn {
    pub rect: RectConfig,
}

impl SpawnStrategy for RectSpawn {
    fn parse_config(config: &EmitterConfig) -> Result<Self> {
        let rect = config.spawn_rect.ok_or_else(|| ConfigError::MissingShape {
            spawn_type: config.spawn_type.clone(),
            field: "spawnRect",
        })?;
        if !(rect.w.is_finite() && rect.h.is_finite()) {
            return Err(degenerate(SpawnType::Rect, "width and height must be finite"));
        }
        Ok(Self { rect })
    }

    fn spawn_type(&self) -> SpawnType {
        SpawnType::Rect
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        _index: u32,
        rng: &mut dyn RngCore,
    ) {
        particle.rotation = start_rotation(settings, rng);
        let local = Vec2::new(
            rng.gen::<f32>() * self.rect.w + self.rect.x,
            rng.gen::<f32>() * self.rect.h + self.rect.y,
        );
        particle.position = place(settings, local, emit_x, emit_y);
    }
}

// ========== Circle / Ring ==========

/// Random point in a disc: random radius in `[0, r)`, random angle.
///
/// The radius is drawn linearly, so particles cluster towards the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSpawn {
    pub circle: CircleConfig,
}

fn circle_block(config: &EmitterConfig) -> Result<CircleConfig> {
    config.spawn_circle.ok_or_else(|| ConfigError::MissingShape {
        spawn_type: config.spawn_type.clone(),
        field: "spawnCircle",
    })
}

/// Point at `radius` from the circle's center, at a random angle.
fn on_circle(circle: &CircleConfig, radius: f32, rng: &mut dyn RngCore) -> Vec2 {
    let mut p = Vec2::new(radius, 0.0);
    rotate_point(rng.gen::<f32>() * 360.0, &mut p);
    p.x += circle.x;
    p.y += circle.y;
    p
}

impl SpawnStrategy for CircleSpawn {
    fn parse_config(config: &EmitterConfig) -> Result<Self> {
        let circle = circle_block(config)?;
        if !(circle.r >= 0.0) {
            return Err(degenerate(SpawnType::Circle, format!("radius {} is negative", circle.r)));
        }
        Ok(Self { circle })
    }

    fn spawn_type(&self) -> SpawnType {
        SpawnType::Circle
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        _index: u32,
        rng: &mut dyn RngCore,
    ) {
        particle.rotation = start_rotation(settings, rng);
        let radius = rng.gen::<f32>() * self.circle.r;
        let local = on_circle(&self.circle, radius, rng);
        particle.position = place(settings, local, emit_x, emit_y);
    }
}

/// Random point in an annulus between `minR` and `r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpawn {
    pub circle: CircleConfig,
}

impl SpawnStrategy for RingSpawn {
    fn parse_config(config: &EmitterConfig) -> Result<Self> {
        let circle = circle_block(config)?;
        if !(circle.min_r >= 0.0 && circle.min_r <= circle.r) {
            return Err(degenerate(
                SpawnType::Ring,
                format!("inner radius {} must be within [0, {}]", circle.min_r, circle.r),
            ));
        }
        Ok(Self { circle })
    }

    fn spawn_type(&self) -> SpawnType {
        SpawnType::Ring
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        _index: u32,
        rng: &mut dyn RngCore,
    ) {
        particle.rotation = start_rotation(settings, rng);
        let CircleConfig { r, min_r, .. } = self.circle;
        let radius = if min_r == r {
            r
        } else {
            rng.gen::<f32>() * (r - min_r) + min_r
        };
        let local = on_circle(&self.circle, radius, rng);
        particle.position = place(settings, local, emit_x, emit_y);
    }
}

// ========== Burst ==========

/// All particles start at the origin, fanned out by rotation.
///
/// With a non-zero `spacing`, particle `i` of a wave faces
/// `angle_start + spacing * i` (plus the emitter rotation). With zero spacing
/// each particle gets a random facing in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstSpawn {
    pub spacing: f32,
    pub angle_start: f32,
}

impl SpawnStrategy for BurstSpawn {
    fn parse_config(config: &EmitterConfig) -> Result<Self> {
        Ok(Self {
            spacing: config.particle_spacing,
            angle_start: config.angle_start,
        })
    }

    fn spawn_type(&self) -> SpawnType {
        SpawnType::Burst
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        index: u32,
        rng: &mut dyn RngCore,
    ) {
        particle.rotation = if self.spacing == 0.0 {
            rng.gen::<f32>() * 360.0
        } else {
            self.angle_start + self.spacing * index as f32 + settings.rotation
        };
        particle.position = Vec2::new(emit_x, emit_y);
    }
}

// ========== Polygonal chain ==========

/// Uniform by arc length along a [`PolygonalChain`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonalChainSpawn {
    pub chain: PolygonalChain,
}

impl SpawnStrategy for PolygonalChainSpawn {
    fn parse_config(config: &EmitterConfig) -> Result<Self> {
        let polygon = config.spawn_polygon.as_ref().ok_or_else(|| ConfigError::MissingShape {
            spawn_type: config.spawn_type.clone(),
            field: "spawnPolygon",
        })?;
        let chain = PolygonalChain::new(polygon)?;
        if !(chain.total_length() > 0.0) {
            return Err(degenerate(SpawnType::PolygonalChain, "chain has zero total length"));
        }
        Ok(Self { chain })
    }

    fn spawn_type(&self) -> SpawnType {
        SpawnType::PolygonalChain
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        _index: u32,
        rng: &mut dyn RngCore,
    ) {
        particle.rotation = start_rotation(settings, rng);
        let mut local = Vec2::ZERO;
        self.chain.get_random_point(&mut local, rng);
        particle.position = place(settings, local, emit_x, emit_y);
    }
}

// ========== Dispatch ==========

/// The active shape of an emitter. The variant is the emitter's spawn tag.
#[derive(Debug)]
pub enum SpawnShape {
    Point(PointSpawn),
    Rect(RectSpawn),
    Circle(CircleSpawn),
    Ring(RingSpawn),
    Burst(BurstSpawn),
    PolygonalChain(PolygonalChainSpawn),
    Custom(Box<dyn SpawnStrategy>),
}

impl Default for SpawnShape {
    fn default() -> Self {
        SpawnShape::Point(PointSpawn)
    }
}

impl SpawnStrategy for SpawnShape {
    /// Parse with the built-in shapes only.
    fn parse_config(config: &EmitterConfig) -> Result<Self> {
        SpawnRegistry::new().parse(config)
    }

    fn spawn_type(&self) -> SpawnType {
        match self {
            SpawnShape::Point(s) => s.spawn_type(),
            SpawnShape::Rect(s) => s.spawn_type(),
            SpawnShape::Circle(s) => s.spawn_type(),
            SpawnShape::Ring(s) => s.spawn_type(),
            SpawnShape::Burst(s) => s.spawn_type(),
            SpawnShape::PolygonalChain(s) => s.spawn_type(),
            SpawnShape::Custom(s) => s.spawn_type(),
        }
    }

    fn spawn(
        &self,
        settings: &EmissionSettings,
        particle: &mut Particle,
        emit_x: f32,
        emit_y: f32,
        index: u32,
        rng: &mut dyn RngCore,
    ) {
        match self {
            SpawnShape::Point(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
            SpawnShape::Rect(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
            SpawnShape::Circle(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
            SpawnShape::Ring(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
            SpawnShape::Burst(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
            SpawnShape::PolygonalChain(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
            SpawnShape::Custom(s) => s.spawn(settings, particle, emit_x, emit_y, index, rng),
        }
    }
}

/// Parses a configuration into a boxed custom strategy.
pub type ShapeParser = fn(&EmitterConfig) -> Result<Box<dyn SpawnStrategy>>;

fn parse_boxed<S: SpawnStrategy + 'static>(config: &EmitterConfig) -> Result<Box<dyn SpawnStrategy>> {
    Ok(Box::new(S::parse_config(config)?))
}

/// Maps spawn tags to strategies.
///
/// Built-in tags are always available; custom shapes are added with
/// [`register`](SpawnRegistry::register).
///
/// ```ignore
/// let mut registry = SpawnRegistry::new();
/// registry.register::<SpiralSpawn>("spiral");
/// let emitter = Emitter::with_registry(EmitterId(0), &registry, &config, options)?;
/// ```
#[derive(Clone, Default)]
pub struct SpawnRegistry {
    custom: HashMap<String, ShapeParser>,
}

impl fmt::Debug for SpawnRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SpawnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `S` under `name`. Built-in tags cannot be overridden.
    pub fn register<S: SpawnStrategy + 'static>(&mut self, name: &str) -> &mut Self {
        self.register_parser(name, parse_boxed::<S>)
    }

    pub fn register_parser(&mut self, name: &str, parser: ShapeParser) -> &mut Self {
        if let SpawnType::Custom(_) = SpawnType::from_name(name) {
            self.custom.insert(name.to_string(), parser);
        } else {
            log::warn!("spawn type {name:?} is built in and cannot be re-registered");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        !matches!(SpawnType::from_name(name), SpawnType::Custom(_)) || self.custom.contains_key(name)
    }

    /// Build the strategy named by `config.spawn_type`.
    pub fn parse(&self, config: &EmitterConfig) -> Result<SpawnShape> {
        let shape = match SpawnType::from_name(&config.spawn_type) {
            SpawnType::Point => SpawnShape::Point(PointSpawn::parse_config(config)?),
            SpawnType::Rect => SpawnShape::Rect(RectSpawn::parse_config(config)?),
            SpawnType::Circle => SpawnShape::Circle(CircleSpawn::parse_config(config)?),
            SpawnType::Ring => SpawnShape::Ring(RingSpawn::parse_config(config)?),
            SpawnType::Burst => SpawnShape::Burst(BurstSpawn::parse_config(config)?),
            SpawnType::PolygonalChain => SpawnShape::PolygonalChain(PolygonalChainSpawn::parse_config(config)?),
            SpawnType::Custom(name) => {
                let parser = self
                    .custom
                    .get(&name)
                    .ok_or_else(|| ConfigError::UnknownSpawnType(name.clone()))?;
                SpawnShape::Custom(parser(config)?)
            }
        };
        log::debug!("parsed spawn shape {}", shape.spawn_type());
        Ok(shape)
    }
}
