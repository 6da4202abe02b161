//! # plume - 2D particle emission and animation curves
//!
//! plume decides where every particle of a 2D effect starts, which way it
//! faces, and how its alpha, scale, speed and color change over its life.
//! Rendering and the per-frame update loop belong to the host; plume
//! provides the pieces they call.
//!
//! ## Quick Start
//!
//! ```
//! use plume::prelude::*;
//!
//! let config = EmitterConfig::from_json(r##"{
//!     "spawnType": "ring",
//!     "spawnCircle": {"x": 0, "y": 0, "r": 40, "minR": 30},
//!     "particlesPerWave": 16,
//!     "startRotation": {"min": 0, "max": 360},
//!     "alpha": {"start": 1, "end": 0},
//!     "speed": {"start": 200, "end": 50},
//!     "color": {"start": "#fff191", "end": "#ff622c"},
//!     "blendMode": "add"
//! }"##).unwrap();
//!
//! let options = EmitterOptions { seed: Some(7), ..EmitterOptions::default() };
//! let mut emitter = Emitter::new(EmitterId(0), &config, options).unwrap();
//! emitter.update_owner_pos(320.0, 240.0);
//!
//! let mut particles = Vec::new();
//! emitter.emit_wave(&mut particles);
//! assert_eq!(particles.len(), 16);
//!
//! // Halfway through its life.
//! let p = &mut particles[0];
//! p.age = 0.5;
//! let lerp = p.age_fraction();
//! p.apply_properties(emitter.properties(), lerp);
//! assert_eq!(p.alpha, 0.5);
//! ```
//!
//! ## Core Concepts
//!
//! ### Spawn shapes
//!
//! Each emission shape implements [`SpawnStrategy`]: `parse_config` reads the
//! shape's block of an [`EmitterConfig`] and `spawn` writes a particle's
//! starting position and rotation. Built-in shapes cover points, rectangles
//! (and lines), circles, rings, bursts and polygonal chains with optional
//! bezier segments. Custom shapes are added through a [`SpawnRegistry`].
//!
//! ### Property lists
//!
//! Alpha, scale, speed and color are [`PropertyList`]s evaluated at the
//! particle's normalized age, optionally remapped by a custom [`Ease`].
//!
//! ### Textures
//!
//! Particles carry a [`Texture`] handle. [`Texture::Empty`] stands in when no
//! art is configured and ignores every lifecycle call.
//!
//! ## Randomness
//!
//! Every random draw goes through the emitter's own `SmallRng`. Set
//! [`EmitterOptions::seed`] for reproducible output.

pub mod chain;
pub mod color;
pub mod config;
pub mod ease;
pub mod emitter;
pub mod error;
pub mod math;
pub mod particle;
pub mod property;
pub mod spawn;
pub mod textures;
pub mod visuals;

pub use bytemuck;
pub use chain::{Curve, PolygonalChain, Segment};
pub use color::{combine_rgb_components, hex_to_rgb, hex_to_rgb_into, PackedColor, Rgb};
pub use config::{EmitterConfig, EmitterOptions, PolygonConfig, ValueList};
pub use ease::{generate_ease, Ease, EaseSegment};
pub use emitter::{EmissionSettings, Emitter};
pub use error::{ChainError, ColorError, ConfigError, Result, TextureError};
pub use glam::Vec2;
pub use particle::{EmitterId, Particle};
pub use property::{create_stepped_gradient, ParticleProperties, PropertyList, PropertyNode};
pub use spawn::{SpawnRegistry, SpawnShape, SpawnStrategy, SpawnType};
pub use textures::{FilterMode, Texture, TextureData, TextureEvent};
pub use visuals::{get_blend_mode, BlendMode};

/// Convenient re-exports for common usage.
///
/// ```
/// use plume::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{EmitterConfig, EmitterOptions};
    pub use crate::emitter::{EmissionSettings, Emitter};
    pub use crate::error::ConfigError;
    pub use crate::particle::{EmitterId, Particle};
    pub use crate::property::ParticleProperties;
    pub use crate::spawn::{SpawnRegistry, SpawnStrategy, SpawnType};
    pub use crate::textures::{Texture, TextureEvent};
    pub use crate::visuals::BlendMode;
    pub use glam::Vec2;
}
