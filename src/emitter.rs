//! Emitters: the state spawn strategies read, and the wave driver.
//!
//! An [`Emitter`] is built from an [`EmitterConfig`]. It owns the active
//! [`SpawnShape`], the [`ParticleProperties`] templates, and a seeded RNG.
//! Each call to [`Emitter::emit_wave`] spawns `particles_per_wave` particles
//! at the emission origin (owner position plus spawn offset).
//!
//! # Example
//!
//! ```
//! use plume::prelude::*;
//!
//! let config = EmitterConfig::from_json(r#"{
//!     "spawnType": "burst",
//!     "particlesPerWave": 4,
//!     "particleSpacing": 90,
//!     "lifetime": {"min": 2, "max": 2}
//! }"#).unwrap();
//! let mut emitter = Emitter::new(EmitterId(1), &config, EmitterOptions::default()).unwrap();
//! emitter.update_owner_pos(50.0, 50.0);
//!
//! let mut particles = Vec::new();
//! emitter.emit_wave(&mut particles);
//! assert_eq!(particles.len(), 4);
//! assert_eq!(particles[3].rotation, 270.0);
//! ```

use crate::config::{EmitterConfig, EmitterOptions};
use crate::error::Result;
use crate::math::rotate_point;
use crate::particle::{EmitterId, Particle};
use crate::property::ParticleProperties;
use crate::spawn::{SpawnRegistry, SpawnShape, SpawnStrategy, SpawnType};
use crate::textures::Texture;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Emitter state the spawn strategies read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSettings {
    /// Position of whatever the emitter is attached to.
    pub owner_pos: Vec2,
    /// Offset of the emission origin from `owner_pos`.
    pub spawn_pos: Vec2,
    /// Emitter rotation in degrees.
    pub rotation: f32,
    pub min_start_rotation: f32,
    pub max_start_rotation: f32,
    pub particles_per_wave: u32,
}

impl Default for EmissionSettings {
    fn default() -> Self {
        Self {
            owner_pos: Vec2::ZERO,
            spawn_pos: Vec2::ZERO,
            rotation: 0.0,
            min_start_rotation: 0.0,
            max_start_rotation: 0.0,
            particles_per_wave: 1,
        }
    }
}

impl EmissionSettings {
    pub fn from_config(config: &EmitterConfig) -> Self {
        Self {
            owner_pos: Vec2::ZERO,
            spawn_pos: config.pos.into(),
            rotation: config.rotation,
            min_start_rotation: config.start_rotation.min,
            max_start_rotation: config.start_rotation.max,
            particles_per_wave: config.particles_per_wave.max(1),
        }
    }

    /// World-space emission origin.
    pub fn emit_position(&self) -> Vec2 {
        self.owner_pos + self.spawn_pos
    }
}

/// A configured particle source.
#[derive(Debug)]
pub struct Emitter {
    id: EmitterId,
    settings: EmissionSettings,
    shape: SpawnShape,
    properties: ParticleProperties,
    texture: Texture,
    options: EmitterOptions,
    rng: SmallRng,
}

impl Emitter {
    /// Build an emitter using the built-in shapes.
    ///
    /// Fails if the configuration does not describe a usable shape; a broken
    /// configuration never produces an emitter.
    pub fn new(id: EmitterId, config: &EmitterConfig, options: EmitterOptions) -> Result<Self> {
        Self::with_registry(id, &SpawnRegistry::new(), config, options)
    }

    /// Build an emitter that may use shapes registered in `registry`.
    pub fn with_registry(
        id: EmitterId,
        registry: &SpawnRegistry,
        config: &EmitterConfig,
        options: EmitterOptions,
    ) -> Result<Self> {
        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut emitter = Self {
            id,
            settings: EmissionSettings::default(),
            shape: SpawnShape::default(),
            properties: ParticleProperties::default(),
            texture: Texture::Empty,
            options,
            rng,
        };
        emitter.parse_config_with(registry, config)?;
        Ok(emitter)
    }

    /// Re-read `config` with the built-in shapes.
    pub fn parse_config(&mut self, config: &EmitterConfig) -> Result<()> {
        self.parse_config_with(&SpawnRegistry::new(), config)
    }

    /// Re-read `config`, replacing settings, shape and property templates.
    ///
    /// Everything is parsed before anything is replaced: on error the
    /// emitter is left exactly as it was. The owner position survives a
    /// successful reparse.
    pub fn parse_config_with(&mut self, registry: &SpawnRegistry, config: &EmitterConfig) -> Result<()> {
        let shape = registry.parse(config)?;
        let properties = ParticleProperties::from_config(config, self.options.verbose)?;
        let mut settings = EmissionSettings::from_config(config);
        settings.owner_pos = self.settings.owner_pos;

        self.shape = shape;
        self.properties = properties;
        self.settings = settings;
        log::debug!(
            "emitter {} configured: {} x{}",
            self.id.0,
            self.shape.spawn_type(),
            self.settings.particles_per_wave
        );
        Ok(())
    }

    pub fn id(&self) -> EmitterId {
        self.id
    }

    pub fn spawn_type(&self) -> SpawnType {
        self.shape.spawn_type()
    }

    pub fn shape(&self) -> &SpawnShape {
        &self.shape
    }

    pub fn settings(&self) -> &EmissionSettings {
        &self.settings
    }

    pub fn properties(&self) -> &ParticleProperties {
        &self.properties
    }

    pub fn options(&self) -> EmitterOptions {
        self.options
    }

    pub fn update_owner_pos(&mut self, x: f32, y: f32) {
        self.settings.owner_pos = Vec2::new(x, y);
    }

    pub fn update_spawn_pos(&mut self, x: f32, y: f32) {
        self.settings.spawn_pos = Vec2::new(x, y);
    }

    /// Set the emitter rotation (degrees). The spawn offset turns with it.
    pub fn rotate(&mut self, new_rotation: f32) {
        if self.settings.rotation == new_rotation {
            return;
        }
        let diff = new_rotation - self.settings.rotation;
        self.settings.rotation = new_rotation;
        rotate_point(diff, &mut self.settings.spawn_pos);
    }

    /// Texture handed to every new particle.
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = texture;
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Spawn one particle at `(emit_x, emit_y)` as the `index`-th of its wave.
    ///
    /// The particle gets its position and rotation from the shape, a lifetime
    /// from the configured range, and its properties at age zero.
    pub fn spawn_particle(&mut self, index: u32, emit_x: f32, emit_y: f32) -> Particle {
        let mut particle = Particle::new(self.id);
        self.shape
            .spawn(&self.settings, &mut particle, emit_x, emit_y, index, &mut self.rng);

        let lifetime = self.properties.lifetime;
        particle.max_life = if lifetime.min == lifetime.max {
            lifetime.min
        } else {
            self.rng.gen::<f32>() * (lifetime.max - lifetime.min) + lifetime.min
        };
        particle.texture = self.texture.clone();
        particle.apply_properties(&self.properties, 0.0);
        particle
    }

    /// Spawn one full wave at the current emission origin, appending to `out`.
    pub fn emit_wave(&mut self, out: &mut Vec<Particle>) {
        let origin = self.settings.emit_position();
        let count = self.settings.particles_per_wave;
        out.reserve(count as usize);
        for index in 0..count {
            let particle = self.spawn_particle(index, origin.x, origin.y);
            out.push(particle);
        }
        log::trace!("emitter {} emitted {count} particles at {origin}", self.id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PointConfig, RangeConfig, RectConfig};
    use crate::error::ConfigError;

    fn seeded() -> EmitterOptions {
        EmitterOptions {
            verbose: false,
            seed: Some(42),
        }
    }

    #[test]
    fn test_default_config_is_point() {
        let emitter = Emitter::new(EmitterId(0), &EmitterConfig::default(), seeded()).unwrap();
        assert_eq!(emitter.spawn_type(), SpawnType::Point);
        assert_eq!(emitter.settings().particles_per_wave, 1);
    }

    #[test]
    fn test_emit_wave_at_owner_plus_offset() {
        let config = EmitterConfig {
            particles_per_wave: 3,
            pos: PointConfig { x: 1.0, y: 2.0 },
            ..EmitterConfig::default()
        };
        let mut emitter = Emitter::new(EmitterId(3), &config, seeded()).unwrap();
        emitter.update_owner_pos(10.0, 10.0);

        let mut out = Vec::new();
        emitter.emit_wave(&mut out);
        assert_eq!(out.len(), 3);
        for p in &out {
            assert_eq!(p.position, Vec2::new(11.0, 12.0));
            assert_eq!(p.emitter, EmitterId(3));
            assert_eq!(p.max_life, 1.0);
        }
    }

    #[test]
    fn test_lifetime_range() {
        let config = EmitterConfig {
            lifetime: RangeConfig { min: 1.0, max: 3.0 },
            ..EmitterConfig::default()
        };
        let mut emitter = Emitter::new(EmitterId(0), &config, seeded()).unwrap();
        for i in 0..100 {
            let p = emitter.spawn_particle(i, 0.0, 0.0);
            assert!((1.0..=3.0).contains(&p.max_life));
        }
    }

    #[test]
    fn test_missing_shape_fails_new() {
        let config = EmitterConfig {
            spawn_type: "rect".into(),
            ..EmitterConfig::default()
        };
        assert!(matches!(
            Emitter::new(EmitterId(0), &config, seeded()),
            Err(ConfigError::MissingShape { field: "spawnRect", .. })
        ));
    }

    #[test]
    fn test_failed_reparse_keeps_state() {
        let rect = EmitterConfig {
            spawn_type: "rect".into(),
            spawn_rect: Some(RectConfig { x: 0.0, y: 0.0, w: 5.0, h: 5.0 }),
            rotation: 30.0,
            ..EmitterConfig::default()
        };
        let mut emitter = Emitter::new(EmitterId(0), &rect, seeded()).unwrap();
        emitter.update_owner_pos(4.0, 4.0);

        let broken = EmitterConfig {
            spawn_type: "ring".into(),
            ..EmitterConfig::default()
        };
        assert!(emitter.parse_config(&broken).is_err());
        assert_eq!(emitter.spawn_type(), SpawnType::Rect);
        assert_eq!(emitter.settings().rotation, 30.0);

        emitter.parse_config(&EmitterConfig::default()).unwrap();
        assert_eq!(emitter.spawn_type(), SpawnType::Point);
        assert_eq!(emitter.settings().owner_pos, Vec2::new(4.0, 4.0));
        assert_eq!(emitter.settings().rotation, 0.0);
    }

    #[test]
    fn test_rotate_turns_spawn_offset() {
        let config = EmitterConfig {
            pos: PointConfig { x: 10.0, y: 0.0 },
            ..EmitterConfig::default()
        };
        let mut emitter = Emitter::new(EmitterId(0), &config, seeded()).unwrap();
        emitter.rotate(90.0);
        let offset = emitter.settings().spawn_pos;
        assert!(offset.x.abs() < 1e-4);
        assert!((offset.y - 10.0).abs() < 1e-4);
        assert_eq!(emitter.settings().rotation, 90.0);
    }

    #[test]
    fn test_seeded_emitters_agree() {
        let config = EmitterConfig {
            spawn_type: "rect".into(),
            spawn_rect: Some(RectConfig { x: 0.0, y: 0.0, w: 100.0, h: 100.0 }),
            particles_per_wave: 8,
            ..EmitterConfig::default()
        };
        let mut a = Emitter::new(EmitterId(0), &config, seeded()).unwrap();
        let mut b = Emitter::new(EmitterId(0), &config, seeded()).unwrap();
        let (mut wave_a, mut wave_b) = (Vec::new(), Vec::new());
        a.emit_wave(&mut wave_a);
        b.emit_wave(&mut wave_b);
        assert_eq!(wave_a, wave_b);
    }

    #[test]
    fn test_particles_share_emitter_texture() {
        use crate::textures::TextureData;

        let mut emitter = Emitter::new(EmitterId(0), &EmitterConfig::default(), seeded()).unwrap();
        assert!(emitter.spawn_particle(0, 0.0, 0.0).texture.is_empty());

        let texture = Texture::new(TextureData::soft_circle(8));
        emitter.set_texture(texture.clone());
        assert_eq!(emitter.spawn_particle(0, 0.0, 0.0).texture, texture);
    }
}
