//! The per-particle record written by spawn strategies and animated by
//! property lists.

use crate::color::PackedColor;
use crate::math::{rotate_point, scale_by};
use crate::property::ParticleProperties;
use crate::textures::Texture;
use glam::Vec2;

/// Identifies the emitter a particle came from.
///
/// Particles never own their emitter; this is a plain handle the host can use
/// to look it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EmitterId(pub u32);

/// One live particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub emitter: EmitterId,
    /// World position.
    pub position: Vec2,
    /// Facing in degrees.
    pub rotation: f32,
    pub velocity: Vec2,
    /// Seconds since spawn.
    pub age: f32,
    /// Lifetime in seconds.
    pub max_life: f32,
    pub alpha: f32,
    pub scale: f32,
    pub speed: f32,
    /// Packed `0xRRGGBB`.
    pub tint: u32,
    pub texture: Texture,
}

impl Particle {
    pub fn new(emitter: EmitterId) -> Self {
        Self {
            emitter,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            age: 0.0,
            max_life: 1.0,
            alpha: 1.0,
            scale: 1.0,
            speed: 0.0,
            tint: 0xFFFFFF,
            texture: Texture::Empty,
        }
    }

    /// Normalized age in `[0, 1]`. A particle with no lifetime is treated as
    /// fully aged.
    pub fn age_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.age / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Evaluate every property list at `lerp` and store the results.
    ///
    /// Velocity points along the particle's rotation with magnitude `speed`.
    pub fn apply_properties(&mut self, properties: &ParticleProperties, lerp: f32) {
        self.alpha = properties.alpha.interpolate(lerp);
        self.scale = properties.scale.interpolate(lerp);
        self.speed = properties.speed.interpolate(lerp);
        self.tint = properties.color.interpolate_packed(lerp);

        let mut velocity = Vec2::new(1.0, 0.0);
        rotate_point(self.rotation, &mut velocity);
        scale_by(&mut velocity, self.speed);
        self.velocity = velocity;
    }

    pub fn packed_color(&self) -> PackedColor {
        PackedColor::from_tint(self.tint, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::property::PropertyList;

    #[test]
    fn test_new_particle_defaults() {
        let p = Particle::new(EmitterId(7));
        assert_eq!(p.emitter, EmitterId(7));
        assert!(p.texture.is_empty());
        assert_eq!(p.tint, 0xFFFFFF);
        assert_eq!(p.age_fraction(), 0.0);
    }

    #[test]
    fn test_age_fraction_clamps() {
        let mut p = Particle::new(EmitterId(0));
        p.max_life = 2.0;
        p.age = 1.0;
        assert_eq!(p.age_fraction(), 0.5);
        p.age = 5.0;
        assert_eq!(p.age_fraction(), 1.0);
        p.max_life = 0.0;
        assert_eq!(p.age_fraction(), 1.0);
    }

    #[test]
    fn test_apply_properties() {
        let props = ParticleProperties {
            alpha: PropertyList::from_nodes(
                vec![
                    crate::property::PropertyNode::new(1.0, 0.0),
                    crate::property::PropertyNode::new(0.0, 1.0),
                ],
                false,
                None,
            )
            .unwrap(),
            speed: PropertyList::constant(10.0),
            color: PropertyList::constant(Rgb::new(255.0, 0.0, 0.0)),
            ..ParticleProperties::default()
        };
        let mut p = Particle::new(EmitterId(0));
        p.rotation = 90.0;
        p.apply_properties(&props, 0.5);

        assert_eq!(p.alpha, 0.5);
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.tint, 0xFF0000);
        assert!(p.velocity.x.abs() < 1e-4);
        assert!((p.velocity.y - 10.0).abs() < 1e-4);
        assert_eq!(p.packed_color(), PackedColor { r: 255, g: 0, b: 0, a: 128 });
    }
}
