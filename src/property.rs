//! Value lists: properties animated over a particle's life.
//!
//! A [`PropertyList`] is a sorted list of [`PropertyNode`]s (value + normalized
//! time). Evaluating it at a particle's age fraction gives the current alpha,
//! scale, speed or color. Lists come in three flavours:
//!
//! | Nodes | `stepped` | Behaviour |
//! |-------|-----------|-----------|
//! | 1 | any | constant |
//! | 2 | `false` | straight blend from first to second value |
//! | 3+ | `false` | piecewise blend between the surrounding nodes |
//! | any | `true` | holds each value until the next node's time |
//!
//! An optional [`Ease`] remaps the age fraction before lookup.

use crate::color::Rgb;
use crate::config::{EmitterConfig, RangeConfig, ValueList, ValueStep};
use crate::ease::{generate_ease, Ease, EaseSegment};
use crate::error::{ConfigError, Result};
use crate::visuals::{resolve_blend_mode, BlendMode};

/// Values that can be blended along a property list.
pub trait Interpolate: Copy {
    fn interpolate(self, other: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(self, other: f32, t: f32) -> f32 {
        (other - self) * t + self
    }
}

impl Interpolate for Rgb {
    #[inline]
    fn interpolate(self, other: Rgb, t: f32) -> Rgb {
        self.lerp(other, t)
    }
}

/// One stop of a [`PropertyList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyNode<V> {
    pub value: V,
    pub time: f32,
}

impl<V> PropertyNode<V> {
    pub fn new(value: V, time: f32) -> Self {
        Self { value, time }
    }
}

/// A compiled value list.
///
/// Evaluation is stateless: the covering node pair is looked up on every
/// call, so one list can be shared by every particle of an emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyList<V> {
    nodes: Vec<PropertyNode<V>>,
    stepped: bool,
    ease: Option<Ease>,
}

impl<V: Interpolate> PropertyList<V> {
    /// A list that always returns `value`.
    pub fn constant(value: V) -> Self {
        Self {
            nodes: vec![PropertyNode::new(value, 0.0)],
            stepped: false,
            ease: None,
        }
    }

    /// Build from nodes sorted by time. `nodes` must not be empty.
    pub fn from_nodes(nodes: Vec<PropertyNode<V>>, stepped: bool, ease: Option<Ease>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(ConfigError::InvalidValueList("list has no values".into()));
        }
        Ok(Self { nodes, stepped, ease })
    }

    /// Build from configuration, converting each raw value with `convert`.
    pub fn from_config<R: PartialEq>(list: &ValueList<R>, mut convert: impl FnMut(&R) -> V) -> Result<Self> {
        match list {
            ValueList::List { list, is_stepped, ease } => {
                let nodes = list
                    .iter()
                    .map(|step| PropertyNode::new(convert(&step.value), step.time))
                    .collect();
                Self::from_nodes(nodes, *is_stepped, build_ease(ease.as_deref())?)
            }
            ValueList::StartEnd { start, end, ease } => {
                let mut nodes = vec![PropertyNode::new(convert(start), 0.0)];
                if end != start {
                    nodes.push(PropertyNode::new(convert(end), 1.0));
                }
                Self::from_nodes(nodes, false, build_ease(ease.as_deref())?)
            }
            ValueList::Constant(value) => Ok(Self::constant(convert(value))),
        }
    }

    pub fn nodes(&self) -> &[PropertyNode<V>] {
        &self.nodes
    }

    pub fn is_stepped(&self) -> bool {
        self.stepped
    }

    /// Value at normalized age `lerp` in `[0, 1]`.
    pub fn interpolate(&self, lerp: f32) -> V {
        let lerp = match &self.ease {
            Some(ease) => ease.eval(lerp),
            None => lerp,
        };
        let nodes = &self.nodes;
        if nodes.len() == 1 {
            return nodes[0].value;
        }

        // Index of the node in effect: advance while `lerp` is past the next node.
        let current = nodes[1..].partition_point(|n| lerp > n.time);
        if self.stepped {
            return nodes[current].value;
        }
        if nodes.len() == 2 {
            return nodes[0].value.interpolate(nodes[1].value, lerp);
        }
        let Some(next) = nodes.get(current + 1) else {
            return nodes[current].value;
        };
        let cur = &nodes[current];
        let span = next.time - cur.time;
        let t = if span > 0.0 { (lerp - cur.time) / span } else { 0.0 };
        cur.value.interpolate(next.value, t)
    }
}

impl PropertyList<Rgb> {
    /// Current color packed as `0xRRGGBB`.
    pub fn interpolate_packed(&self, lerp: f32) -> u32 {
        self.interpolate(lerp).packed()
    }
}

fn build_ease(segments: Option<&[EaseSegment]>) -> Result<Option<Ease>> {
    match segments {
        None => Ok(None),
        Some([]) => Err(ConfigError::InvalidValueList("ease has no segments".into())),
        Some(segments) => Ok(Some(generate_ease(segments.to_vec()))),
    }
}

/// Bake a color list into a stepped list of `num_steps` evenly spaced colors.
///
/// Zero steps means the default of 10. The source stops are blended in RGB
/// space; the result holds each baked color for `1 / num_steps` of the life.
pub fn create_stepped_gradient(list: &[ValueStep<String>], num_steps: u32) -> Result<PropertyList<Rgb>> {
    let Some(first) = list.first() else {
        return Err(ConfigError::InvalidValueList("gradient has no colors".into()));
    };
    let steps = if num_steps == 0 { 10 } else { num_steps };
    let colors: Vec<Rgb> = list.iter().map(|step| Rgb::from_hex(&step.value)).collect();

    let mut nodes = Vec::with_capacity(steps as usize);
    nodes.push(PropertyNode::new(colors[0], first.time));

    let mut cur = 0;
    for i in 1..steps {
        let time = i as f32 / steps as f32;
        while cur + 1 < list.len() - 1 && time > list[cur + 1].time {
            cur += 1;
        }
        let value = match list.get(cur + 1) {
            Some(next) => {
                let span = next.time - list[cur].time;
                let t = if span > 0.0 { (time - list[cur].time) / span } else { 0.0 };
                colors[cur].lerp(colors[cur + 1], t)
            }
            None => colors[cur],
        };
        nodes.push(PropertyNode::new(value, time));
    }
    PropertyList::from_nodes(nodes, true, None)
}

/// Per-emitter templates for every animated particle property.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleProperties {
    pub alpha: PropertyList<f32>,
    pub scale: PropertyList<f32>,
    pub speed: PropertyList<f32>,
    pub color: PropertyList<Rgb>,
    pub blend_mode: BlendMode,
    pub lifetime: RangeConfig,
}

impl Default for ParticleProperties {
    fn default() -> Self {
        Self {
            alpha: PropertyList::constant(1.0),
            scale: PropertyList::constant(1.0),
            speed: PropertyList::constant(0.0),
            color: PropertyList::constant(Rgb::WHITE),
            blend_mode: BlendMode::Normal,
            lifetime: RangeConfig::fixed(1.0),
        }
    }
}

impl ParticleProperties {
    pub fn from_config(config: &EmitterConfig, verbose: bool) -> Result<Self> {
        let defaults = Self::default();
        let number = |list: &Option<ValueList<f32>>, fallback: PropertyList<f32>| match list {
            Some(list) => PropertyList::from_config(list, |v| *v),
            None => Ok(fallback),
        };

        let color = match (&config.color, config.color_steps) {
            (Some(ValueList::List { list, .. }), Some(steps)) => create_stepped_gradient(list, steps)?,
            (Some(list), _) => PropertyList::from_config(list, |hex: &String| {
                let rgb = Rgb::from_hex(hex);
                if verbose && !rgb.is_valid() {
                    log::warn!("color {hex:?} has invalid hex digits");
                }
                rgb
            })?,
            (None, _) => defaults.color,
        };

        Ok(Self {
            alpha: number(&config.alpha, defaults.alpha)?,
            scale: number(&config.scale, defaults.scale)?,
            speed: number(&config.speed, defaults.speed)?,
            color,
            blend_mode: resolve_blend_mode(config.blend_mode.as_deref(), verbose),
            lifetime: config.lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(list: &[(f32, f32)]) -> ValueList<f32> {
        ValueList::List {
            list: list.iter().map(|&(value, time)| ValueStep { value, time }).collect(),
            is_stepped: false,
            ease: None,
        }
    }

    #[test]
    fn test_simple_list() {
        let list = PropertyList::from_config(&ValueList::StartEnd { start: 1.0, end: 0.0, ease: None }, |v| *v).unwrap();
        assert_eq!(list.interpolate(0.0), 1.0);
        assert_eq!(list.interpolate(0.25), 0.75);
        assert_eq!(list.interpolate(1.0), 0.0);
    }

    #[test]
    fn test_equal_start_end_is_constant() {
        let list = PropertyList::from_config(&ValueList::StartEnd { start: 0.4, end: 0.4, ease: None }, |v| *v).unwrap();
        assert_eq!(list.nodes().len(), 1);
        assert_eq!(list.interpolate(0.9), 0.4);
    }

    #[test]
    fn test_complex_list() {
        let list = PropertyList::from_config(&steps(&[(0.0, 0.0), (10.0, 0.5), (0.0, 1.0)]), |v| *v).unwrap();
        assert_eq!(list.interpolate(0.0), 0.0);
        assert_eq!(list.interpolate(0.25), 5.0);
        assert_eq!(list.interpolate(0.5), 10.0);
        assert_eq!(list.interpolate(0.75), 5.0);
        assert_eq!(list.interpolate(1.0), 0.0);
    }

    #[test]
    fn test_complex_list_is_stateless() {
        let list = PropertyList::from_config(&steps(&[(0.0, 0.0), (10.0, 0.5), (0.0, 1.0)]), |v| *v).unwrap();
        assert_eq!(list.interpolate(0.75), 5.0);
        // Going back in time still finds the right pair.
        assert_eq!(list.interpolate(0.25), 5.0);
    }

    #[test]
    fn test_stepped_list() {
        let config = ValueList::List {
            list: vec![
                ValueStep { value: 1.0, time: 0.0 },
                ValueStep { value: 2.0, time: 0.5 },
                ValueStep { value: 3.0, time: 0.8 },
            ],
            is_stepped: true,
            ease: None,
        };
        let list = PropertyList::from_config(&config, |v| *v).unwrap();
        assert_eq!(list.interpolate(0.1), 1.0);
        assert_eq!(list.interpolate(0.5), 1.0);
        assert_eq!(list.interpolate(0.6), 2.0);
        assert_eq!(list.interpolate(0.99), 3.0);
    }

    #[test]
    fn test_eased_list() {
        let config = ValueList::StartEnd {
            start: 0.0,
            end: 1.0,
            ease: Some(vec![EaseSegment { s: 0.0, cp: 0.0, e: 1.0 }]),
        };
        let list = PropertyList::from_config(&config, |v| *v).unwrap();
        assert!((list.interpolate(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_empty_lists_rejected() {
        assert!(PropertyList::from_config(&steps(&[]), |v| *v).is_err());
        let bad_ease = ValueList::StartEnd { start: 0.0, end: 1.0, ease: Some(vec![]) };
        assert!(PropertyList::from_config(&bad_ease, |v| *v).is_err());
    }

    #[test]
    fn test_color_list_packs() {
        let config = ValueList::StartEnd {
            start: "#ff0000".to_string(),
            end: "#0000ff".to_string(),
            ease: None,
        };
        let list = PropertyList::from_config(&config, |hex: &String| Rgb::from_hex(hex)).unwrap();
        assert_eq!(list.interpolate_packed(0.0), 0xFF0000);
        assert_eq!(list.interpolate_packed(1.0), 0x0000FF);
    }

    #[test]
    fn test_stepped_gradient() {
        let list = vec![
            ValueStep { value: "#000000".to_string(), time: 0.0 },
            ValueStep { value: "#ffffff".to_string(), time: 1.0 },
        ];
        let gradient = create_stepped_gradient(&list, 4).unwrap();
        assert!(gradient.is_stepped());
        assert_eq!(gradient.nodes().len(), 4);
        assert_eq!(gradient.nodes()[2].time, 0.5);
        assert_eq!(gradient.nodes()[2].value, Rgb::new(127.5, 127.5, 127.5));
        assert_eq!(gradient.interpolate(0.1).r, 0.0);
        assert_eq!(gradient.interpolate(0.3).r, 63.75);
    }

    #[test]
    fn test_stepped_gradient_defaults_to_ten_steps() {
        let list = vec![
            ValueStep { value: "#000000".to_string(), time: 0.0 },
            ValueStep { value: "#ff0000".to_string(), time: 1.0 },
        ];
        assert_eq!(create_stepped_gradient(&list, 0).unwrap().nodes().len(), 10);
        assert!(create_stepped_gradient(&[], 5).is_err());
    }

    #[test]
    fn test_properties_from_config() {
        let config = EmitterConfig::from_json(
            r##"{"alpha": {"start": 1, "end": 0}, "color": {"start": "#ffffff", "end": "#000000"}, "blendMode": "add"}"##,
        )
        .unwrap();
        let props = ParticleProperties::from_config(&config, false).unwrap();
        assert_eq!(props.alpha.interpolate(0.5), 0.5);
        assert_eq!(props.scale.interpolate(0.5), 1.0);
        assert_eq!(props.blend_mode, BlendMode::Add);
        assert_eq!(props.color.interpolate_packed(0.0), 0xFFFFFF);
    }
}
