//! Blend modes for particle rendering.
//!
//! Emitter configurations name their blend mode in free text (`"screen"`,
//! `"Color Dodge"`, `"ADD_NPM"`). [`get_blend_mode`] turns that into a
//! [`BlendMode`], and [`BlendMode::blend_state`] turns a blend mode into the
//! fixed-function state a wgpu render pipeline needs.
//!
//! ```
//! use plume::visuals::{get_blend_mode, BlendMode};
//!
//! assert_eq!(get_blend_mode(Some("Color Dodge")), BlendMode::ColorDodge);
//! assert_eq!(get_blend_mode(Some("nope")), BlendMode::Normal);
//! assert_eq!(get_blend_mode(None), BlendMode::Normal);
//! ```

use serde::{Deserialize, Serialize};

/// Blend mode for particle rendering.
///
/// Controls how particle colors combine with the background and each other.
/// The discriminants follow the render engine's enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    #[default]
    Normal = 0,
    /// Additive blending. Overlapping particles get brighter; good for fire
    /// and anything that should glow.
    Add = 1,
    /// Colors are multiplied, darkening the result.
    Multiply = 2,
    /// Inverse multiply, lightening the result.
    Screen = 3,
    Overlay = 4,
    Darken = 5,
    Lighten = 6,
    ColorDodge = 7,
    ColorBurn = 8,
    HardLight = 9,
    SoftLight = 10,
    Difference = 11,
    Exclusion = 12,
    Hue = 13,
    Saturation = 14,
    Color = 15,
    Luminosity = 16,
    /// Alpha blending for textures without premultiplied alpha.
    NormalNpm = 17,
    AddNpm = 18,
    ScreenNpm = 19,
    /// Blending disabled; the source overwrites the destination.
    None = 20,
    SrcIn = 21,
    SrcOut = 22,
    SrcAtop = 23,
    DstOver = 24,
    DstIn = 25,
    DstOut = 26,
    DstAtop = 27,
    Subtract = 28,
    Xor = 29,
}

impl BlendMode {
    /// All blend modes, in enumeration order.
    pub const ALL: [BlendMode; 30] = [
        BlendMode::Normal,
        BlendMode::Add,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
        BlendMode::NormalNpm,
        BlendMode::AddNpm,
        BlendMode::ScreenNpm,
        BlendMode::None,
        BlendMode::SrcIn,
        BlendMode::SrcOut,
        BlendMode::SrcAtop,
        BlendMode::DstOver,
        BlendMode::DstIn,
        BlendMode::DstOut,
        BlendMode::DstAtop,
        BlendMode::Subtract,
        BlendMode::Xor,
    ];

    /// Canonical configuration name (`SCREAMING_SNAKE_CASE`).
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "NORMAL",
            BlendMode::Add => "ADD",
            BlendMode::Multiply => "MULTIPLY",
            BlendMode::Screen => "SCREEN",
            BlendMode::Overlay => "OVERLAY",
            BlendMode::Darken => "DARKEN",
            BlendMode::Lighten => "LIGHTEN",
            BlendMode::ColorDodge => "COLOR_DODGE",
            BlendMode::ColorBurn => "COLOR_BURN",
            BlendMode::HardLight => "HARD_LIGHT",
            BlendMode::SoftLight => "SOFT_LIGHT",
            BlendMode::Difference => "DIFFERENCE",
            BlendMode::Exclusion => "EXCLUSION",
            BlendMode::Hue => "HUE",
            BlendMode::Saturation => "SATURATION",
            BlendMode::Color => "COLOR",
            BlendMode::Luminosity => "LUMINOSITY",
            BlendMode::NormalNpm => "NORMAL_NPM",
            BlendMode::AddNpm => "ADD_NPM",
            BlendMode::ScreenNpm => "SCREEN_NPM",
            BlendMode::None => "NONE",
            BlendMode::SrcIn => "SRC_IN",
            BlendMode::SrcOut => "SRC_OUT",
            BlendMode::SrcAtop => "SRC_ATOP",
            BlendMode::DstOver => "DST_OVER",
            BlendMode::DstIn => "DST_IN",
            BlendMode::DstOut => "DST_OUT",
            BlendMode::DstAtop => "DST_ATOP",
            BlendMode::Subtract => "SUBTRACT",
            BlendMode::Xor => "XOR",
        }
    }

    /// Look up a canonical name. Returns `None` for anything unknown.
    pub fn from_name(name: &str) -> Option<BlendMode> {
        let key = name.trim().to_ascii_uppercase().replace(' ', "_");
        // SRC_OVER is the render engine's alias for NORMAL.
        if key == "SRC_OVER" {
            return Some(BlendMode::Normal);
        }
        BlendMode::ALL.into_iter().find(|mode| mode.name() == key)
    }

    /// Fixed-function blend state for this mode.
    ///
    /// Modes that need shader support (overlay, hue, ...) fall back to alpha
    /// blending here; the renderer is expected to special-case them.
    pub fn blend_state(self) -> Option<wgpu::BlendState> {
        use wgpu::{BlendComponent, BlendFactor, BlendOperation, BlendState};

        let component = |src_factor, dst_factor| BlendComponent {
            src_factor,
            dst_factor,
            operation: BlendOperation::Add,
        };

        let state = match self {
            BlendMode::None => return None,
            BlendMode::Add => BlendState {
                color: component(BlendFactor::One, BlendFactor::One),
                alpha: component(BlendFactor::One, BlendFactor::One),
            },
            BlendMode::AddNpm => BlendState {
                color: component(BlendFactor::SrcAlpha, BlendFactor::One),
                alpha: component(BlendFactor::One, BlendFactor::One),
            },
            BlendMode::Multiply => BlendState {
                color: component(BlendFactor::Dst, BlendFactor::OneMinusSrcAlpha),
                alpha: BlendComponent::OVER,
            },
            BlendMode::Screen => BlendState {
                color: component(BlendFactor::One, BlendFactor::OneMinusSrc),
                alpha: BlendComponent::OVER,
            },
            BlendMode::ScreenNpm => BlendState {
                color: component(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrc),
                alpha: BlendComponent::OVER,
            },
            BlendMode::NormalNpm => BlendState::ALPHA_BLENDING,
            BlendMode::SrcIn => BlendState {
                color: component(BlendFactor::DstAlpha, BlendFactor::Zero),
                alpha: component(BlendFactor::DstAlpha, BlendFactor::Zero),
            },
            BlendMode::SrcOut => BlendState {
                color: component(BlendFactor::OneMinusDstAlpha, BlendFactor::Zero),
                alpha: component(BlendFactor::OneMinusDstAlpha, BlendFactor::Zero),
            },
            BlendMode::SrcAtop => BlendState {
                color: component(BlendFactor::DstAlpha, BlendFactor::OneMinusSrcAlpha),
                alpha: component(BlendFactor::DstAlpha, BlendFactor::OneMinusSrcAlpha),
            },
            BlendMode::DstOver => BlendState {
                color: component(BlendFactor::OneMinusDstAlpha, BlendFactor::One),
                alpha: component(BlendFactor::OneMinusDstAlpha, BlendFactor::One),
            },
            BlendMode::DstIn => BlendState {
                color: component(BlendFactor::Zero, BlendFactor::SrcAlpha),
                alpha: component(BlendFactor::Zero, BlendFactor::SrcAlpha),
            },
            BlendMode::DstOut => BlendState {
                color: component(BlendFactor::Zero, BlendFactor::OneMinusSrcAlpha),
                alpha: component(BlendFactor::Zero, BlendFactor::OneMinusSrcAlpha),
            },
            BlendMode::DstAtop => BlendState {
                color: component(BlendFactor::OneMinusDstAlpha, BlendFactor::SrcAlpha),
                alpha: component(BlendFactor::OneMinusDstAlpha, BlendFactor::SrcAlpha),
            },
            BlendMode::Xor => BlendState {
                color: component(BlendFactor::OneMinusDstAlpha, BlendFactor::OneMinusSrcAlpha),
                alpha: component(BlendFactor::OneMinusDstAlpha, BlendFactor::OneMinusSrcAlpha),
            },
            BlendMode::Subtract => BlendState {
                color: BlendComponent {
                    src_factor: BlendFactor::One,
                    dst_factor: BlendFactor::One,
                    operation: BlendOperation::ReverseSubtract,
                },
                alpha: component(BlendFactor::One, BlendFactor::One),
            },
            _ => BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        };
        Some(state)
    }
}

/// Resolve a free-text blend mode name.
///
/// Case-insensitive; spaces count as underscores. Missing, empty or unknown
/// names give [`BlendMode::Normal`].
pub fn get_blend_mode(name: Option<&str>) -> BlendMode {
    name.and_then(BlendMode::from_name).unwrap_or_default()
}

/// [`get_blend_mode`] that reports the fallback when `verbose` is set.
pub fn resolve_blend_mode(name: Option<&str>, verbose: bool) -> BlendMode {
    match name.map(|n| (n, BlendMode::from_name(n))) {
        Some((_, Some(mode))) => mode,
        Some((raw, None)) => {
            if verbose && !raw.is_empty() {
                log::warn!("unknown blend mode {raw:?}, using NORMAL");
            }
            BlendMode::Normal
        }
        None => BlendMode::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let expected = BlendMode::Screen;
        assert_eq!(get_blend_mode(Some("Screen")), expected);
        assert_eq!(get_blend_mode(Some("screen")), expected);
        assert_eq!(get_blend_mode(Some("SCREEN")), expected);
    }

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(get_blend_mode(Some("color burn")), BlendMode::ColorBurn);
        assert_eq!(get_blend_mode(Some("Add NPM")), BlendMode::AddNpm);
        assert_eq!(get_blend_mode(Some("soft_light")), BlendMode::SoftLight);
    }

    #[test]
    fn test_fallback_to_normal() {
        assert_eq!(get_blend_mode(None), BlendMode::Normal);
        assert_eq!(get_blend_mode(Some("")), BlendMode::Normal);
        assert_eq!(get_blend_mode(Some("not a mode")), BlendMode::Normal);
        assert_eq!(resolve_blend_mode(Some("not a mode"), true), BlendMode::Normal);
    }

    #[test]
    fn test_names_round_trip() {
        for mode in BlendMode::ALL {
            assert_eq!(BlendMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(BlendMode::ALL.len(), BlendMode::Xor as usize + 1);
    }

    #[test]
    fn test_blend_states() {
        assert!(BlendMode::None.blend_state().is_none());
        let add = BlendMode::Add.blend_state().unwrap();
        assert_eq!(add.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(
            BlendMode::Normal.blend_state(),
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING)
        );
    }
}
