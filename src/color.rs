//! Color decoding and packing.
//!
//! Authoring tools write colors as hex strings in any of six forms:
//! `#AARRGGBB`, `#RRGGBB`, `0xAARRGGBB`, `0xRRGGBB`, `AARRGGBB`, `RRGGBB`.
//! They all decode to the same channel layout: red, green, blue, then alpha
//! (if present) last.
//!
//! Two decoders are provided:
//!
//! | Function | Malformed digits |
//! |----------|------------------|
//! | [`hex_to_rgb`] / [`Rgb::from_hex`] | channel becomes `NaN` |
//! | [`Rgb::parse`] | returns [`ColorError`] |

use crate::error::ColorError;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Pack three 0-255 channels into `0xRRGGBB`.
///
/// No range checking. Values above 255 bleed into the neighbouring channel;
/// clamping is the caller's job.
#[inline]
pub fn combine_rgb_components(r: u32, g: u32, b: u32) -> u32 {
    (r << 16) | (g << 8) | b
}

/// Decode a hex color string into `[r, g, b]` or `[r, g, b, a]`.
///
/// ```
/// use plume::color::hex_to_rgb;
///
/// assert_eq!(hex_to_rgb("#FF8040"), vec![255.0, 128.0, 64.0]);
/// assert_eq!(hex_to_rgb("0x80FF8040"), vec![255.0, 128.0, 64.0, 128.0]);
/// ```
pub fn hex_to_rgb(color: &str) -> Vec<f32> {
    let mut out = Vec::with_capacity(4);
    hex_to_rgb_into(color, &mut out);
    out
}

/// Like [`hex_to_rgb`], but fills a caller-owned buffer.
///
/// The buffer is cleared first, so it can be reused across calls.
pub fn hex_to_rgb_into(color: &str, out: &mut Vec<f32>) {
    let mut digits = strip_prefix(color);
    let mut alpha = None;
    if digits.len() == 8 {
        alpha = Some(channel(digits, 0));
        digits = digits.get(2..).unwrap_or("");
    }
    out.clear();
    out.push(channel(digits, 0));
    out.push(channel(digits, 2));
    out.push(channel(digits, 4));
    if let Some(a) = alpha {
        out.push(a);
    }
}

fn strip_prefix(color: &str) -> &str {
    color
        .strip_prefix('#')
        .or_else(|| color.strip_prefix("0x"))
        .unwrap_or(color)
}

/// Two hex digits at `offset`, or `NaN` when missing or malformed.
fn channel(digits: &str, offset: usize) -> f32 {
    digits
        .get(offset..offset + 2)
        .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        .map_or(f32::NAN, f32::from)
}

/// An RGB color with channels in `0.0..=255.0`.
///
/// Channels are floats so color lists can interpolate between stops without
/// rounding at every step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Lenient decode: bad digits give `NaN` channels, alpha is dropped.
    pub fn from_hex(color: &str) -> Self {
        let mut buf = Vec::with_capacity(4);
        hex_to_rgb_into(color, &mut buf);
        Self::new(buf[0], buf[1], buf[2])
    }

    /// Strict decode. Accepts the same six forms as [`hex_to_rgb`].
    pub fn parse(color: &str) -> Result<Self, ColorError> {
        let digits = strip_prefix(color);
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(color.to_string()));
        }
        let rgb = match digits.len() {
            6 => digits,
            8 => &digits[2..],
            n => return Err(ColorError::InvalidLength(n)),
        };
        Ok(Self::new(channel(rgb, 0), channel(rgb, 2), channel(rgb, 4)))
    }

    /// Whether every channel decoded to a number.
    pub fn is_valid(&self) -> bool {
        !(self.r.is_nan() || self.g.is_nan() || self.b.is_nan())
    }

    /// Channel-wise linear blend towards `other`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            (other.r - self.r) * t + self.r,
            (other.g - self.g) * t + self.g,
            (other.b - self.b) * t + self.b,
        )
    }

    /// Pack into `0xRRGGBB`, truncating each channel towards zero.
    #[inline]
    pub fn packed(self) -> u32 {
        combine_rgb_components(self.r as u32, self.g as u32, self.b as u32)
    }
}

/// GPU-ready RGBA8 color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct PackedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PackedColor {
    /// Build from a packed `0xRRGGBB` tint and an alpha in `0.0..=1.0`.
    pub fn from_tint(tint: u32, alpha: f32) -> Self {
        Self {
            r: ((tint >> 16) & 0xFF) as u8,
            g: ((tint >> 8) & 0xFF) as u8,
            b: (tint & 0xFF) as u8,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    /// View as raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
