//! Colors used by entities and the renderer.
//!
//! Colors are stored as straight (non-premultiplied) 8-bit RGBA so they
//! serialize compactly in snapshots and map directly onto any drawing
//! surface.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Default color for manual connections (indigo).
    pub const INDIGO: Color = Color::rgb(0x63, 0x66, 0xf1);
    /// Automatically discovered antonym connections.
    pub const ANTONYM: Color = Color::rgba(147, 51, 234, 128);
    /// Any other non-manual connection.
    pub const LINK: Color = Color::rgba(100, 150, 255, 128);
    /// Connection-mode accent (preview line, pending highlight).
    pub const ACCENT: Color = Color::rgb(139, 92, 246);

    /// Background gradient center.
    pub const SPACE_CENTER: Color = Color::rgb(0x0f, 0x17, 0x29);
    /// Background gradient edge.
    pub const SPACE_EDGE: Color = Color::rgb(0x0a, 0x0e, 0x1a);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from hue (degrees), saturation and lightness (0-1).
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Color::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let channel = |t: f32| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };

        Color::rgb(
            channel(h + 1.0 / 3.0),
            channel(h),
            channel(h - 1.0 / 3.0),
        )
    }

    /// Random fully saturated-ish hue, as used for free thoughts.
    pub fn random_hue<R: Rng + ?Sized>(rng: &mut R, s: f32, l: f32) -> Self {
        Color::hsl(rng.gen_range(0.0..360.0), s, l)
    }

    /// Same color with alpha replaced by `alpha` (0-1).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Same color with alpha multiplied by `factor` (0-1).
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }

    /// Linear blend towards `other` by `t` (0 = self, 1 = other).
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Alpha as a 0-1 float.
    pub fn alpha(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// `#rrggbb` hex string (alpha dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(c: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }
}
