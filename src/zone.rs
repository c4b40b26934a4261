//! Zones: fixed regions with their own force profile.
//!
//! The set of zone archetypes never changes; only their on-screen geometry
//! is recomputed when the canvas is resized. Thoughts refer to their home
//! zone by [`ZoneKind`] and look the geometry up every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// The zone archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Creative,
    Focus,
    Organize,
    Relax,
}

impl ZoneKind {
    /// All archetypes in layout order (row-major 2x2 grid).
    pub const ALL: [ZoneKind; 4] = [
        ZoneKind::Creative,
        ZoneKind::Focus,
        ZoneKind::Organize,
        ZoneKind::Relax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ZoneKind::Creative => "Creative",
            ZoneKind::Focus => "Focus",
            ZoneKind::Organize => "Organize",
            ZoneKind::Relax => "Relax",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ZoneKind::Creative => "creative",
            ZoneKind::Focus => "focus",
            ZoneKind::Organize => "organize",
            ZoneKind::Relax => "relax",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ZoneKind::Creative => "🎨",
            ZoneKind::Focus => "🎯",
            ZoneKind::Organize => "📊",
            ZoneKind::Relax => "🌙",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ZoneKind::Creative => Color::rgb(0xff, 0x6b, 0x9d),
            ZoneKind::Focus => Color::rgb(0x4e, 0xcd, 0xc4),
            ZoneKind::Organize => Color::rgb(0xf7, 0xdc, 0x6f),
            ZoneKind::Relax => Color::rgb(0x9b, 0x59, 0xb6),
        }
    }

    /// Pull strength towards the zone center.
    pub fn gravity(&self) -> f32 {
        match self {
            ZoneKind::Creative => 0.3,
            ZoneKind::Focus => 0.8,
            ZoneKind::Organize => 0.6,
            ZoneKind::Relax => 0.2,
        }
    }

    /// Random jitter injected into bound thoughts.
    pub fn chaos(&self) -> f32 {
        match self {
            ZoneKind::Creative => 0.4,
            ZoneKind::Focus => 0.05,
            ZoneKind::Organize => 0.1,
            ZoneKind::Relax => 0.15,
        }
    }

    /// Grid slot as (column, row) in the 2x2 layout.
    fn slot(&self) -> (f32, f32) {
        match self {
            ZoneKind::Creative => (0.5, 0.5),
            ZoneKind::Focus => (1.5, 0.5),
            ZoneKind::Organize => (0.5, 1.5),
            ZoneKind::Relax => (1.5, 1.5),
        }
    }
}

/// A zone archetype placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub center: Vec2,
    pub radius: f32,
}

impl Zone {
    pub fn gravity(&self) -> f32 {
        self.kind.gravity()
    }

    pub fn chaos(&self) -> f32 {
        self.kind.chaos()
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
    }
}

/// Canvas layout parameters for zone placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width reserved on the left for the floating control panel.
    pub panel_width: f32,
    /// Offset from the panel edge and the top of the canvas.
    pub margin: f32,
    /// Upper bound on zone radius.
    pub max_zone_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            panel_width: 400.0,
            margin: 50.0,
            max_zone_radius: 120.0,
        }
    }
}

/// Place every zone archetype for a canvas of the given size.
pub fn layout(bounds: Vec2, config: &LayoutConfig) -> Vec<Zone> {
    let available_width = (bounds.x - config.panel_width).max(0.0);
    let horizontal = available_width / 2.0;
    let vertical = bounds.y / 2.0;
    let origin = Vec2::new(config.panel_width + config.margin, config.margin);
    let radius = config.max_zone_radius.min(vertical * 0.35);

    let zones: Vec<Zone> = ZoneKind::ALL
        .iter()
        .map(|&kind| {
            let (col, row) = kind.slot();
            Zone {
                kind,
                center: origin + Vec2::new(horizontal * col, vertical * row),
                radius,
            }
        })
        .collect();

    tracing::debug!(width = bounds.x, height = bounds.y, radius, "zone layout recomputed");
    zones
}

/// Find a zone by archetype.
pub fn find(zones: &[Zone], kind: ZoneKind) -> Option<&Zone> {
    zones.iter().find(|z| z.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_places_every_archetype() {
        let zones = layout(Vec2::new(1400.0, 900.0), &LayoutConfig::default());
        assert_eq!(zones.len(), ZoneKind::ALL.len());
        for kind in ZoneKind::ALL {
            assert!(find(&zones, kind).is_some());
        }
    }

    #[test]
    fn test_layout_geometry() {
        let zones = layout(Vec2::new(1400.0, 900.0), &LayoutConfig::default());
        let creative = find(&zones, ZoneKind::Creative).unwrap();
        // hs = 500, vs = 450
        assert_eq!(creative.center, Vec2::new(450.0 + 250.0, 50.0 + 225.0));
        assert_eq!(creative.radius, 120.0);

        let relax = find(&zones, ZoneKind::Relax).unwrap();
        assert_eq!(relax.center, Vec2::new(450.0 + 750.0, 50.0 + 675.0));
    }

    #[test]
    fn test_small_canvas_shrinks_radius() {
        let zones = layout(Vec2::new(800.0, 400.0), &LayoutConfig::default());
        assert!((zones[0].radius - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_zone_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ZoneKind::Organize).unwrap();
        assert_eq!(json, "\"organize\"");
    }
}
