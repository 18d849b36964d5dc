use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Decorative tile pattern drawn over the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    #[default]
    None,
    Waves,
    Dots,
    Grid,
    Diagonal,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::None,
        PatternKind::Waves,
        PatternKind::Dots,
        PatternKind::Grid,
        PatternKind::Diagonal,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PatternKind::None => "None",
            PatternKind::Waves => "Waves",
            PatternKind::Dots => "Dots",
            PatternKind::Grid => "Grid",
            PatternKind::Diagonal => "Diagonal",
        }
    }

    /// The unit tile repeated across the canvas; `None` has no tile.
    pub fn tile(&self) -> Option<PatternTile> {
        match self {
            PatternKind::None => None,
            PatternKind::Waves => Some(PatternTile {
                size: Vec2::new(100.0, 20.0),
                paint: PatternPaint::Wave {
                    stroke_width: 1.0,
                    opacity: 0.10,
                },
            }),
            PatternKind::Dots => Some(PatternTile {
                size: Vec2::new(20.0, 20.0),
                paint: PatternPaint::Dot {
                    radius: 1.5,
                    opacity: 0.15,
                },
            }),
            PatternKind::Grid => Some(PatternTile {
                size: Vec2::new(20.0, 20.0),
                paint: PatternPaint::GridLines {
                    stroke_width: 0.5,
                    opacity: 0.10,
                },
            }),
            PatternKind::Diagonal => Some(PatternTile {
                size: Vec2::new(20.0, 20.0),
                paint: PatternPaint::DiagonalLine {
                    stroke_width: 0.5,
                    opacity: 0.10,
                },
            }),
        }
    }
}

/// Geometry of one repeatable pattern tile, in tile-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternTile {
    pub size: Vec2,
    pub paint: PatternPaint,
}

/// The single primitive each tile draws. Opacities are fractions of the
/// foreground color, mirroring the stroke/fill opacities of the original
/// SVG tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternPaint {
    /// Horizontal sine-like wave through the tile's vertical center.
    Wave { stroke_width: f32, opacity: f32 },
    /// A dot at the tile center.
    Dot { radius: f32, opacity: f32 },
    /// Lines along the tile's right and bottom edges.
    GridLines { stroke_width: f32, opacity: f32 },
    /// A line from bottom-left to top-right.
    DiagonalLine { stroke_width: f32, opacity: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_has_no_tile() {
        assert!(PatternKind::None.tile().is_none());
    }

    #[test]
    fn every_other_kind_has_a_tile() {
        for kind in PatternKind::ALL {
            if kind != PatternKind::None {
                assert!(kind.tile().is_some(), "{kind:?} should tile");
            }
        }
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        let json = serde_json::to_string(&PatternKind::Diagonal).unwrap();
        assert_eq!(json, "\"diagonal\"");
        let back: PatternKind = serde_json::from_str("\"waves\"").unwrap();
        assert_eq!(back, PatternKind::Waves);
    }
}
