//! Decorative window-frame presets.
//!
//! A frame wraps the screenshot in window chrome (title bar, control
//! buttons, backing cards). Variants form a closed enum dispatched through
//! [`decorate`], which returns a structured description the renderer can
//! paint without knowing variant names. When a frame is active it takes
//! over the outer corner radius and the shadow; the raw screenshot inside
//! stays square-cornered and unshadowed.

use egui::Color32;
use serde::{Deserialize, Serialize};

// Zinc / rose palette used by the chrome.
const ZINC_50: Color32 = Color32::from_rgb(0xfa, 0xfa, 0xfa);
const ZINC_100: Color32 = Color32::from_rgb(0xf4, 0xf4, 0xf5);
const ZINC_200: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7);
const ZINC_400: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa);
const ZINC_600: Color32 = Color32::from_rgb(0x52, 0x52, 0x5b);
const ZINC_700: Color32 = Color32::from_rgb(0x3f, 0x3f, 0x46);
const ZINC_800: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a);
const ROSE_50: Color32 = Color32::from_rgb(0xff, 0xf1, 0xf2);
const ROSE_100: Color32 = Color32::from_rgb(0xff, 0xe4, 0xe6);
const ROSE_200: Color32 = Color32::from_rgb(0xfe, 0xcd, 0xd3);

/// macOS traffic-light button colors.
pub const TRAFFIC_CLOSE: Color32 = Color32::from_rgb(0xff, 0x61, 0x59);
pub const TRAFFIC_MINIMIZE: Color32 = Color32::from_rgb(0xff, 0xbd, 0x2e);
pub const TRAFFIC_MAXIMIZE: Color32 = Color32::from_rgb(0x28, 0xc9, 0x41);

/// Standard title-bar height across variants.
pub const TITLE_BAR_HEIGHT: f32 = 40.0;

fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (alpha * 255.0) as u8)
}

/// Named decorative window-frame preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameVariant {
    #[default]
    None,
    Arc,
    StackLight,
    StackDark,
    MacosLight,
    MacosDark,
    MacosSubtle,
    MacosAdaptive,
    Eclipse,
    SilverBack,
    ShadowBack,
    WindowsLight,
    WindowsDark,
    Shortboard,
    Ruler,
    Emotion,
}

impl FrameVariant {
    pub const ALL: [FrameVariant; 16] = [
        FrameVariant::None,
        FrameVariant::Arc,
        FrameVariant::StackLight,
        FrameVariant::StackDark,
        FrameVariant::MacosLight,
        FrameVariant::MacosDark,
        FrameVariant::MacosSubtle,
        FrameVariant::MacosAdaptive,
        FrameVariant::Eclipse,
        FrameVariant::SilverBack,
        FrameVariant::ShadowBack,
        FrameVariant::WindowsLight,
        FrameVariant::WindowsDark,
        FrameVariant::Shortboard,
        FrameVariant::Ruler,
        FrameVariant::Emotion,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FrameVariant::None => "None",
            FrameVariant::Arc => "Arc",
            FrameVariant::StackLight => "Stack Light",
            FrameVariant::StackDark => "Stack Dark",
            FrameVariant::MacosLight => "macOS Light",
            FrameVariant::MacosDark => "macOS Dark",
            FrameVariant::MacosSubtle => "macOS Subtle",
            FrameVariant::MacosAdaptive => "macOS Adaptive",
            FrameVariant::Eclipse => "Eclipse",
            FrameVariant::SilverBack => "Silver Back",
            FrameVariant::ShadowBack => "Shadow Back",
            FrameVariant::WindowsLight => "Windows Light",
            FrameVariant::WindowsDark => "Windows Dark",
            FrameVariant::Shortboard => "Shortboard",
            FrameVariant::Ruler => "Ruler",
            FrameVariant::Emotion => "Emotion",
        }
    }
}

/// Solid or two-stop diagonal fill for chrome surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameFill {
    Solid(Color32),
    /// Top-left to bottom-right.
    Gradient(Color32, Color32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBorder {
    pub width: f32,
    pub color: Color32,
    pub dashed: bool,
}

/// How the title-bar control buttons are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowControls {
    TrafficLights(TrafficLightStyle),
    Windows { dark: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficLightStyle {
    /// Red / yellow / green.
    Classic,
    /// Outline-only circles.
    Adaptive,
    /// Uniform rose dots.
    Rose,
    /// Uniform muted-gray dots.
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleBar {
    pub height: f32,
    pub fill: FrameFill,
    pub separator: Option<Color32>,
    pub controls: WindowControls,
}

/// Decoration painted behind the frame body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    /// Two offset cards peeking out above the body.
    StackedCards { back: Color32, mid: Color32 },
    /// An elliptical soft shadow under the bottom edge.
    EclipseShadow { color: Color32 },
    /// A large blurred sheet behind and below the body.
    BlurSheet { color: Color32 },
}

/// The frame's own chrome shadow (distinct from the user shadow control,
/// which wraps the whole framed content).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeShadow {
    /// Four stacked 7%-alpha layers.
    Layered,
    /// Two soft 6-8%-alpha layers.
    Subtle,
}

/// A colored passe-partout around the card (Silver Back).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat {
    pub fill: FrameFill,
    pub padding: f32,
    pub radius: f32,
}

/// Structured description of one frame variant at a given corner radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDecoration {
    /// Corner radius of the frame's outer border; variants may clamp or
    /// floor the requested radius.
    pub outer_radius: f32,
    pub body: FrameFill,
    pub border: Option<FrameBorder>,
    pub title_bar: Option<TitleBar>,
    pub backdrop: Option<Backdrop>,
    pub mat: Option<Mat>,
    pub shadow: Option<ChromeShadow>,
}

fn bar(fill: FrameFill, separator: Option<Color32>, controls: WindowControls) -> Option<TitleBar> {
    Some(TitleBar {
        height: TITLE_BAR_HEIGHT,
        fill,
        separator,
        controls,
    })
}

/// Resolve a variant into its paintable description. `None` for
/// [`FrameVariant::None`]: the screenshot is presented bare and keeps its
/// own radius and shadow.
pub fn decorate(variant: FrameVariant, radius: f32) -> Option<FrameDecoration> {
    use FrameVariant::{
        Arc, Eclipse, Emotion, MacosAdaptive, MacosDark, MacosLight, MacosSubtle, Ruler,
        ShadowBack, Shortboard, SilverBack, StackDark, StackLight, WindowsDark, WindowsLight,
    };
    use TrafficLightStyle::{Adaptive, Classic, Muted, Rose};

    let plain = FrameDecoration {
        outer_radius: radius,
        body: FrameFill::Solid(Color32::WHITE),
        border: None,
        title_bar: None,
        backdrop: None,
        mat: None,
        shadow: None,
    };

    let deco = match variant {
        FrameVariant::None => return None,

        Arc => FrameDecoration {
            border: Some(FrameBorder {
                width: 2.0,
                color: ZINC_200,
                dashed: false,
            }),
            shadow: Some(ChromeShadow::Subtle),
            ..plain
        },

        StackLight => FrameDecoration {
            backdrop: Some(Backdrop::StackedCards {
                back: with_alpha(ZINC_200, 0.7),
                mid: ZINC_100,
            }),
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            shadow: Some(ChromeShadow::Subtle),
            ..plain
        },

        StackDark => FrameDecoration {
            backdrop: Some(Backdrop::StackedCards {
                back: with_alpha(ZINC_600, 0.6),
                mid: ZINC_700,
            }),
            body: FrameFill::Solid(ZINC_800),
            ..plain
        },

        MacosLight => FrameDecoration {
            border: Some(FrameBorder {
                width: 1.0,
                color: with_alpha(ZINC_200, 0.8),
                dashed: false,
            }),
            title_bar: bar(
                FrameFill::Gradient(
                    Color32::from_rgb(0xf6, 0xf6, 0xf6),
                    Color32::from_rgb(0xe8, 0xe8, 0xe8),
                ),
                Some(with_alpha(ZINC_200, 0.6)),
                WindowControls::TrafficLights(Classic),
            ),
            shadow: Some(ChromeShadow::Layered),
            ..plain
        },

        MacosDark => FrameDecoration {
            body: FrameFill::Solid(ZINC_800),
            title_bar: bar(
                FrameFill::Solid(ZINC_700),
                None,
                WindowControls::TrafficLights(Classic),
            ),
            shadow: Some(ChromeShadow::Layered),
            ..plain
        },

        MacosSubtle => FrameDecoration {
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            title_bar: bar(
                FrameFill::Solid(Color32::WHITE),
                Some(ZINC_100),
                WindowControls::TrafficLights(Classic),
            ),
            shadow: Some(ChromeShadow::Subtle),
            ..plain
        },

        MacosAdaptive => FrameDecoration {
            body: FrameFill::Solid(ZINC_50),
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            title_bar: bar(
                FrameFill::Solid(with_alpha(ZINC_100, 0.6)),
                Some(ZINC_200),
                WindowControls::TrafficLights(Adaptive),
            ),
            shadow: Some(ChromeShadow::Subtle),
            ..plain
        },

        Eclipse => FrameDecoration {
            backdrop: Some(Backdrop::EclipseShadow {
                color: with_alpha(ZINC_400, 0.4),
            }),
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            shadow: Some(ChromeShadow::Subtle),
            ..plain
        },

        SilverBack => FrameDecoration {
            // Rose passe-partout; the inner card pulls its radius in.
            outer_radius: (radius - 4.0).max(4.0),
            mat: Some(Mat {
                fill: FrameFill::Gradient(ROSE_100, ROSE_200),
                padding: 12.0,
                radius,
            }),
            border: Some(FrameBorder {
                width: 1.0,
                color: with_alpha(ROSE_200, 0.6),
                dashed: false,
            }),
            title_bar: bar(
                FrameFill::Solid(with_alpha(ROSE_50, 0.8)),
                Some(ROSE_100),
                WindowControls::TrafficLights(Rose),
            ),
            shadow: Some(ChromeShadow::Subtle),
            ..plain
        },

        ShadowBack => FrameDecoration {
            backdrop: Some(Backdrop::BlurSheet {
                color: with_alpha(ZINC_400, 0.3),
            }),
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            title_bar: bar(
                FrameFill::Solid(ZINC_50),
                Some(ZINC_100),
                WindowControls::TrafficLights(Muted),
            ),
            shadow: Some(ChromeShadow::Layered),
            ..plain
        },

        WindowsLight => FrameDecoration {
            outer_radius: radius.min(8.0),
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            title_bar: bar(
                FrameFill::Solid(ZINC_50),
                Some(ZINC_100),
                WindowControls::Windows { dark: false },
            ),
            shadow: Some(ChromeShadow::Layered),
            ..plain
        },

        WindowsDark => FrameDecoration {
            outer_radius: radius.min(8.0),
            body: FrameFill::Solid(ZINC_800),
            title_bar: bar(
                FrameFill::Solid(ZINC_700),
                None,
                WindowControls::Windows { dark: true },
            ),
            shadow: Some(ChromeShadow::Layered),
            ..plain
        },

        Shortboard => FrameDecoration {
            border: Some(FrameBorder {
                width: 3.0,
                color: ZINC_800,
                dashed: false,
            }),
            ..plain
        },

        Ruler => FrameDecoration {
            border: Some(FrameBorder {
                width: 2.0,
                color: ZINC_400,
                dashed: true,
            }),
            ..plain
        },

        Emotion => FrameDecoration {
            outer_radius: radius.max(20.0),
            body: FrameFill::Gradient(ZINC_50, ZINC_100),
            border: Some(FrameBorder {
                width: 1.0,
                color: ZINC_200,
                dashed: false,
            }),
            shadow: Some(ChromeShadow::Layered),
            ..plain
        },
    };

    Some(deco)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_yields_no_decoration() {
        assert!(decorate(FrameVariant::None, 16.0).is_none());
    }

    #[test]
    fn every_other_variant_decorates() {
        for variant in FrameVariant::ALL {
            if variant != FrameVariant::None {
                assert!(decorate(variant, 16.0).is_some(), "{variant:?}");
            }
        }
    }

    #[test]
    fn windows_variants_clamp_radius() {
        let d = decorate(FrameVariant::WindowsLight, 24.0).unwrap();
        assert_eq!(d.outer_radius, 8.0);
        let d = decorate(FrameVariant::WindowsDark, 4.0).unwrap();
        assert_eq!(d.outer_radius, 4.0);
    }

    #[test]
    fn emotion_floors_radius() {
        let d = decorate(FrameVariant::Emotion, 4.0).unwrap();
        assert_eq!(d.outer_radius, 20.0);
        let d = decorate(FrameVariant::Emotion, 32.0).unwrap();
        assert_eq!(d.outer_radius, 32.0);
    }

    #[test]
    fn silver_back_insets_the_card_radius() {
        let d = decorate(FrameVariant::SilverBack, 16.0).unwrap();
        assert_eq!(d.outer_radius, 12.0);
        assert_eq!(d.mat.unwrap().radius, 16.0);

        // Never collapses below the floor.
        let d = decorate(FrameVariant::SilverBack, 2.0).unwrap();
        assert_eq!(d.outer_radius, 4.0);
    }

    #[test]
    fn serde_names_are_kebab_case() {
        let json = serde_json::to_string(&FrameVariant::MacosLight).unwrap();
        assert_eq!(json, "\"macos-light\"");
        let back: FrameVariant = serde_json::from_str("\"silver-back\"").unwrap();
        assert_eq!(back, FrameVariant::SilverBack);
    }
}
