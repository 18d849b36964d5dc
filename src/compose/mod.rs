//! The compositing engine: a pure mapping from style parameters and a
//! source image to an ordered stack of render layers.
//!
//! [`compose`] owns no state and touches no clock; identical inputs yield
//! identical layers (gradient, pattern, and frame lookups are all
//! table-driven), so the renderer and the export path always agree on what
//! the canvas looks like.

pub mod frame;
pub mod gradients;
pub mod patterns;

use egui::{Color32, Vec2};
use uuid::Uuid;

use crate::image::SourceImage;
use crate::state::style::{BackgroundKind, StyleState};
use frame::FrameDecoration;
use gradients::Gradient;
use patterns::PatternKind;

/// Perspective distance for the 3D tilt, px.
pub const PERSPECTIVE: f32 = 1000.0;

/// Background fill color when an image/AI background is selected but no
/// bitmap is available.
pub const FALLBACK_BACKGROUND: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a);

/// The ordered layer stack for one frame of the canvas. Derived, never
/// stored; recomputed from scratch on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayers {
    pub canvas: CanvasGeometry,
    pub background: BackgroundLayer,
    pub pattern: Option<PatternLayer>,
    pub noise: Option<NoiseLayer>,
    pub content: ContentLayer,
}

/// Size and rounding of the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Canvas pixel size; `None` sizes the canvas to its content.
    pub size: Option<Vec2>,
    /// Uniform scale that fits a fixed-size canvas into the viewport for
    /// preview (never upscales).
    pub fit_scale: f32,
    pub radius: f32,
    pub padding: f32,
}

/// Bottom-most layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundLayer {
    Gradient(&'static Gradient),
    /// A bitmap stretched to cover the canvas, centered, cropped to aspect.
    Cover { image: Uuid, image_size: Vec2 },
    Solid(Color32),
}

/// Tiled decorative overlay above the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternLayer {
    pub kind: PatternKind,
    pub radius: f32,
}

/// Film-grain overlay above the pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseLayer {
    /// 0..=0.2 alpha.
    pub opacity: f32,
    pub radius: f32,
}

/// The screenshot with its transform, shadow, inset, and optional frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentLayer {
    pub image: Uuid,
    /// Natural pixel size of the screenshot.
    pub image_size: Vec2,
    pub transform: Transform3d,
    pub shadow: Option<DropShadow>,
    pub inset: Option<InsetRing>,
    pub frame: Option<FrameDecoration>,
    /// Rounding of the screenshot edge itself; zero whenever a frame owns
    /// the outer radius.
    pub image_radius: f32,
}

/// 3D orientation of the content under a fixed perspective. Rotation order
/// is Z, then X, then Y; changing the order changes the picture, so it is
/// part of the contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3d {
    pub perspective: f32,
    pub rotate_z_deg: f32,
    pub tilt_x_deg: f32,
    pub tilt_y_deg: f32,
}

impl Transform3d {
    pub fn is_identity(&self) -> bool {
        self.rotate_z_deg == 0.0 && self.tilt_x_deg == 0.0 && self.tilt_y_deg == 0.0
    }

    /// Project a point given relative to the content center onto the screen
    /// plane: rotate around Z, tilt around X, tilt around Y, then divide by
    /// perspective.
    pub fn project(&self, point: Vec2) -> Vec2 {
        let (sz, cz) = self.rotate_z_deg.to_radians().sin_cos();
        let (sx, cx) = self.tilt_x_deg.to_radians().sin_cos();
        let (sy, cy) = self.tilt_y_deg.to_radians().sin_cos();

        let (x, y, z) = (point.x * cz - point.y * sz, point.x * sz + point.y * cz, 0.0);
        let (x, y, z) = (x, y * cx - z * sx, y * sx + z * cx);
        let (x, y, z) = (x * cy + z * sy, y, -x * sy + z * cy);

        let w = self.perspective / (self.perspective - z).max(1.0);
        Vec2::new(x * w, y * w)
    }
}

/// Two stacked soft shadows whose reach grows linearly with intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub primary: ShadowSpec,
    pub secondary: ShadowSpec,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSpec {
    pub offset: Vec2,
    pub blur: f32,
    pub color: Color32,
}

/// Solid ring of fixed thickness around the content edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsetRing {
    pub thickness: f32,
    pub color: Color32,
}

/// Map shadow intensity (0-10) and base color to the layered shadow pair.
/// Zero intensity yields no shadow at all, not a zero-size one.
pub fn drop_shadow(intensity: u8, color: Color32) -> Option<DropShadow> {
    if intensity == 0 {
        return None;
    }
    let s = intensity as f32;
    let tinted = |alpha: f32| {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (alpha * 255.0) as u8)
    };
    Some(DropShadow {
        primary: ShadowSpec {
            offset: Vec2::new(0.0, s * 4.0),
            blur: s * 8.0,
            color: tinted(0.10 + 0.05 * s),
        },
        secondary: ShadowSpec {
            offset: Vec2::new(0.0, s * 2.0),
            blur: s * 4.0,
            color: tinted(0.10 + 0.03 * s),
        },
    })
}

/// Compute the layer stack for the current style over `image`, previewed
/// inside `viewport` (used only to derive the fixed-canvas fit scale).
pub fn compose(style: &StyleState, image: &SourceImage, viewport: Vec2) -> RenderLayers {
    let canvas_size = style
        .effective_canvas_size()
        .map(|[w, h]| Vec2::new(w as f32, h as f32));

    let fit_scale = match canvas_size {
        Some(size) if size.x > 0.0 && size.y > 0.0 => {
            (viewport.x / size.x).min(viewport.y / size.y).min(1.0)
        }
        _ => 1.0,
    };

    let background = match style.background() {
        BackgroundKind::Gradient => {
            BackgroundLayer::Gradient(gradients::gradient(style.gradient_index()))
        }
        BackgroundKind::Ai | BackgroundKind::Image => match style.ai_background() {
            Some(bitmap) => BackgroundLayer::Cover {
                image: bitmap.id(),
                image_size: bitmap.size(),
            },
            None => BackgroundLayer::Solid(FALLBACK_BACKGROUND),
        },
        BackgroundKind::Pattern => BackgroundLayer::Solid(FALLBACK_BACKGROUND),
    };

    let pattern = match style.pattern() {
        PatternKind::None => None,
        kind => Some(PatternLayer {
            kind,
            radius: style.canvas_radius(),
        }),
    };

    let noise = match style.noise_opacity() {
        0 => None,
        opacity => Some(NoiseLayer {
            opacity: opacity as f32 / 100.0,
            radius: style.canvas_radius(),
        }),
    };

    let frame = frame::decorate(style.frame(), style.image_radius());
    let shadow = drop_shadow(style.shadow(), style.shadow_color());
    let inset = if style.inset() > 0.0 {
        Some(InsetRing {
            thickness: style.inset(),
            color: style.inset_color(),
        })
    } else {
        None
    };

    let content = ContentLayer {
        image: image.id(),
        image_size: image.size(),
        transform: Transform3d {
            perspective: PERSPECTIVE,
            rotate_z_deg: style.rotate_z(),
            tilt_x_deg: style.tilt_x(),
            tilt_y_deg: style.tilt_y(),
        },
        shadow,
        inset,
        // With a frame, the chrome owns rounding; the raw screenshot edge
        // stays square.
        image_radius: if frame.is_some() {
            0.0
        } else {
            style.image_radius()
        },
        frame,
    };

    RenderLayers {
        canvas: CanvasGeometry {
            size: canvas_size,
            fit_scale,
            radius: style.canvas_radius(),
            padding: style.padding(),
        },
        background,
        pattern,
        noise,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::frame::FrameVariant;
    use crate::state::style::CanvasPreset;

    fn test_image() -> SourceImage {
        SourceImage::from_rgba(4, 4, vec![128; 4 * 4 * 4], "test")
    }

    const VIEWPORT: Vec2 = Vec2::new(600.0, 400.0);

    #[test]
    fn compose_is_deterministic() {
        let style = StyleState::default();
        let image = test_image();
        let a = compose(&style, &image, VIEWPORT);
        let b = compose(&style, &image, VIEWPORT);
        assert_eq!(a, b);
    }

    #[test]
    fn shadow_zero_produces_no_layer() {
        let mut style = StyleState::default();
        style.set_shadow(0);
        let layers = compose(&style, &test_image(), VIEWPORT);
        assert_eq!(layers.content.shadow, None);
    }

    #[test]
    fn shadow_alphas_grow_linearly() {
        let shadow = drop_shadow(3, Color32::BLACK).unwrap();
        assert_eq!(shadow.primary.offset, Vec2::new(0.0, 12.0));
        assert_eq!(shadow.primary.blur, 24.0);
        assert_eq!(shadow.primary.color.a(), ((0.10 + 0.15) * 255.0) as u8);
        assert_eq!(shadow.secondary.offset, Vec2::new(0.0, 6.0));
        assert_eq!(shadow.secondary.blur, 12.0);
        assert_eq!(shadow.secondary.color.a(), ((0.10 + 0.09) * 255.0) as u8);
    }

    #[test]
    fn out_of_range_gradient_falls_back() {
        let mut style = StyleState::default();
        style.set_gradient_index(9999);
        let layers = compose(&style, &test_image(), VIEWPORT);
        assert_eq!(
            layers.background,
            BackgroundLayer::Gradient(&gradients::GRADIENTS[0])
        );
    }

    #[test]
    fn frame_takes_over_radius_and_shadow_placement() {
        let mut style = StyleState::default();
        style.set_frame(FrameVariant::MacosLight);
        style.set_image_radius(16.0);
        style.set_shadow(3);

        let layers = compose(&style, &test_image(), VIEWPORT);
        let content = &layers.content;

        // Chrome owns the outer radius; the screenshot edge is square.
        assert_eq!(content.image_radius, 0.0);
        let frame = content.frame.as_ref().unwrap();
        assert_eq!(frame.outer_radius, 16.0);
        // The shadow still exists and wraps the framed content.
        assert!(content.shadow.is_some());
    }

    #[test]
    fn ai_background_without_bitmap_falls_back_to_solid() {
        let mut style = StyleState::default();
        style.set_background(BackgroundKind::Ai);
        let layers = compose(&style, &test_image(), VIEWPORT);
        assert_eq!(layers.background, BackgroundLayer::Solid(FALLBACK_BACKGROUND));
    }

    #[test]
    fn fixed_canvas_fits_viewport_without_upscaling() {
        let mut style = StyleState::default();
        style.set_canvas_preset(CanvasPreset::Tweet);
        let layers = compose(&style, &test_image(), VIEWPORT);
        assert_eq!(layers.canvas.size, Some(Vec2::new(1200.0, 675.0)));
        assert_eq!(layers.canvas.fit_scale, 0.5);

        // Plenty of room: no upscale past 1.
        let layers = compose(&style, &test_image(), Vec2::new(5000.0, 5000.0));
        assert_eq!(layers.canvas.fit_scale, 1.0);
    }

    #[test]
    fn transform_projection_is_stable_at_identity() {
        let t = Transform3d {
            perspective: PERSPECTIVE,
            rotate_z_deg: 0.0,
            tilt_x_deg: 0.0,
            tilt_y_deg: 0.0,
        };
        assert!(t.is_identity());
        let p = t.project(Vec2::new(100.0, -50.0));
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y + 50.0).abs() < 1e-4);
    }

    #[test]
    fn tilt_pulls_one_edge_toward_the_viewer() {
        let t = Transform3d {
            perspective: PERSPECTIVE,
            rotate_z_deg: 0.0,
            tilt_x_deg: 0.0,
            tilt_y_deg: 15.0,
        };
        let left = t.project(Vec2::new(-100.0, 0.0));
        let right = t.project(Vec2::new(100.0, 0.0));
        // Under perspective the two halves foreshorten differently.
        assert!(left.x.abs() != right.x.abs());
    }
}
