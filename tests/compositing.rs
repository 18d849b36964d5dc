use egui::{Color32, Vec2};
use screengloss::compose::frame::{FrameVariant, WindowControls, decorate};
use screengloss::compose::gradients::GRADIENTS;
use screengloss::compose::patterns::PatternKind;
use screengloss::compose::{BackgroundLayer, compose, drop_shadow};
use screengloss::image::SourceImage;
use screengloss::state::style::{BackgroundKind, CanvasPreset, StyleState};

fn screenshot() -> SourceImage {
    SourceImage::from_rgba(640, 400, vec![200; 640 * 400 * 4], "shot.png")
}

const VIEWPORT: Vec2 = Vec2::new(900.0, 700.0);

#[test]
fn identical_inputs_compose_identical_layers() {
    let mut style = StyleState::default();
    style.set_shadow(5);
    style.set_frame(FrameVariant::Eclipse);
    style.set_pattern(PatternKind::Dots);
    style.set_noise_opacity(10);
    style.set_tilt_x(7.0);
    let image = screenshot();

    let a = compose(&style, &image, VIEWPORT);
    let b = compose(&style, &image, VIEWPORT);
    assert_eq!(a, b);
}

#[test]
fn shadow_zero_means_no_shadow_layer_at_all() {
    let mut style = StyleState::default();
    style.set_shadow(0);
    let layers = compose(&style, &screenshot(), VIEWPORT);
    assert!(layers.content.shadow.is_none());

    // And not merely a zero-magnitude one at intensity 1.
    let shadow = drop_shadow(1, Color32::BLACK).unwrap();
    assert!(shadow.primary.blur > 0.0);
}

#[test]
fn out_of_range_gradient_index_resolves_to_first_entry() {
    let mut style = StyleState::default();
    let image = screenshot();

    style.set_gradient_index(GRADIENTS.len() + 12);
    let layers = compose(&style, &image, VIEWPORT);
    assert_eq!(layers.background, BackgroundLayer::Gradient(&GRADIENTS[0]));

    style.set_gradient_index(2);
    let layers = compose(&style, &image, VIEWPORT);
    assert_eq!(layers.background, BackgroundLayer::Gradient(&GRADIENTS[2]));
}

#[test]
fn framed_content_gives_radius_and_shadow_to_the_chrome() {
    // macos-light, shadow 3, radius 16: the frame owns the outer radius and
    // the shadow wraps the chrome; the inner screenshot is unrounded.
    let mut style = StyleState::default();
    style.set_frame(FrameVariant::MacosLight);
    style.set_shadow(3);
    style.set_image_radius(16.0);

    let layers = compose(&style, &screenshot(), VIEWPORT);
    let content = &layers.content;

    assert_eq!(content.image_radius, 0.0);
    let frame = content.frame.as_ref().expect("frame decoration");
    assert_eq!(frame.outer_radius, 16.0);
    assert!(frame.title_bar.is_some());
    assert!(content.shadow.is_some());
}

#[test]
fn frameless_content_keeps_radius_on_the_image_edge() {
    let mut style = StyleState::default();
    style.set_frame(FrameVariant::None);
    style.set_image_radius(24.0);

    let layers = compose(&style, &screenshot(), VIEWPORT);
    assert!(layers.content.frame.is_none());
    assert_eq!(layers.content.image_radius, 24.0);
}

#[test]
fn every_frame_variant_composes() {
    let image = screenshot();
    for variant in FrameVariant::ALL {
        let mut style = StyleState::default();
        style.set_frame(variant);
        let layers = compose(&style, &image, VIEWPORT);
        assert_eq!(layers.content.frame.is_some(), variant != FrameVariant::None);
    }
}

#[test]
fn windows_frames_draw_windows_controls() {
    let deco = decorate(FrameVariant::WindowsDark, 16.0).unwrap();
    let bar = deco.title_bar.unwrap();
    assert!(matches!(bar.controls, WindowControls::Windows { dark: true }));
    // Windows chrome caps the radius.
    assert_eq!(deco.outer_radius, 8.0);
}

#[test]
fn pattern_none_yields_no_overlay() {
    let mut style = StyleState::default();
    style.set_background(BackgroundKind::Pattern);
    style.set_pattern(PatternKind::None);
    let layers = compose(&style, &screenshot(), VIEWPORT);
    assert!(layers.pattern.is_none());

    style.set_pattern(PatternKind::Waves);
    let layers = compose(&style, &screenshot(), VIEWPORT);
    assert_eq!(layers.pattern.unwrap().kind, PatternKind::Waves);
}

#[test]
fn noise_zero_yields_no_overlay() {
    let mut style = StyleState::default();
    style.set_noise_opacity(0);
    assert!(compose(&style, &screenshot(), VIEWPORT).noise.is_none());

    style.set_noise_opacity(15);
    let layers = compose(&style, &screenshot(), VIEWPORT);
    assert!((layers.noise.unwrap().opacity - 0.15).abs() < 1e-6);
}

#[test]
fn ai_background_cover_uses_the_stored_bitmap() {
    let mut style = StyleState::default();
    let backdrop = SourceImage::from_rgba(32, 16, vec![90; 32 * 16 * 4], "generated");
    style.set_ai_background(Some(backdrop.clone()));
    style.set_background(BackgroundKind::Ai);

    let layers = compose(&style, &screenshot(), VIEWPORT);
    match layers.background {
        BackgroundLayer::Cover { image, image_size } => {
            assert_eq!(image, backdrop.id());
            assert_eq!(image_size, Vec2::new(32.0, 16.0));
        }
        other => panic!("expected cover background, got {other:?}"),
    }
}

#[test]
fn switching_background_kind_keeps_stale_selections() {
    let mut style = StyleState::default();
    style.set_gradient_index(4);
    let backdrop = SourceImage::from_rgba(8, 8, vec![1; 8 * 8 * 4], "generated");
    style.set_ai_background(Some(backdrop));

    style.set_background(BackgroundKind::Ai);
    assert!(matches!(
        compose(&style, &screenshot(), VIEWPORT).background,
        BackgroundLayer::Cover { .. }
    ));

    // Back to gradient: the old index is still there.
    style.set_background(BackgroundKind::Gradient);
    assert_eq!(
        compose(&style, &screenshot(), VIEWPORT).background,
        BackgroundLayer::Gradient(&GRADIENTS[4])
    );
    // The AI bitmap survived the round trip too.
    assert!(style.ai_background().is_some());
}

#[test]
fn transform_rotation_order_is_z_then_x_then_y() {
    let mut style = StyleState::default();
    style.set_rotate_z(30.0);
    style.set_tilt_x(10.0);
    style.set_tilt_y(-5.0);
    let layers = compose(&style, &screenshot(), VIEWPORT);
    let t = layers.content.transform;

    // The projection of a probe point must match the hand-computed
    // Z-then-X-then-Y composition; any other order moves the point.
    let probe = Vec2::new(120.0, 80.0);
    let projected = t.project(probe);

    let (sz, cz) = 30.0f32.to_radians().sin_cos();
    let (sx, cx) = 10.0f32.to_radians().sin_cos();
    let (sy, cy) = (-5.0f32).to_radians().sin_cos();
    let (x1, y1, z1) = (probe.x * cz - probe.y * sz, probe.x * sz + probe.y * cz, 0.0f32);
    let (x2, y2, z2) = (x1, y1 * cx - z1 * sx, y1 * sx + z1 * cx);
    let (x3, y3, z3) = (x2 * cy + z2 * sy, y2, -x2 * sy + z2 * cy);
    let w = 1000.0 / (1000.0 - z3);
    assert!((projected.x - x3 * w).abs() < 1e-3);
    assert!((projected.y - y3 * w).abs() < 1e-3);
}

#[test]
fn free_canvas_dimensions_are_clamped_in_the_composite() {
    let mut style = StyleState::default();
    style.set_canvas_preset(CanvasPreset::Free);
    style.set_canvas_width(50);       // below the floor
    style.set_canvas_height(9_000);   // above the ceiling

    let layers = compose(&style, &screenshot(), VIEWPORT);
    assert_eq!(layers.canvas.size, Some(Vec2::new(100.0, 4000.0)));
}
