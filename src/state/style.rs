//! All visual parameters of an editing session.
//!
//! One mutable record per session, mutated field-by-field from the control
//! panels (single writer, no transactions). Setters clamp ranged values on
//! write so the compositing engine can assume valid inputs.

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::compose::frame::FrameVariant;
use crate::compose::patterns::PatternKind;
use crate::image::SourceImage;

/// Tilt limit for the 3D lean, degrees per axis.
pub const MAX_TILT_DEG: f32 = 15.0;
/// Shadow intensity steps.
pub const MAX_SHADOW: u8 = 10;
/// Noise overlay opacity ceiling, percent.
pub const MAX_NOISE_OPACITY: u8 = 20;
/// Free-size canvas bounds, px per axis.
pub const CANVAS_MIN_SIZE: u32 = 100;
pub const CANVAS_MAX_SIZE: u32 = 4000;

/// Which background source is active. Switching kinds does not clear the
/// other kinds' fields; each remembers its last choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    #[default]
    Gradient,
    Pattern,
    Image,
    Ai,
}

/// Canvas size: content-sized, explicit, or a fixed social-media preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasPreset {
    #[default]
    Auto,
    Free,
    Tweet,
    Instagram,
    InstagramStory,
    AppStore,
}

impl CanvasPreset {
    pub const ALL: [CanvasPreset; 6] = [
        CanvasPreset::Auto,
        CanvasPreset::Free,
        CanvasPreset::Tweet,
        CanvasPreset::Instagram,
        CanvasPreset::InstagramStory,
        CanvasPreset::AppStore,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CanvasPreset::Auto => "Auto",
            CanvasPreset::Free => "Free",
            CanvasPreset::Tweet => "Tweet (1200\u{d7}675)",
            CanvasPreset::Instagram => "Instagram (1080\u{d7}1080)",
            CanvasPreset::InstagramStory => "Story (1080\u{d7}1920)",
            CanvasPreset::AppStore => "App Store (1284\u{d7}2778)",
        }
    }

    /// The preset's fixed pixel size; `None` for Auto and Free.
    pub fn fixed_size(&self) -> Option<[u32; 2]> {
        match self {
            CanvasPreset::Auto | CanvasPreset::Free => None,
            CanvasPreset::Tweet => Some([1200, 675]),
            CanvasPreset::Instagram => Some([1080, 1080]),
            CanvasPreset::InstagramStory => Some([1080, 1920]),
            CanvasPreset::AppStore => Some([1284, 2778]),
        }
    }
}

/// Export pixel-density multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportScale {
    One,
    #[default]
    Two,
    Three,
}

impl ExportScale {
    pub const ALL: [ExportScale; 3] = [ExportScale::One, ExportScale::Two, ExportScale::Three];

    pub fn factor(&self) -> u32 {
        match self {
            ExportScale::One => 1,
            ExportScale::Two => 2,
            ExportScale::Three => 3,
        }
    }
}

/// The style record. Fields are private; ranged fields clamp in their
/// setters, everything else is last-writer-wins.
#[derive(Debug, Clone)]
pub struct StyleState {
    padding: f32,
    image_radius: f32,
    canvas_radius: f32,
    shadow: u8,
    shadow_color: Color32,
    inset: f32,
    inset_color: Color32,
    rotate_z: f32,
    tilt_x: f32,
    tilt_y: f32,
    frame: FrameVariant,
    background: BackgroundKind,
    gradient_index: usize,
    pattern: PatternKind,
    noise_opacity: u8,
    ai_background: Option<SourceImage>,
    canvas_preset: CanvasPreset,
    canvas_width: u32,
    canvas_height: u32,
    export_scale: ExportScale,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            padding: 64.0,
            image_radius: 16.0,
            canvas_radius: 16.0,
            shadow: 3,
            shadow_color: Color32::BLACK,
            inset: 0.0,
            inset_color: Color32::from_rgb(0xf8, 0x71, 0x71),
            rotate_z: 0.0,
            tilt_x: 0.0,
            tilt_y: 0.0,
            frame: FrameVariant::None,
            background: BackgroundKind::Gradient,
            gradient_index: 0,
            pattern: PatternKind::None,
            noise_opacity: 0,
            ai_background: None,
            canvas_preset: CanvasPreset::Auto,
            canvas_width: 1200,
            canvas_height: 800,
            export_scale: ExportScale::Two,
        }
    }
}

impl StyleState {
    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: f32) {
        self.padding = padding.max(0.0);
    }

    pub fn image_radius(&self) -> f32 {
        self.image_radius
    }

    pub fn set_image_radius(&mut self, radius: f32) {
        self.image_radius = radius.max(0.0);
    }

    pub fn canvas_radius(&self) -> f32 {
        self.canvas_radius
    }

    pub fn set_canvas_radius(&mut self, radius: f32) {
        self.canvas_radius = radius.max(0.0);
    }

    pub fn shadow(&self) -> u8 {
        self.shadow
    }

    pub fn set_shadow(&mut self, shadow: u8) {
        self.shadow = shadow.min(MAX_SHADOW);
    }

    pub fn shadow_color(&self) -> Color32 {
        self.shadow_color
    }

    pub fn set_shadow_color(&mut self, color: Color32) {
        self.shadow_color = color;
    }

    pub fn inset(&self) -> f32 {
        self.inset
    }

    pub fn set_inset(&mut self, inset: f32) {
        self.inset = inset.max(0.0);
    }

    pub fn inset_color(&self) -> Color32 {
        self.inset_color
    }

    pub fn set_inset_color(&mut self, color: Color32) {
        self.inset_color = color;
    }

    pub fn rotate_z(&self) -> f32 {
        self.rotate_z
    }

    pub fn set_rotate_z(&mut self, degrees: f32) {
        self.rotate_z = degrees.clamp(-180.0, 180.0);
    }

    pub fn tilt_x(&self) -> f32 {
        self.tilt_x
    }

    pub fn set_tilt_x(&mut self, degrees: f32) {
        self.tilt_x = degrees.clamp(-MAX_TILT_DEG, MAX_TILT_DEG);
    }

    pub fn tilt_y(&self) -> f32 {
        self.tilt_y
    }

    pub fn set_tilt_y(&mut self, degrees: f32) {
        self.tilt_y = degrees.clamp(-MAX_TILT_DEG, MAX_TILT_DEG);
    }

    pub fn frame(&self) -> FrameVariant {
        self.frame
    }

    pub fn set_frame(&mut self, frame: FrameVariant) {
        self.frame = frame;
    }

    pub fn background(&self) -> BackgroundKind {
        self.background
    }

    pub fn set_background(&mut self, kind: BackgroundKind) {
        self.background = kind;
    }

    /// Raw index into the gradient palette. May be out of range; the
    /// compositing lookup falls back to the first entry.
    pub fn gradient_index(&self) -> usize {
        self.gradient_index
    }

    pub fn set_gradient_index(&mut self, index: usize) {
        self.gradient_index = index;
    }

    pub fn pattern(&self) -> PatternKind {
        self.pattern
    }

    pub fn set_pattern(&mut self, pattern: PatternKind) {
        self.pattern = pattern;
    }

    pub fn noise_opacity(&self) -> u8 {
        self.noise_opacity
    }

    pub fn set_noise_opacity(&mut self, opacity: u8) {
        self.noise_opacity = opacity.min(MAX_NOISE_OPACITY);
    }

    pub fn ai_background(&self) -> Option<&SourceImage> {
        self.ai_background.as_ref()
    }

    pub fn set_ai_background(&mut self, image: Option<SourceImage>) {
        self.ai_background = image;
    }

    pub fn canvas_preset(&self) -> CanvasPreset {
        self.canvas_preset
    }

    pub fn set_canvas_preset(&mut self, preset: CanvasPreset) {
        self.canvas_preset = preset;
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn set_canvas_width(&mut self, width: u32) {
        self.canvas_width = width.clamp(CANVAS_MIN_SIZE, CANVAS_MAX_SIZE);
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    pub fn set_canvas_height(&mut self, height: u32) {
        self.canvas_height = height.clamp(CANVAS_MIN_SIZE, CANVAS_MAX_SIZE);
    }

    pub fn export_scale(&self) -> ExportScale {
        self.export_scale
    }

    pub fn set_export_scale(&mut self, scale: ExportScale) {
        self.export_scale = scale;
    }

    /// The canvas pixel size, or `None` when the canvas sizes itself to the
    /// content. Free-mode dimensions are re-clamped here as well, so a
    /// caller that bypassed the setters still cannot push an out-of-range
    /// size into the composite.
    pub fn effective_canvas_size(&self) -> Option<[u32; 2]> {
        match self.canvas_preset {
            CanvasPreset::Free => Some([
                self.canvas_width.clamp(CANVAS_MIN_SIZE, CANVAS_MAX_SIZE),
                self.canvas_height.clamp(CANVAS_MIN_SIZE, CANVAS_MAX_SIZE),
            ]),
            preset => preset.fixed_size(),
        }
    }

    /// Restore the default geometry and decoration controls. The background
    /// selection (kind, gradient, AI image) survives: resetting the look
    /// should not discard a chosen background.
    pub fn reset_controls(&mut self) {
        self.padding = 64.0;
        self.image_radius = 16.0;
        self.canvas_radius = 16.0;
        self.shadow = 3;
        self.inset = 0.0;
        self.rotate_z = 0.0;
        self.tilt_x = 0.0;
        self.tilt_y = 0.0;
        self.frame = FrameVariant::None;
        self.noise_opacity = 0;
        self.pattern = PatternKind::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp_ranged_fields() {
        let mut style = StyleState::default();

        style.set_padding(-10.0);
        assert_eq!(style.padding(), 0.0);

        style.set_shadow(200);
        assert_eq!(style.shadow(), MAX_SHADOW);

        style.set_rotate_z(720.0);
        assert_eq!(style.rotate_z(), 180.0);

        style.set_tilt_x(-90.0);
        assert_eq!(style.tilt_x(), -MAX_TILT_DEG);

        style.set_noise_opacity(255);
        assert_eq!(style.noise_opacity(), MAX_NOISE_OPACITY);

        style.set_canvas_width(7);
        assert_eq!(style.canvas_width(), CANVAS_MIN_SIZE);
        style.set_canvas_height(100_000);
        assert_eq!(style.canvas_height(), CANVAS_MAX_SIZE);
    }

    #[test]
    fn reset_leaves_background_selection_alone() {
        let mut style = StyleState::default();
        style.set_background(BackgroundKind::Ai);
        style.set_gradient_index(7);
        style.set_shadow(9);
        style.set_frame(FrameVariant::MacosDark);
        style.set_pattern(PatternKind::Dots);

        style.reset_controls();

        assert_eq!(style.shadow(), 3);
        assert_eq!(style.frame(), FrameVariant::None);
        assert_eq!(style.pattern(), PatternKind::None);
        // The chosen background survives.
        assert_eq!(style.background(), BackgroundKind::Ai);
        assert_eq!(style.gradient_index(), 7);
    }

    #[test]
    fn background_fields_remember_last_choice_across_kind_switches() {
        let mut style = StyleState::default();
        style.set_gradient_index(5);
        style.set_pattern(PatternKind::Grid);

        style.set_background(BackgroundKind::Pattern);
        style.set_background(BackgroundKind::Gradient);

        // Neither switch cleared the other kind's selection.
        assert_eq!(style.gradient_index(), 5);
        assert_eq!(style.pattern(), PatternKind::Grid);
    }

    #[test]
    fn free_canvas_size_is_clamped_at_compose_time() {
        let mut style = StyleState::default();
        style.set_canvas_preset(CanvasPreset::Free);
        // Bypass the setters the way a deserializer might.
        style.canvas_width = 50;
        style.canvas_height = 99_999;

        assert_eq!(
            style.effective_canvas_size(),
            Some([CANVAS_MIN_SIZE, CANVAS_MAX_SIZE])
        );
    }

    #[test]
    fn preset_sizes_are_fixed() {
        let mut style = StyleState::default();
        style.set_canvas_preset(CanvasPreset::Tweet);
        assert_eq!(style.effective_canvas_size(), Some([1200, 675]));

        style.set_canvas_preset(CanvasPreset::Auto);
        assert_eq!(style.effective_canvas_size(), None);
    }
}
