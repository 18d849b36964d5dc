use eframe::egui;
use egui::{Color32, Rounding, Sense, Slider, Stroke, Ui, vec2};

use crate::app::ScreenGlossApp;
use crate::compose::frame::FrameVariant;
use crate::compose::gradients::GRADIENTS;
use crate::compose::patterns::PatternKind;
use crate::export::ExportFormat;
use crate::state::style::{
    BackgroundKind, CANVAS_MAX_SIZE, CANVAS_MIN_SIZE, CanvasPreset, ExportScale, MAX_NOISE_OPACITY,
    MAX_SHADOW, MAX_TILT_DEG,
};
use crate::store::StylePreset;

pub fn controls_panel(app: &mut ScreenGlossApp, ctx: &egui::Context) {
    egui::SidePanel::right("controls_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::CollapsingHeader::new("Style")
                    .default_open(true)
                    .show(ui, |ui| style_section(app, ui));
                egui::CollapsingHeader::new("Frame")
                    .default_open(false)
                    .show(ui, |ui| frame_section(app, ui));
                egui::CollapsingHeader::new("Background")
                    .default_open(true)
                    .show(ui, |ui| background_section(app, ui));
                egui::CollapsingHeader::new("Canvas")
                    .default_open(false)
                    .show(ui, |ui| canvas_section(app, ui));
                egui::CollapsingHeader::new("Presets")
                    .default_open(false)
                    .show(ui, |ui| presets_section(app, ui));
                egui::CollapsingHeader::new("Export")
                    .default_open(true)
                    .show(ui, |ui| export_section(app, ui));
            });
        });
}

fn style_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let style = &mut app.style;

    let mut padding = style.padding();
    if ui
        .add(Slider::new(&mut padding, 0.0..=200.0).text("Padding"))
        .changed()
    {
        style.set_padding(padding);
    }

    let mut image_radius = style.image_radius();
    if ui
        .add(Slider::new(&mut image_radius, 0.0..=48.0).text("Roundness"))
        .changed()
    {
        style.set_image_radius(image_radius);
    }

    let mut canvas_radius = style.canvas_radius();
    if ui
        .add(Slider::new(&mut canvas_radius, 0.0..=48.0).text("Canvas roundness"))
        .changed()
    {
        style.set_canvas_radius(canvas_radius);
    }

    ui.horizontal(|ui| {
        let mut shadow = style.shadow();
        if ui
            .add(Slider::new(&mut shadow, 0..=MAX_SHADOW).text("Shadow"))
            .changed()
        {
            style.set_shadow(shadow);
        }
        let mut shadow_color = style.shadow_color();
        if egui::color_picker::color_edit_button_srgba(
            ui,
            &mut shadow_color,
            egui::color_picker::Alpha::Opaque,
        )
        .changed()
        {
            style.set_shadow_color(shadow_color);
        }
    });

    ui.horizontal(|ui| {
        let mut inset = style.inset();
        if ui
            .add(Slider::new(&mut inset, 0.0..=32.0).text("Inset"))
            .changed()
        {
            style.set_inset(inset);
        }
        let mut inset_color = style.inset_color();
        if egui::color_picker::color_edit_button_srgba(
            ui,
            &mut inset_color,
            egui::color_picker::Alpha::Opaque,
        )
        .changed()
        {
            style.set_inset_color(inset_color);
        }
    });

    let mut rotate = style.rotate_z();
    if ui
        .add(Slider::new(&mut rotate, -180.0..=180.0).text("Rotate"))
        .changed()
    {
        style.set_rotate_z(rotate);
    }

    let mut tilt_x = style.tilt_x();
    if ui
        .add(Slider::new(&mut tilt_x, -MAX_TILT_DEG..=MAX_TILT_DEG).text("Tilt X"))
        .changed()
    {
        style.set_tilt_x(tilt_x);
    }

    let mut tilt_y = style.tilt_y();
    if ui
        .add(Slider::new(&mut tilt_y, -MAX_TILT_DEG..=MAX_TILT_DEG).text("Tilt Y"))
        .changed()
    {
        style.set_tilt_y(tilt_y);
    }
}

fn frame_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let current = app.style.frame();
    egui::Grid::new("frame_grid").num_columns(2).show(ui, |ui| {
        for (i, variant) in FrameVariant::ALL.into_iter().enumerate() {
            if ui
                .selectable_label(current == variant, variant.display_name())
                .clicked()
            {
                app.style.set_frame(variant);
            }
            if i % 2 == 1 {
                ui.end_row();
            }
        }
    });
}

fn background_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        for (kind, label) in [
            (BackgroundKind::Gradient, "Gradient"),
            (BackgroundKind::Pattern, "Pattern"),
            (BackgroundKind::Image, "Image"),
            (BackgroundKind::Ai, "AI"),
        ] {
            if ui
                .selectable_label(app.style.background() == kind, label)
                .clicked()
            {
                app.style.set_background(kind);
            }
        }
    });
    ui.add_space(4.0);

    match app.style.background() {
        BackgroundKind::Gradient => gradient_swatches(app, ui),
        BackgroundKind::Pattern => {
            ui.horizontal_wrapped(|ui| {
                for kind in PatternKind::ALL {
                    if ui
                        .selectable_label(app.style.pattern() == kind, kind.display_name())
                        .clicked()
                    {
                        app.style.set_pattern(kind);
                    }
                }
            });
        }
        BackgroundKind::Image | BackgroundKind::Ai => {
            match app.style.ai_background() {
                Some(bitmap) => {
                    ui.label(format!(
                        "using generated image ({}\u{d7}{})",
                        bitmap.width(),
                        bitmap.height()
                    ));
                }
                None => {
                    ui.label("no generated image yet \u{2014} use the AI panel");
                }
            }
        }
    }

    ui.add_space(4.0);
    let mut noise = app.style.noise_opacity();
    if ui
        .add(Slider::new(&mut noise, 0..=MAX_NOISE_OPACITY).text("Noise"))
        .changed()
    {
        app.style.set_noise_opacity(noise);
    }
}

fn gradient_swatches(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let selected = app.style.gradient_index();
    ui.horizontal_wrapped(|ui| {
        for (index, gradient) in GRADIENTS.iter().enumerate() {
            let (rect, response) = ui.allocate_exact_size(vec2(28.0, 20.0), Sense::click());
            let painter = ui.painter();
            // Two-tone swatch standing in for the full gradient.
            let mid = rect.center().x;
            painter.rect_filled(
                egui::Rect::from_min_max(rect.min, egui::pos2(mid, rect.max.y)),
                Rounding {
                    nw: 4.0,
                    sw: 4.0,
                    ne: 0.0,
                    se: 0.0,
                },
                gradient.stops[0],
            );
            painter.rect_filled(
                egui::Rect::from_min_max(egui::pos2(mid, rect.min.y), rect.max),
                Rounding {
                    nw: 0.0,
                    sw: 0.0,
                    ne: 4.0,
                    se: 4.0,
                },
                *gradient.stops.last().expect("gradient has stops"),
            );
            if selected == index {
                painter.rect_stroke(rect, Rounding::same(4.0), Stroke::new(2.0, Color32::WHITE));
            }
            let response = response.on_hover_text(gradient.name);
            if response.clicked() {
                app.style.set_gradient_index(index);
                app.style.set_background(BackgroundKind::Gradient);
            }
        }
    });
}

fn canvas_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let current = app.style.canvas_preset();
    egui::ComboBox::from_label("Size")
        .selected_text(current.display_name())
        .show_ui(ui, |ui| {
            for preset in CanvasPreset::ALL {
                if ui
                    .selectable_label(current == preset, preset.display_name())
                    .clicked()
                {
                    app.style.set_canvas_preset(preset);
                }
            }
        });

    if app.style.canvas_preset() == CanvasPreset::Free {
        ui.horizontal(|ui| {
            let mut width = app.style.canvas_width();
            if ui
                .add(
                    egui::DragValue::new(&mut width)
                        .range(CANVAS_MIN_SIZE..=CANVAS_MAX_SIZE)
                        .prefix("w "),
                )
                .changed()
            {
                app.style.set_canvas_width(width);
            }
            let mut height = app.style.canvas_height();
            if ui
                .add(
                    egui::DragValue::new(&mut height)
                        .range(CANVAS_MIN_SIZE..=CANVAS_MAX_SIZE)
                        .prefix("h "),
                )
                .changed()
            {
                app.style.set_canvas_height(height);
            }
        });
    }
}

fn presets_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut app.preset_name);
        let name_ok = !app.preset_name.trim().is_empty();
        if ui.add_enabled(name_ok, egui::Button::new("Save")).clicked() {
            let preset = StylePreset::capture(app.preset_name.trim(), &app.style);
            match app.store.save_style_preset(preset) {
                Ok(()) => {
                    app.preset_name.clear();
                    app.refresh_presets();
                }
                Err(err) => {
                    log::error!("could not save preset: {err}");
                    app.set_status(format!("could not save preset: {err}"));
                }
            }
        }
    });

    let presets = app.style_presets.clone();
    for preset in &presets {
        ui.horizontal(|ui| {
            if ui.button(&preset.name).clicked() {
                preset.apply(&mut app.style);
            }
            if ui.small_button("\u{1f5d1}").clicked() {
                if let Err(err) = app.store.delete_style_preset(preset.id) {
                    log::error!("could not delete preset: {err}");
                }
                app.refresh_presets();
            }
        });
    }
}

fn export_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Scale");
        for scale in ExportScale::ALL {
            if ui
                .selectable_label(
                    app.style.export_scale() == scale,
                    format!("{}x", scale.factor()),
                )
                .clicked()
            {
                app.style.set_export_scale(scale);
            }
        }
    });

    let exporting = app.pending_export.is_some();
    ui.horizontal(|ui| {
        for format in ExportFormat::ALL {
            if ui
                .add_enabled(!exporting, egui::Button::new(format.label()))
                .clicked()
            {
                app.request_export(ui.ctx(), format);
            }
        }
    });
    if exporting {
        ui.label(egui::RichText::new("capturing\u{2026}").weak());
    }
}
