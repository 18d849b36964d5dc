mod ai_panel;
mod central_panel;
mod controls_panel;

pub use ai_panel::ai_panel;
pub use central_panel::central_panel;
pub use controls_panel::controls_panel;

use eframe::egui;

use crate::app::ScreenGlossApp;

/// Application header: AI panel toggle, replace/clear, status line.
pub fn top_bar(app: &mut ScreenGlossApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("screengloss");
            ui.separator();

            if ui
                .selectable_label(app.show_ai_panel, "\u{2728} AI")
                .clicked()
            {
                app.show_ai_panel = !app.show_ai_panel;
            }

            if app.has_image() {
                ui.separator();
                if ui.button("Clear image").clicked() {
                    app.clear_image();
                }
            }

            if let Some(status) = app.status.clone() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("\u{2715}").clicked() {
                        app.status = None;
                    }
                    ui.label(egui::RichText::new(status).weak());
                });
            }
        });
    });
}
