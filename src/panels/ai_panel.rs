use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use eframe::egui;
use egui::{RichText, Ui};

use crate::ai::{AiMode, Role};
use crate::app::ScreenGlossApp;
use crate::image::SourceImage;
use crate::state::style::BackgroundKind;
use crate::store::{AVAILABLE_MODELS, AiPreset, AiPresetKind};

pub fn ai_panel(app: &mut ScreenGlossApp, ctx: &egui::Context) {
    egui::SidePanel::left("ai_panel")
        .resizable(true)
        .default_width(300.0)
        .show(ctx, |ui| {
            egui::CollapsingHeader::new("Settings")
                .default_open(!app.settings.has_api_key())
                .show(ui, |ui| settings_section(app, ui));
            ui.separator();
            chat_section(app, ui);
            ui.separator();
            egui::CollapsingHeader::new("Saved images")
                .default_open(false)
                .show(ui, |ui| presets_section(app, ui));
        });
}

fn settings_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let mut api_key = app.settings.api_key.clone().unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label("API key");
        if ui
            .add(egui::TextEdit::singleline(&mut api_key).password(true))
            .changed()
        {
            app.settings.api_key = Some(api_key.clone());
        }
    });

    let current_model = app.settings.model().to_owned();
    egui::ComboBox::from_label("Model")
        .selected_text(
            AVAILABLE_MODELS
                .iter()
                .find(|(id, _)| *id == current_model)
                .map(|(_, label)| *label)
                .unwrap_or(current_model.as_str()),
        )
        .show_ui(ui, |ui| {
            for (id, label) in AVAILABLE_MODELS {
                if ui
                    .selectable_label(current_model == id, label)
                    .clicked()
                {
                    app.settings.model = Some(id.to_owned());
                }
            }
        });

    ui.horizontal(|ui| {
        if ui.button("Save settings").clicked() {
            match app.store.save_settings(&app.settings) {
                Ok(()) => app.set_status("settings saved"),
                Err(err) => {
                    log::error!("could not save settings: {err}");
                    app.set_status(format!("could not save settings: {err}"));
                }
            }
        }
        let checking = app.key_check.is_some();
        if ui
            .add_enabled(!checking, egui::Button::new("Test key"))
            .clicked()
        {
            app.start_key_check(ui.ctx());
        }
        if checking {
            ui.spinner();
        }
    });
}

fn chat_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        for mode in AiMode::ALL {
            if ui
                .selectable_label(app.ai.mode == mode, mode.display_name())
                .clicked()
            {
                app.ai.mode = mode;
            }
        }
    });

    egui::ScrollArea::vertical()
        .max_height((ui.available_height() - 160.0).max(60.0))
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in app.ai.messages() {
                let prefix = match message.role {
                    Role::User => "you",
                    Role::Assistant => "ai",
                };
                ui.label(RichText::new(prefix).small().weak());
                ui.label(&message.content);
                if let Some(image) = &message.image {
                    ui.label(
                        RichText::new(format!(
                            "[generated image {}\u{d7}{}]",
                            image.width(),
                            image.height()
                        ))
                        .italics(),
                    );
                }
                ui.add_space(6.0);
            }
        });

    if let Some(error) = app.ai.error() {
        ui.colored_label(egui::Color32::LIGHT_RED, error);
    }

    let generating = app.ai.is_generating();
    ui.horizontal(|ui| {
        ui.add_enabled(
            !generating,
            egui::TextEdit::singleline(&mut app.ai.input).hint_text("describe it\u{2026}"),
        );
        let can_send = !generating && !app.ai.input.trim().is_empty();
        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            let screenshot = app
                .source
                .as_ref()
                .and_then(|img| img.to_png_bytes().ok());
            let client = app.gemini_client();
            app.ai.send(client, screenshot);
        }
        if generating {
            ui.spinner();
        }
        if ui.small_button("clear").clicked() {
            app.ai.clear();
        }
    });

    if let Some(generated) = app.ai.last_generated().cloned() {
        ui.horizontal(|ui| {
            if ui.button("Use as background").clicked() {
                app.style.set_ai_background(Some(generated.clone()));
                app.style.set_background(BackgroundKind::Ai);
            }
            if ui.button("Use as screenshot").clicked() {
                app.set_source(generated.clone());
            }
            if ui.button("Save").clicked() {
                save_generated(app, &generated);
            }
        });
    }
}

fn save_generated(app: &mut ScreenGlossApp, generated: &SourceImage) {
    let prompt = app
        .ai
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap_or_default();
    let kind = match app.ai.mode {
        AiMode::Background => AiPresetKind::Background,
        AiMode::GenerateUi => AiPresetKind::Ui,
        AiMode::Enhance | AiMode::Edit => AiPresetKind::Other,
    };
    let name: String = prompt.chars().take(40).collect();

    match generated.to_png_bytes() {
        Ok(png) => {
            let preset = AiPreset::new(name, prompt, BASE64.encode(png), kind);
            match app.store.save_ai_preset(preset) {
                Ok(()) => {
                    app.refresh_presets();
                    app.set_status("image saved");
                }
                Err(err) => {
                    log::error!("could not save AI preset: {err}");
                    app.set_status(format!("could not save image: {err}"));
                }
            }
        }
        Err(err) => {
            log::error!("could not encode generated image: {err}");
            app.set_status("could not encode generated image");
        }
    }
}

fn presets_section(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let presets = app.ai_presets.clone();
    if presets.is_empty() {
        ui.label(RichText::new("nothing saved yet").weak());
        return;
    }
    for preset in &presets {
        ui.horizontal(|ui| {
            let label = if preset.name.is_empty() {
                "(untitled)"
            } else {
                preset.name.as_str()
            };
            if ui.button(label).clicked() {
                apply_preset(app, preset);
            }
            if ui.small_button("\u{1f5d1}").clicked() {
                if let Err(err) = app.store.delete_ai_preset(preset.id) {
                    log::error!("could not delete AI preset: {err}");
                }
                app.refresh_presets();
            }
        });
    }
}

fn apply_preset(app: &mut ScreenGlossApp, preset: &AiPreset) {
    let decoded = BASE64
        .decode(&preset.image_png_base64)
        .ok()
        .and_then(|bytes| SourceImage::from_bytes(&bytes, &preset.name).ok());
    match decoded {
        Some(image) => {
            app.style.set_ai_background(Some(image));
            app.style.set_background(BackgroundKind::Ai);
        }
        None => {
            log::warn!("stored AI preset is not decodable: {}", preset.id);
            app.set_status("saved image could not be decoded");
        }
    }
}
