//! The eframe application: state ownership and per-frame orchestration.
//!
//! All mutation happens synchronously on the UI thread. The only worker
//! threads are single-shot (demo fetch, generation request, export encode
//! happens inline after a screenshot event) and deliver through channels
//! polled here, so there is no shared mutable state to guard.

use std::path::PathBuf;

use eframe::egui;
use egui::Rect;

use crate::ai::AiSession;
use crate::ai::client::GeminiClient;
use crate::crop::CropEngine;
use crate::export::{self, ExportFormat};
use crate::file_handler::FileHandler;
use crate::image::SourceImage;
use crate::panels;
use crate::renderer::Renderer;
use crate::state::style::StyleState;
use crate::store::{AiPreset, PresetStore, Settings, StylePreset};
use crate::texture_cache::TextureCache;

const TEXTURE_CACHE_SIZE: usize = 16;

pub struct ScreenGlossApp {
    pub(crate) style: StyleState,
    pub(crate) source: Option<SourceImage>,
    pub(crate) crop: Option<CropEngine>,

    pub(crate) renderer: Renderer,
    pub(crate) textures: TextureCache,
    pub(crate) file_handler: FileHandler,

    pub(crate) store: PresetStore,
    pub(crate) settings: Settings,
    pub(crate) style_presets: Vec<StylePreset>,
    pub(crate) ai_presets: Vec<AiPreset>,

    pub(crate) ai: AiSession,
    pub(crate) show_ai_panel: bool,

    pub(crate) status: Option<String>,
    pub(crate) preset_name: String,
    pub(crate) export_dir: PathBuf,
    /// Export format waiting for the next screenshot event.
    pub(crate) pending_export: Option<ExportFormat>,
    /// Canvas rect painted last frame, in ui points.
    pub(crate) last_canvas_rect: Option<Rect>,
    /// Outstanding API-key probe, if any.
    pub(crate) key_check: Option<std::sync::mpsc::Receiver<bool>>,
}

impl ScreenGlossApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let store = PresetStore::default_location();
        let settings = store.settings();
        let style_presets = store.style_presets();
        let ai_presets = store.ai_presets();

        Self {
            style: StyleState::default(),
            source: None,
            crop: None,
            renderer: Renderer,
            textures: TextureCache::new(TEXTURE_CACHE_SIZE),
            file_handler: FileHandler::new(),
            store,
            settings,
            style_presets,
            ai_presets,
            ai: AiSession::default(),
            show_ai_panel: false,
            status: None,
            preset_name: String::new(),
            export_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            pending_export: None,
            last_canvas_rect: None,
            key_check: None,
        }
    }

    pub(crate) fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub(crate) fn is_cropping(&self) -> bool {
        self.crop.is_some()
    }

    /// Replace the screenshot wholesale, dropping the old texture.
    pub(crate) fn set_source(&mut self, image: SourceImage) {
        if let Some(old) = &self.source {
            self.textures.forget(old.id());
        }
        log::info!("loaded image {:?} ({}x{})", image.name(), image.width(), image.height());
        self.source = Some(image);
        self.crop = None;
    }

    pub(crate) fn clear_image(&mut self) {
        if let Some(old) = self.source.take() {
            self.textures.forget(old.id());
        }
        self.crop = None;
    }

    pub(crate) fn enter_crop_mode(&mut self) {
        if let Some(source) = &self.source {
            if self.crop.is_none() {
                self.crop = Some(CropEngine::new(source.size()));
            }
        }
    }

    pub(crate) fn apply_crop(&mut self) {
        let Some(engine) = &mut self.crop else { return };
        match engine.commit(self.source.as_ref()) {
            Ok(cropped) => {
                self.crop = None;
                self.set_source(cropped);
            }
            // Unreachable from the UI (Apply is gated on both), but harmless.
            Err(err) => {
                log::warn!("crop commit refused: {err}");
                self.crop = None;
            }
        }
    }

    pub(crate) fn cancel_crop(&mut self) {
        if let Some(engine) = &mut self.crop {
            engine.cancel();
        }
        self.crop = None;
    }

    pub(crate) fn gemini_client(&self) -> GeminiClient {
        GeminiClient::new(
            self.settings.api_key.clone().unwrap_or_default(),
            self.settings.model().to_owned(),
        )
    }

    pub(crate) fn refresh_presets(&mut self) {
        self.style_presets = self.store.style_presets();
        self.ai_presets = self.store.ai_presets();
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Probe the configured API key on a worker thread.
    pub(crate) fn start_key_check(&mut self, ctx: &egui::Context) {
        if self.key_check.is_some() {
            return;
        }
        let Some(api_key) = self.settings.api_key.clone().filter(|k| !k.is_empty()) else {
            self.set_status("enter an API key first");
            return;
        };
        let (tx, rx) = std::sync::mpsc::channel();
        let repaint_ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(GeminiClient::validate_api_key(&api_key));
            repaint_ctx.request_repaint();
        });
        self.key_check = Some(rx);
    }

    fn poll_key_check(&mut self) {
        let Some(rx) = &self.key_check else { return };
        match rx.try_recv() {
            Ok(valid) => {
                self.key_check = None;
                self.set_status(if valid {
                    "API key looks valid"
                } else {
                    "API key was rejected"
                });
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {}
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.key_check = None;
            }
        }
    }

    /// Queue an export: the actual pixels arrive with the next screenshot
    /// event. The export buttons are disabled while one is pending.
    pub(crate) fn request_export(&mut self, ctx: &egui::Context, format: ExportFormat) {
        if self.pending_export.is_some() {
            return;
        }
        self.pending_export = Some(format);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    fn handle_screenshot_events(&mut self, ctx: &egui::Context) {
        let captures: Vec<std::sync::Arc<egui::ColorImage>> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
                .collect()
        });
        let Some(capture) = captures.into_iter().last() else {
            return;
        };
        let Some(format) = self.pending_export.take() else {
            return;
        };
        let Some(canvas_rect) = self.last_canvas_rect else {
            self.set_status("nothing to export yet");
            return;
        };

        let ppp = ctx.pixels_per_point();
        let rect_px = Rect::from_min_max(
            (canvas_rect.min.to_vec2() * ppp).to_pos2(),
            (canvas_rect.max.to_vec2() * ppp).to_pos2(),
        );
        let name = self
            .source
            .as_ref()
            .map(|s| s.name().to_owned())
            .unwrap_or_else(|| "screenshot".to_owned());
        let scale = self.style.export_scale().factor();

        let result = export::region_to_rgba(&capture, rect_px)
            .and_then(|rgba| export::save_to(&self.export_dir, &name, &rgba, format, scale));
        match result {
            Ok(path) => self.set_status(format!("exported {}", path.display())),
            Err(err) => {
                log::error!("export failed: {err}");
                self.set_status(format!("export failed: {err}"));
            }
        }
    }

    fn handle_file_intake(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);

        if let Some(result) = self.file_handler.check_dropped_files(ctx) {
            match result {
                Ok(image) => self.set_source(image),
                Err(err) => {
                    // Stay in the current state; just report it.
                    log::error!("could not load dropped image: {err}");
                    self.set_status(format!("could not load image: {err}"));
                }
            }
        }

        if let Some(result) = self.file_handler.poll_demo_fetch() {
            match result {
                Ok(image) => self.set_source(image),
                Err(err) => {
                    log::error!("demo image failed: {err}");
                    self.set_status(format!("demo image failed: {err}"));
                }
            }
        }
    }
}

impl eframe::App for ScreenGlossApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.handle_file_intake(ctx);
        self.handle_screenshot_events(ctx);
        self.ai.poll();
        self.poll_key_check();

        panels::top_bar(self, ctx);
        if self.show_ai_panel {
            panels::ai_panel(self, ctx);
        }
        if self.has_image() {
            panels::controls_panel(self, ctx);
        }
        panels::central_panel(self, ctx);

        // Keep polling while background work is outstanding.
        if self.ai.is_generating()
            || self.file_handler.demo_fetch_in_progress()
            || self.key_check.is_some()
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
