//! Screenshot intake: drag-and-drop, raw bytes, and the demo image.
//!
//! Decode failures stay here: the app simply does not leave the drop state,
//! logs the error, and shows a status line. Nothing propagates into the
//! geometry or compositing core.

use std::sync::mpsc;

use eframe::egui;

use crate::error::LoadError;
use crate::image::SourceImage;

const DEMO_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1517694712202-14dd9538aa97?w=800&q=80";

pub struct FileHandler {
    demo_rx: Option<mpsc::Receiver<Result<SourceImage, LoadError>>>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self { demo_rx: None }
    }

    /// Pick up a newly dropped image file, if any. The first image file in
    /// the drop wins; non-image files are logged and skipped.
    pub fn check_dropped_files(&mut self, ctx: &egui::Context) -> Option<Result<SourceImage, LoadError>> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in &dropped {
            let file_name = if let Some(path) = &file.path {
                path.display().to_string()
            } else if !file.name.is_empty() {
                file.name.clone()
            } else {
                "dropped".to_owned()
            };

            if !is_image_file(file) {
                log::warn!("dropped file is not a supported image: {file_name}");
                continue;
            }

            if let Some(bytes) = &file.bytes {
                log::info!("decoding dropped image from memory: {file_name} ({} bytes)", bytes.len());
                return Some(SourceImage::from_bytes(bytes, &file_name));
            }

            #[cfg(not(target_arch = "wasm32"))]
            if let Some(path) = &file.path {
                log::info!("decoding dropped image from path: {}", path.display());
                return Some(match std::fs::read(path) {
                    Ok(bytes) => SourceImage::from_bytes(&bytes, &file_name),
                    Err(err) => Err(LoadError::Fetch(format!(
                        "could not read {}: {err}",
                        path.display()
                    ))),
                });
            }

            log::warn!("dropped file has no accessible data: {file_name}");
        }
        None
    }

    /// Kick off the demo-image fetch on a worker thread. No-op while a
    /// fetch is already running.
    pub fn start_demo_fetch(&mut self, ctx: &egui::Context) {
        if self.demo_rx.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let repaint_ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = fetch_demo_image();
            let _ = tx.send(result);
            repaint_ctx.request_repaint();
        });
        self.demo_rx = Some(rx);
    }

    pub fn demo_fetch_in_progress(&self) -> bool {
        self.demo_rx.is_some()
    }

    /// Drain a finished demo fetch, if any.
    pub fn poll_demo_fetch(&mut self) -> Option<Result<SourceImage, LoadError>> {
        let rx = self.demo_rx.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.demo_rx = None;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.demo_rx = None;
                Some(Err(LoadError::Fetch("demo fetch worker vanished".into())))
            }
        }
    }

    /// Full-window overlay while files hover over the app.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop screenshot to load",
            ctx.style()
                .text_styles
                .get(&TextStyle::Heading)
                .cloned()
                .unwrap_or_else(|| egui::FontId::proportional(24.0)),
            Color32::WHITE,
        );
    }
}

/// MIME sniff first, extension fallback.
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    if let Some(path) = &file.path {
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            return matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp");
        }
    }
    false
}

fn fetch_demo_image() -> Result<SourceImage, LoadError> {
    log::info!("fetching demo image");
    let response = reqwest::blocking::get(DEMO_IMAGE_URL)
        .map_err(|err| LoadError::Fetch(err.to_string()))?;
    if !response.status().is_success() {
        return Err(LoadError::Fetch(format!(
            "demo image request failed: {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .map_err(|err| LoadError::Fetch(err.to_string()))?;
    SourceImage::from_bytes(&bytes, "demo-screenshot")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(name: &str, mime: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            mime: mime.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn mime_type_wins_over_extension() {
        assert!(is_image_file(&dropped("whatever.bin", "image/png")));
        assert!(!is_image_file(&dropped("shot.png", "text/plain")));
    }

    #[test]
    fn extension_fallback_accepts_common_formats() {
        let file = egui::DroppedFile {
            path: Some(std::path::PathBuf::from("/tmp/shot.JPEG")),
            ..Default::default()
        };
        assert!(is_image_file(&file));

        let file = egui::DroppedFile {
            path: Some(std::path::PathBuf::from("/tmp/notes.txt")),
            ..Default::default()
        };
        assert!(!is_image_file(&file));
    }
}
