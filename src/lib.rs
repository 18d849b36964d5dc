#![warn(clippy::all, rust_2018_idioms)]

pub mod ai;
pub mod app;
pub mod compose;
pub mod crop;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod image;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod store;
pub mod texture_cache;

pub use app::ScreenGlossApp;
pub use compose::{RenderLayers, compose};
pub use crop::{CropEngine, CropHandle, CropRegion, MIN_CROP_SIZE};
pub use error::{CropError, ExportError, LoadError, RemoteError, StoreError};
pub use image::SourceImage;
pub use renderer::Renderer;
pub use state::style::StyleState;
pub use store::PresetStore;
pub use texture_cache::TextureCache;
