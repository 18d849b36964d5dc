pub mod style;

pub use style::{BackgroundKind, CanvasPreset, ExportScale, StyleState};
