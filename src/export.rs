//! Flattening the painted canvas into a saveable image.
//!
//! The renderer paints; this module takes the captured pixels, applies the
//! export scale, and encodes PNG / JPEG / WebP via the `image` crate or an
//! SVG document embedding the PNG payload. Errors abandon the operation
//! and surface as a visible status, never as a crash.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use egui::ColorImage;
use image::{DynamicImage, ImageFormat, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpg,
    Svg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Jpg,
        ExportFormat::Svg,
        ExportFormat::Webp,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpg => "JPG",
            ExportFormat::Svg => "SVG",
            ExportFormat::Webp => "WebP",
        }
    }
}

/// Crop a full-window screenshot down to the canvas rectangle, converting
/// egui's pixel format to plain RGBA.
pub fn region_to_rgba(capture: &ColorImage, rect: egui::Rect) -> Result<RgbaImage, ExportError> {
    let width = capture.size[0];
    let height = capture.size[1];

    let x0 = (rect.min.x.round().max(0.0) as usize).min(width);
    let y0 = (rect.min.y.round().max(0.0) as usize).min(height);
    let x1 = (rect.max.x.round().max(0.0) as usize).min(width);
    let y1 = (rect.max.y.round().max(0.0) as usize).min(height);

    if x1 <= x0 || y1 <= y0 {
        return Err(ExportError::NoCapture);
    }

    let mut out = RgbaImage::new((x1 - x0) as u32, (y1 - y0) as u32);
    for (row_index, y) in (y0..y1).enumerate() {
        for (col_index, x) in (x0..x1).enumerate() {
            let rgba = capture.pixels[y * width + x].to_srgba_unmultiplied();
            out.put_pixel(col_index as u32, row_index as u32, image::Rgba(rgba));
        }
    }
    Ok(out)
}

/// Encode the capture at the requested scale factor. Scaling resamples the
/// capture; 1x passes the pixels through untouched.
pub fn export_bytes(
    capture: &RgbaImage,
    format: ExportFormat,
    scale: u32,
) -> Result<Vec<u8>, ExportError> {
    let scale = scale.max(1);
    let scaled;
    let source = if scale == 1 {
        capture
    } else {
        scaled = imageops::resize(
            capture,
            capture.width() * scale,
            capture.height() * scale,
            imageops::FilterType::CatmullRom,
        );
        &scaled
    };

    match format {
        ExportFormat::Png => encode(source, ImageFormat::Png, "png"),
        ExportFormat::Webp => encode(source, ImageFormat::WebP, "webp"),
        ExportFormat::Jpg => {
            // JPEG has no alpha channel; flatten first.
            let rgb = DynamicImage::ImageRgba8(source.clone()).to_rgb8();
            let mut bytes = Vec::new();
            DynamicImage::ImageRgb8(rgb)
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
                .map_err(|source| ExportError::Encode {
                    format: "jpg",
                    source,
                })?;
            Ok(bytes)
        }
        ExportFormat::Svg => {
            let png = encode(source, ImageFormat::Png, "png")?;
            Ok(svg_document(source.width(), source.height(), &png).into_bytes())
        }
    }
}

/// Encode and write to `dir/<name>.<ext>`, returning the written path.
pub fn save_to(
    dir: &Path,
    name: &str,
    capture: &RgbaImage,
    format: ExportFormat,
    scale: u32,
) -> Result<PathBuf, ExportError> {
    let bytes = export_bytes(capture, format, scale)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{}", format.extension()));
    std::fs::write(&path, bytes)?;
    log::info!("exported {}", path.display());
    Ok(path)
}

fn encode(
    source: &RgbaImage,
    target: ImageFormat,
    label: &'static str,
) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(source.clone())
        .write_to(&mut Cursor::new(&mut bytes), target)
        .map_err(|source| ExportError::Encode {
            format: label,
            source,
        })?;
    Ok(bytes)
}

/// A minimal SVG wrapper: the raster payload embedded at its pixel size.
fn svg_document(width: u32, height: u32, png: &[u8]) -> String {
    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
            "width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            "<image width=\"{w}\" height=\"{h}\" ",
            "href=\"data:image/png;base64,{data}\"/>",
            "</svg>"
        ),
        w = width,
        h = height,
        data = BASE64.encode(png),
    )
}
