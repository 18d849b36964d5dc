use std::sync::Arc;

use egui::{ColorImage, Vec2};
use uuid::Uuid;

use crate::error::LoadError;

/// A decoded screenshot: an immutable RGBA bitmap plus its pixel dimensions.
///
/// Replaced wholesale on upload, drop, demo load, or crop commit; never
/// partially mutated. Cloning is cheap (the pixel buffer is shared), and the
/// id identifies the bitmap for texture caching.
#[derive(Clone)]
pub struct SourceImage {
    id: Uuid,
    width: u32,
    height: u32,
    /// RGBA8, row-major, `width * height * 4` bytes.
    pixels: Arc<[u8]>,
    name: String,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("name", &self.name)
            .finish()
    }
}

impl SourceImage {
    /// Decode an image from an encoded byte buffer (any format the `image`
    /// crate understands). The file extension, if present in `name`, is
    /// stripped from the stored name.
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self, LoadError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("decoded image {name:?}: {width}x{height}");
        Ok(Self::from_rgba(width, height, rgba.into_raw(), name))
    }

    /// Wrap an already-decoded RGBA8 buffer.
    ///
    /// Panics if the buffer length does not match `width * height * 4`; this
    /// is a programming error, not an input error.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>, name: &str) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "pixel buffer does not match dimensions"
        );
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            pixels: pixels.into(),
            name: strip_extension(name),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel dimensions as a float vector, convenient for layout math.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA value at `(x, y)`. Out-of-bounds reads are a programming
    /// error and panic.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Extract an axis-aligned sub-rectangle at 1:1 pixel scale (no
    /// resampling). The rectangle is clamped to the bitmap bounds; the
    /// result is a standalone bitmap with a fresh id.
    pub fn crop_to(&self, x: u32, y: u32, width: u32, height: u32) -> SourceImage {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let width = width.min(self.width - x).max(1);
        let height = height.min(self.height - y).max(1);

        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        let row_stride = self.width as usize * 4;
        for row in y..y + height {
            let start = row as usize * row_stride + x as usize * 4;
            out.extend_from_slice(&self.pixels[start..start + width as usize * 4]);
        }
        Self::from_rgba(width, height, out, &self.name)
    }

    /// Convert to an egui texture image for upload.
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width as usize, self.height as usize],
            &self.pixels,
        )
    }

    /// Re-encode as PNG bytes, used for generation-service payloads.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, image::ImageError> {
        let buffer: image::RgbaImage =
            image::RgbaImage::from_raw(self.width, self.height, self.pixels.to_vec())
                .expect("pixel buffer matches dimensions");
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

fn strip_extension(name: &str) -> String {
    let name = if name.is_empty() { "screenshot" } else { name };
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= 4 => stem.to_owned(),
        _ => name.to_owned(),
    }
}
