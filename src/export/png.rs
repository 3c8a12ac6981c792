use std::borrow::Cow;
use std::path::Path;

use crate::error::ExportError;

/// Tightly packed RGBA8 pixels taken from a viewport screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub rgba: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Snapshot {
    /// Copy `image`, cropped to `crop` (in points) when given.
    pub fn from_color_image(image: &egui::ColorImage, crop: Option<egui::Rect>, pixels_per_point: f32) -> Self {
        let full_w = image.width();
        let full_h = image.height();

        let (x0, y0, x1, y1) = match crop {
            Some(rect) => (
                ((rect.left() * pixels_per_point).max(0.0) as usize).min(full_w),
                ((rect.top() * pixels_per_point).max(0.0) as usize).min(full_h),
                ((rect.right() * pixels_per_point).ceil().max(0.0) as usize).min(full_w),
                ((rect.bottom() * pixels_per_point).ceil().max(0.0) as usize).min(full_h),
            ),
            None => (0, 0, full_w, full_h),
        };

        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        let mut rgba = Vec::with_capacity(width * height * 4);
        for row in y0..y1 {
            for col in x0..x1 {
                let c = image.pixels[row * full_w + col];
                rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }

        Self { rgba, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        save_png(path, self.rgba.clone(), self.width as u32, self.height as u32)
    }

    pub fn copy_to_clipboard(&self) -> Result<(), ExportError> {
        if self.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_image(arboard::ImageData {
            width: self.width,
            height: self.height,
            bytes: Cow::Borrowed(&self.rgba),
        })?;
        tracing::info!(width = self.width, height = self.height, "copied plot image to clipboard");
        Ok(())
    }
}

pub fn save_png(path: &Path, rgba: Vec<u8>, width: u32, height: u32) -> Result<(), ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::NothingToExport);
    }
    let img = image::RgbaImage::from_raw(width, height, rgba).ok_or(ExportError::BadPixelBuffer { width, height })?;
    img.save(path)?;
    tracing::info!(path = %path.display(), width, height, "saved PNG");
    Ok(())
}
