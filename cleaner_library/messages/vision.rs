use cleaner_core::LogSummary;
use serde::{Deserialize, Serialize};

/// Pixel layout of an `Image` buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    Mono8,
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    /// 32-bit float depth, not a color format
    Depth32F,
}

impl ImageEncoding {
    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ImageEncoding::Mono8 => 1,
            ImageEncoding::Rgb8 | ImageEncoding::Bgr8 => 3,
            ImageEncoding::Rgba8 | ImageEncoding::Bgra8 | ImageEncoding::Depth32F => 4,
        }
    }

    pub fn is_8bit(&self) -> bool {
        !matches!(self, ImageEncoding::Depth32F)
    }
}

/// Raw camera frame
///
/// Rows are `step` bytes apart; `step` may exceed `width * bytes_per_pixel`
/// when the driver pads rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub step: u32,
    pub encoding: ImageEncoding,
    pub data: Vec<u8>,
    pub timestamp: u64,
}

impl Image {
    /// Zero-filled frame with tightly packed rows
    pub fn new(width: u32, height: u32, encoding: ImageEncoding) -> Self {
        let step = width * encoding.bytes_per_pixel() as u32;
        Self {
            width,
            height,
            step,
            encoding,
            data: vec![0; step as usize * height as usize],
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64,
        }
    }

    /// Frame where every pixel is the same BGR color
    pub fn filled_bgr(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let mut image = Self::new(width, height, ImageEncoding::Bgr8);
        for pixel in image.data.chunks_exact_mut(3) {
            pixel.copy_from_slice(&bgr);
        }
        image
    }

    /// Paint an axis-aligned BGR rectangle, clipped to the frame
    ///
    /// Only meaningful for `Bgr8` frames.
    pub fn fill_rect_bgr(&mut self, x: u32, y: u32, w: u32, h: u32, bgr: [u8; 3]) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y..y_end {
            let row_start = (row * self.step) as usize;
            for col in x..x_end {
                let offset = row_start + col as usize * 3;
                self.data[offset..offset + 3].copy_from_slice(&bgr);
            }
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl LogSummary for Image {
    fn log_summary(&self) -> String {
        format!(
            "Image({}x{}, {:?}, {} bytes)",
            self.width,
            self.height,
            self.encoding,
            self.data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_layout() {
        let image = Image::new(4, 2, ImageEncoding::Bgr8);
        assert_eq!(image.step, 12);
        assert_eq!(image.data.len(), 24);
        assert_eq!(image.pixel_count(), 8);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut image = Image::new(4, 4, ImageEncoding::Bgr8);
        image.fill_rect_bgr(2, 2, 10, 10, [0, 255, 0]);

        let painted = image
            .data
            .chunks_exact(3)
            .filter(|px| *px == [0, 255, 0])
            .count();
        assert_eq!(painted, 4);
    }

    #[test]
    fn test_encoding_properties() {
        assert_eq!(ImageEncoding::Mono8.bytes_per_pixel(), 1);
        assert_eq!(ImageEncoding::Bgra8.bytes_per_pixel(), 4);
        assert!(ImageEncoding::Rgb8.is_8bit());
        assert!(!ImageEncoding::Depth32F.is_8bit());
    }
}
