use crate::config::VisionConfig;
use crate::messages::{Image, ImageEncoding};
use cleaner_core::error::{CleanerError, CleanerResult};

const HSV_SHIFT: u32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);
const HUE_RANGE: i32 = 180;

/// Convert one 8-bit BGR pixel to 8-bit HSV
///
/// Hue is in `[0, 180)` (degrees halved), saturation and value in
/// `[0, 255]`. Uses 12-bit fixed-point division, so results match the
/// common 8-bit imaging conventions exactly, including rounding.
pub fn bgr_to_hsv(bgr: [u8; 3]) -> [u8; 3] {
    let [b, g, r] = bgr.map(i32::from);
    let v = b.max(g).max(r);
    let diff = v - b.min(g).min(r);

    if diff == 0 {
        return [0, 0, v as u8];
    }

    let sdiv = ((255 << HSV_SHIFT) as f64 / v as f64).round() as i32;
    let s = (diff * sdiv + HSV_ROUND) >> HSV_SHIFT;

    let hdiv = ((HUE_RANGE << HSV_SHIFT) as f64 / (6 * diff) as f64).round() as i32;
    let h_raw = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (h_raw * hdiv + HSV_ROUND) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    [h as u8, s as u8, v as u8]
}

/// Inclusive HSV box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBand {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Decides whether a frame shows enough target-colored area to clean
///
/// Stateless: every frame is judged on its own.
#[derive(Debug, Clone)]
pub struct TargetClassifier {
    band: HsvBand,
    pixel_unit: u64,
    score_threshold: u64,
}

impl Default for TargetClassifier {
    fn default() -> Self {
        Self::new(&VisionConfig::default())
    }
}

impl TargetClassifier {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            band: HsvBand::new(config.hsv_lower, config.hsv_upper),
            pixel_unit: config.pixel_unit,
            score_threshold: config.score_threshold,
        }
    }

    pub fn band(&self) -> HsvBand {
        self.band
    }

    pub fn score_threshold(&self) -> u64 {
        self.score_threshold
    }

    /// Number of in-band pixels times the per-pixel unit
    pub fn mask_score(&self, image: &Image) -> CleanerResult<u64> {
        let bpp = check_layout(image)?;
        let row_bytes = image.width as usize * bpp;
        let step = image.step as usize;

        let mut in_band = 0u64;
        for row in image.data.chunks(step).take(image.height as usize) {
            for pixel in row[..row_bytes].chunks_exact(bpp) {
                if self.band.contains(bgr_to_hsv(to_bgr(image.encoding, pixel))) {
                    in_band += 1;
                }
            }
        }

        Ok(in_band * self.pixel_unit)
    }

    /// True when the mask score is strictly above the threshold
    pub fn classify(&self, image: &Image) -> CleanerResult<bool> {
        Ok(self.mask_score(image)? > self.score_threshold)
    }
}

/// Validate buffer geometry and return bytes per pixel
fn check_layout(image: &Image) -> CleanerResult<usize> {
    if !image.encoding.is_8bit() {
        return Err(CleanerError::malformed_frame(format!(
            "unsupported encoding {:?}",
            image.encoding
        )));
    }
    if image.width == 0 || image.height == 0 {
        return Err(CleanerError::malformed_frame(format!(
            "empty frame {}x{}",
            image.width, image.height
        )));
    }

    let bpp = image.encoding.bytes_per_pixel();
    let min_step = image.width as usize * bpp;
    if (image.step as usize) < min_step {
        return Err(CleanerError::malformed_frame(format!(
            "row step {} shorter than {} bytes",
            image.step, min_step
        )));
    }

    let expected = image.step as usize * image.height as usize;
    if image.data.len() < expected {
        return Err(CleanerError::malformed_frame(format!(
            "buffer holds {} bytes, expected {}",
            image.data.len(),
            expected
        )));
    }

    Ok(bpp)
}

fn to_bgr(encoding: ImageEncoding, pixel: &[u8]) -> [u8; 3] {
    match encoding {
        ImageEncoding::Bgr8 | ImageEncoding::Bgra8 => [pixel[0], pixel[1], pixel[2]],
        ImageEncoding::Rgb8 | ImageEncoding::Rgba8 => [pixel[2], pixel[1], pixel[0]],
        ImageEncoding::Mono8 | ImageEncoding::Depth32F => [pixel[0], pixel[0], pixel[0]],
    }
}
