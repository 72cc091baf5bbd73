//! Luminance-to-opacity transform.
//!
//! Dark strokes become opaque and light paper becomes transparent. Pixels
//! whose opacity falls below a threshold are cut to fully transparent, and
//! the remaining pixels are contrast-stretched so the faintest kept stroke
//! maps to 0 and the darkest to 255.

use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

/// Default cutoff below which a pixel is treated as background.
pub const DEFAULT_THRESHOLD: f64 = 0.10;

/// Options for [`to_transparent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaOptions {
    /// Invert the luminance first (for light-on-dark sketches).
    pub invert: bool,
    /// Raw opacity (0.0 to 1.0) a pixel needs to be kept.
    pub threshold: f64,
}

impl Default for AlphaOptions {
    fn default() -> Self {
        Self {
            invert: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl AlphaOptions {
    /// Set whether to invert the input.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set the threshold (clamped to 0.0-1.0; NaN restores the default).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }
}

/// Compute the 8-bit alpha value for every pixel of `gray`, row-major.
pub fn alpha_channel(gray: &GrayImage, options: &AlphaOptions) -> Vec<u8> {
    let kept: Vec<Option<f64>> = gray
        .pixels()
        .map(|pixel| {
            let luma = if options.invert { 255 - pixel[0] } else { pixel[0] };
            let alpha = f64::from(255 - luma) / 255.0;
            (alpha >= options.threshold).then_some(alpha)
        })
        .collect();

    let (lo, hi) = kept
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &a| {
            (lo.min(a), hi.max(a))
        });

    kept.into_iter()
        .map(|alpha| match alpha {
            None => 0,
            Some(a) if hi > lo => quantize((a - lo) / (hi - lo)),
            Some(_) => 255,
        })
        .collect()
}

/// Reduce an image to 8-bit luminance.
///
/// Grayscale input passes through unchanged. Colour input uses the
/// ITU-R 601 integer weights `(299 R + 587 G + 114 B) / 1000`, rounded,
/// and ignores any alpha channel.
pub fn luminance(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => image.to_luma8(),
        _ => {
            let rgb = image.to_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0.map(u32::from);
                let luma = (r * 299 + g * 587 + b * 114 + 500) / 1000;
                Luma([u8::try_from(luma).unwrap_or(u8::MAX)])
            })
        }
    }
}

/// Convert an image into a black RGBA image whose alpha encodes darkness.
///
/// Colour input is reduced to luminance first (see [`luminance`]). The
/// output has the same dimensions as the input.
pub fn to_transparent(image: &DynamicImage, options: &AlphaOptions) -> RgbaImage {
    let gray = luminance(image);
    let alpha = alpha_channel(&gray, options);

    let mut out = RgbaImage::new(gray.width(), gray.height());
    for (pixel, a) in out.pixels_mut().zip(alpha) {
        *pixel = Rgba([0, 0, 0, a]);
    }
    out
}

fn quantize(alpha: f64) -> u8 {
    (alpha * 255.0).round().clamp(0.0, 255.0) as u8
}
