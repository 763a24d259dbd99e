//! Harmonic mean filter.
//!
//! Averages reciprocals over the window, which suppresses bright outliers
//! (salt noise) well and dark outliers poorly.
//!
//! Each sample contributes `1 / (v + 1)`; the `+ 1` keeps black pixels from
//! dividing by zero and biases the result upward by roughly one level. The
//! quotient `n / sum` is truncated toward zero, then clamped to 0-255.

use crate::buffer::{PixelBuffer, Rgb, CHANNELS};
use crate::error::FilterResult;

use super::core::{apply_window, BorderPolicy, MaskSize, Window, WindowOptions, WindowStrategy};

/// Per-channel harmonic mean over the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicMeanFilter;

/// Harmonic mean of one channel's samples.
#[inline]
pub fn harmonic_mean_u8(samples: &[u8]) -> u8 {
    let sum: f64 = samples.iter().map(|&v| 1.0 / (v as f64 + 1.0)).sum();
    let mean = (samples.len() as f64 / sum) as i64;
    mean.clamp(0, 255) as u8
}

impl WindowStrategy for HarmonicMeanFilter {
    fn name(&self) -> &'static str {
        "harmonic_mean"
    }

    fn reduce(&self, window: &mut Window) -> Rgb {
        let mut out = [0u8; CHANNELS];
        for (c, value) in out.iter_mut().enumerate() {
            *value = harmonic_mean_u8(window.channel(c));
        }
        out
    }
}

/// Apply the harmonic mean filter with the given window options.
pub fn harmonic_mean(source: &PixelBuffer, options: WindowOptions) -> FilterResult<PixelBuffer> {
    apply_window(source, options, &HarmonicMeanFilter)
}

/// Apply the harmonic mean filter with a raw mask size and clamped borders.
///
/// # Errors
/// `InvalidParameter` when `mask_size` is even or below 3.
pub fn harmonic_mean_filter(source: &PixelBuffer, mask_size: usize) -> FilterResult<PixelBuffer> {
    let options = WindowOptions::new(MaskSize::new(mask_size)?).with_border(BorderPolicy::Clamp);
    harmonic_mean(source, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BLACK, WHITE};
    use crate::error::FilterError;

    #[test]
    fn test_harmonic_black_window_biased_to_one() {
        assert_eq!(harmonic_mean_u8(&[0; 9]), 1);
    }

    #[test]
    fn test_harmonic_white_window_clamped() {
        // 9 / (9 / 256) = 256, clamped.
        assert_eq!(harmonic_mean_u8(&[255; 9]), 255);
    }

    #[test]
    fn test_harmonic_truncates() {
        // 9 / (8/11 + 1/251) = 12.3075...
        let mut samples = [10u8; 9];
        samples[4] = 250;
        assert_eq!(harmonic_mean_u8(&samples), 12);
    }

    #[test]
    fn test_harmonic_spike_3x3() {
        // Every clamped window of this image holds the spike exactly once.
        let mut buf = PixelBuffer::filled(3, 3, [10, 10, 10]).unwrap();
        buf.set(1, 1, [250, 250, 250]).unwrap();
        let result = harmonic_mean_filter(&buf, 3).unwrap();
        assert!(result.pixels().all(|(_, _, c)| c == [12, 12, 12]));
    }

    #[test]
    fn test_harmonic_suppresses_salt() {
        let mut buf = PixelBuffer::filled(5, 5, [100, 100, 100]).unwrap();
        buf.set(2, 2, WHITE).unwrap();
        let result = harmonic_mean_filter(&buf, 3).unwrap();
        let center = result.get(2, 2).unwrap();
        assert!(center[0] < 120);
    }

    #[test]
    fn test_harmonic_pepper_dominates() {
        let mut buf = PixelBuffer::filled(3, 3, [200, 200, 200]).unwrap();
        buf.set(1, 1, BLACK).unwrap();
        let result = harmonic_mean_filter(&buf, 3).unwrap();
        // 9 / (8/201 + 1) = 8.65...
        assert_eq!(result.get(1, 1), Some([8, 8, 8]));
    }

    #[test]
    fn test_harmonic_constant_within_bias() {
        for c in [0u8, 10, 17, 128, 254, 255] {
            let buf = PixelBuffer::filled(4, 4, [c, c, c]).unwrap();
            for mask in [3, 5, 7, 9, 11] {
                let result = harmonic_mean_filter(&buf, mask).unwrap();
                let upper = c.saturating_add(1);
                assert!(result
                    .pixels()
                    .all(|(_, _, px)| px.iter().all(|&v| v >= c && v <= upper)));
            }
        }
    }

    #[test]
    fn test_harmonic_single_pixel() {
        let buf = PixelBuffer::filled(1, 1, [0, 100, 255]).unwrap();
        let result = harmonic_mean_filter(&buf, 3).unwrap();
        let px = result.get(0, 0).unwrap();
        assert_eq!(px[0], 1);
        assert!(px[1] == 100 || px[1] == 101);
        assert_eq!(px[2], 255);
    }

    #[test]
    fn test_harmonic_output_in_range() {
        let buf = PixelBuffer::from_fn(8, 8, |x, y| {
            let v = ((x * 37 + y * 91) % 256) as u8;
            [v, 255 - v, v / 2]
        })
        .unwrap();
        for mask in [3, 5, 11] {
            let result = harmonic_mean_filter(&buf, mask).unwrap();
            assert_eq!((result.width(), result.height()), (8, 8));
            assert!(result.pixels().all(|(_, _, px)| px.iter().all(|&v| v >= 1)));
        }
    }

    #[test]
    fn test_harmonic_crop_keeps_border() {
        let buf = PixelBuffer::from_fn(4, 4, |x, y| [(x * 10) as u8, (y * 10) as u8, 50]).unwrap();
        let options = WindowOptions::new(MaskSize::new(3).unwrap()).with_border(BorderPolicy::Crop);
        let result = harmonic_mean(&buf, options).unwrap();
        assert_eq!(result.get(0, 3), buf.get(0, 3));
        assert_eq!(result.get(3, 0), buf.get(3, 0));
        assert_ne!(result.get(1, 1), buf.get(1, 1));
    }

    #[test]
    fn test_harmonic_rejects_small_mask() {
        let buf = PixelBuffer::new(2, 2).unwrap();
        assert!(matches!(
            harmonic_mean_filter(&buf, 1),
            Err(FilterError::InvalidParameter(_))
        ));
    }
}
