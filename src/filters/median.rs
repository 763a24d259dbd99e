//! Median filter.
//!
//! Removes salt-and-pepper noise while preserving edges. Each channel is
//! sorted and medianed on its own; the result is a per-channel order
//! statistic, not a vector median of the RGB triples.

use crate::buffer::{PixelBuffer, Rgb, CHANNELS};
use crate::error::FilterResult;

use super::core::{apply_window, BorderPolicy, MaskSize, Window, WindowOptions, WindowStrategy};

/// Per-channel median over the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianFilter;

impl WindowStrategy for MedianFilter {
    fn name(&self) -> &'static str {
        "median"
    }

    fn reduce(&self, window: &mut Window) -> Rgb {
        let mid = window.len() / 2;
        let mut out = [0u8; CHANNELS];
        for (c, value) in out.iter_mut().enumerate() {
            let samples = window.channel_mut(c);
            samples.sort_unstable();
            *value = samples[mid];
        }
        out
    }
}

/// Apply the median filter with the given window options.
///
/// # Arguments
/// * `source` - Buffer to read; never modified
/// * `options` - Mask size and border policy
///
/// # Returns
/// New buffer with the same dimensions
pub fn median(source: &PixelBuffer, options: WindowOptions) -> FilterResult<PixelBuffer> {
    apply_window(source, options, &MedianFilter)
}

/// Apply the median filter with a raw mask size and clamped borders.
///
/// # Errors
/// `InvalidParameter` when `mask_size` is even or below 3.
pub fn median_filter(source: &PixelBuffer, mask_size: usize) -> FilterResult<PixelBuffer> {
    let options = WindowOptions::new(MaskSize::new(mask_size)?).with_border(BorderPolicy::Clamp);
    median(source, options)
}
