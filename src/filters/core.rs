//! Core utilities for windowed filters.
//!
//! This module provides the functionality shared by the median and
//! harmonic mean filters:
//! - Mask size validation
//! - Border policy (clamped or cropped)
//! - Neighborhood gathering from a read-only snapshot
//! - The row-parallel driver that applies a [`WindowStrategy`]

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, Rgb, CHANNELS};
use crate::error::{FilterError, FilterResult};

/// Smallest accepted mask size.
pub const MIN_MASK_SIZE: usize = 3;

/// Largest mask size offered by the driver surfaces (CLI, bindings).
pub const MAX_MASK_SIZE: usize = 11;

/// Side length of the square filter window. Always odd and at least 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskSize(usize);

impl MaskSize {
    /// Validate a mask size.
    ///
    /// # Errors
    /// `InvalidParameter` when `size` is even or smaller than 3.
    pub fn new(size: usize) -> FilterResult<Self> {
        if size < MIN_MASK_SIZE {
            return Err(FilterError::invalid(format!(
                "mask size must be at least {MIN_MASK_SIZE}, got {size}"
            )));
        }
        if size % 2 == 0 {
            return Err(FilterError::invalid(format!(
                "mask size must be odd, got {size}"
            )));
        }
        Ok(MaskSize(size))
    }

    /// Side length in pixels.
    pub fn get(self) -> usize {
        self.0
    }

    /// Distance from the center to the window edge (`size / 2`).
    pub fn radius(self) -> usize {
        self.0 / 2
    }

    /// Number of samples in a full window (`size * size`).
    pub fn area(self) -> usize {
        self.0 * self.0
    }
}

impl TryFrom<usize> for MaskSize {
    type Error = FilterError;

    fn try_from(size: usize) -> FilterResult<Self> {
        MaskSize::new(size)
    }
}

impl fmt::Display for MaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// How windows that extend past the image edge are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPolicy {
    /// Out-of-range neighbors are clamped to the nearest edge pixel, so every
    /// pixel is filtered over a full window.
    #[default]
    Clamp,
    /// Only pixels whose full window lies inside the image are filtered; the
    /// border band of width `mask / 2` keeps its source value.
    Crop,
}

impl FromStr for BorderPolicy {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" | "replicate" => Ok(BorderPolicy::Clamp),
            "crop" => Ok(BorderPolicy::Crop),
            other => Err(FilterError::invalid(format!(
                "unknown border policy '{other}' (expected clamp or crop)"
            ))),
        }
    }
}

impl fmt::Display for BorderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorderPolicy::Clamp => f.write_str("clamp"),
            BorderPolicy::Crop => f.write_str("crop"),
        }
    }
}

/// Per-channel samples of one neighborhood.
///
/// Channels are kept in separate vectors so strategies can reorder or fold
/// each channel independently.
#[derive(Debug, Clone)]
pub struct Window {
    samples: [Vec<u8>; CHANNELS],
}

impl Window {
    /// Empty window with room for `capacity` samples per channel.
    pub fn with_capacity(capacity: usize) -> Self {
        Window {
            samples: [
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
            ],
        }
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.samples[0].len()
    }

    /// True when no samples have been gathered.
    pub fn is_empty(&self) -> bool {
        self.samples[0].is_empty()
    }

    /// Samples of channel `c` in gather order (row-major over the window).
    pub fn channel(&self, c: usize) -> &[u8] {
        &self.samples[c]
    }

    /// Mutable samples of channel `c`.
    pub fn channel_mut(&mut self, c: usize) -> &mut [u8] {
        &mut self.samples[c]
    }

    /// Replace the contents with the clamped neighborhood of `(x, y)`.
    pub fn gather(&mut self, source: &ArrayView3<u8>, x: usize, y: usize, mask: MaskSize) {
        let (height, width, _) = source.dim();
        let radius = mask.radius();

        for samples in self.samples.iter_mut() {
            samples.clear();
        }

        for dy in 0..mask.get() {
            let sy = (y as isize + dy as isize - radius as isize)
                .clamp(0, height as isize - 1) as usize;

            for dx in 0..mask.get() {
                let sx = (x as isize + dx as isize - radius as isize)
                    .clamp(0, width as isize - 1) as usize;

                for (c, samples) in self.samples.iter_mut().enumerate() {
                    samples.push(source[[sy, sx, c]]);
                }
            }
        }
    }
}

/// Reduction applied to every gathered window.
pub trait WindowStrategy: Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Compute the output color from a full window. The window may be
    /// reordered in place.
    fn reduce(&self, window: &mut Window) -> Rgb;
}

/// Mask size and border policy for one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub mask: MaskSize,
    pub border: BorderPolicy,
}

impl WindowOptions {
    /// Clamped-border options for `mask`.
    pub fn new(mask: MaskSize) -> Self {
        WindowOptions {
            mask,
            border: BorderPolicy::Clamp,
        }
    }

    /// Same options with a different border policy.
    pub fn with_border(mut self, border: BorderPolicy) -> Self {
        self.border = border;
        self
    }
}

/// True when the full window around `(x, y)` lies inside the image.
#[inline]
pub fn window_fits(width: usize, height: usize, x: usize, y: usize, radius: usize) -> bool {
    x >= radius && y >= radius && x + radius < width && y + radius < height
}

/// Apply `strategy` to every pixel of `source`, producing a new buffer.
///
/// `source` is only borrowed immutably, so every neighbor read sees the
/// same snapshot regardless of how far the output has progressed. Rows are
/// computed in parallel; each row owns a disjoint slice of the output.
pub fn apply_window<S: WindowStrategy>(
    source: &PixelBuffer,
    options: WindowOptions,
    strategy: &S,
) -> FilterResult<PixelBuffer> {
    let snapshot = source.view();
    let (height, width, _) = snapshot.dim();
    let WindowOptions { mask, border } = options;
    let radius = mask.radius();
    let row_len = width * CHANNELS;

    tracing::debug!(
        filter = strategy.name(),
        mask = mask.get(),
        border = %border,
        width,
        height,
        "applying window filter"
    );

    let mut output = vec![0u8; height * row_len];
    output
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let mut window = Window::with_capacity(mask.area());

            for x in 0..width {
                let color = if border == BorderPolicy::Crop
                    && !window_fits(width, height, x, y, radius)
                {
                    [
                        snapshot[[y, x, 0]],
                        snapshot[[y, x, 1]],
                        snapshot[[y, x, 2]],
                    ]
                } else {
                    window.gather(&snapshot, x, y, mask);
                    strategy.reduce(&mut window)
                };

                row[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&color);
            }
        });

    PixelBuffer::from_raw(width, height, output)
}
