//! Filter modules for the noise / channel / denoise pipeline.
//!
//! ## Supported Format
//!
//! Every stage works on [`PixelBuffer`](crate::buffer::PixelBuffer):
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! Alpha is dropped when an image is decoded; the stages never see it.
//!
//! ## Architecture
//!
//! - **In place** - noise injection and channel isolation mutate the buffer
//!   they are given; callers clone first when the input must survive
//! - **Snapshot reads** - windowed filters borrow the source immutably and
//!   write a new buffer, so no output pixel can leak into a neighbor's window
//! - **One border policy** - both windowed filters share
//!   `BorderPolicy`, clamped by default
//! - **Thread-safe** - windowed filters split rows across rayon workers
//!
//! ## Filter Categories
//!
//! - **Noise**: unipolar, bipolar impulse noise (`noise`)
//! - **Channel**: single RGB channel isolation (`channel`)
//! - **Denoise**: median (`median`), harmonic mean (`harmonic`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, FilterResult};

pub mod core;
pub mod noise;
pub mod channel;
pub mod median;
pub mod harmonic;

pub use self::core::{BorderPolicy, MaskSize, WindowOptions};

/// Windowed denoising filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    Median,
    HarmonicMean,
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "median" => Ok(FilterKind::Median),
            "harmonic-mean" | "harmonic" => Ok(FilterKind::HarmonicMean),
            other => Err(FilterError::invalid(format!(
                "unknown filter '{other}' (expected median or harmonic-mean)"
            ))),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Median => f.write_str("median"),
            FilterKind::HarmonicMean => f.write_str("harmonic-mean"),
        }
    }
}

/// Run the selected windowed filter over `source`.
pub fn apply_filter(
    source: &PixelBuffer,
    kind: FilterKind,
    options: WindowOptions,
) -> FilterResult<PixelBuffer> {
    match kind {
        FilterKind::Median => median::median(source, options),
        FilterKind::HarmonicMean => harmonic::harmonic_mean(source, options),
    }
}
