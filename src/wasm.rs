//! WebAssembly exports for the spatial filtering stages.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! passed as flat interleaved RGB bytes (length = width * height * 3) and
//! returned in the same layout.

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::FilterError;
use crate::filters::channel::{isolate_channel, Channel};
use crate::filters::core::{BorderPolicy, MaskSize, WindowOptions, MAX_MASK_SIZE};
use crate::filters::noise::{NoiseInjector, NoiseKind};
use crate::filters::{apply_filter, FilterKind};

fn js_error(err: FilterError) -> JsError {
    JsError::new(&err.to_string())
}

fn load(data: &[u8], width: usize, height: usize) -> Result<PixelBuffer, JsError> {
    PixelBuffer::from_raw(width, height, data.to_vec()).map_err(js_error)
}

// ============================================================================
// Noise
// ============================================================================

/// Overwrite 10% of the pixels with impulse noise.
///
/// # Arguments
/// * `data` - Flat RGB bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `kind` - "unipolar" or "bipolar"
/// * `seed` - Seed for reproducible output
#[wasm_bindgen]
pub fn inject_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kind: &str,
    seed: u64,
) -> Result<Vec<u8>, JsError> {
    let kind: NoiseKind = kind.parse().map_err(js_error)?;
    let mut buffer = load(data, width, height)?;
    NoiseInjector::new(kind)
        .with_seed(seed)
        .inject(&mut buffer)
        .map_err(js_error)?;
    Ok(buffer.into_raw())
}

// ============================================================================
// Channel Isolation
// ============================================================================

/// Keep one channel ("r", "g" or "b") and zero the other two.
#[wasm_bindgen]
pub fn isolate_channel_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channel: &str,
) -> Result<Vec<u8>, JsError> {
    let channel: Channel = channel.parse().map_err(js_error)?;
    let mut buffer = load(data, width, height)?;
    isolate_channel(&mut buffer, channel);
    Ok(buffer.into_raw())
}

// ============================================================================
// Windowed Filters
// ============================================================================

/// Apply "median" or "harmonic-mean" over an odd mask (3-11).
///
/// # Arguments
/// * `filter` - Filter name
/// * `mask_size` - Window side length
/// * `border` - "clamp" or "crop"
#[wasm_bindgen]
pub fn filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    filter: &str,
    mask_size: usize,
    border: &str,
) -> Result<Vec<u8>, JsError> {
    if mask_size > MAX_MASK_SIZE {
        return Err(JsError::new(&format!(
            "mask_size must be at most {MAX_MASK_SIZE}, got {mask_size}"
        )));
    }
    let kind: FilterKind = filter.parse().map_err(js_error)?;
    let border: BorderPolicy = border.parse().map_err(js_error)?;
    let mask = MaskSize::new(mask_size).map_err(js_error)?;
    let source = load(data, width, height)?;
    let result = apply_filter(&source, kind, WindowOptions::new(mask).with_border(border))
        .map_err(js_error)?;
    Ok(result.into_raw())
}
