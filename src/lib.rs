//! Spatial filtering engine
//!
//! Noise injection, channel isolation and windowed denoising for RGB
//! images, with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! All stages operate on [`PixelBuffer`]: an owned (height, width, 3) u8
//! array, at least 1x1. Decoded images have any alpha channel dropped.
//!
//! ## Pipeline
//! 1. [`filters::noise`] overwrites exactly 10% of the pixels (sampled
//!    without replacement) with white, or with black/white.
//! 2. [`filters::channel`] keeps one of R, G, B and zeroes the others.
//! 3. [`filters::median`] or [`filters::harmonic`] denoises the noisy image
//!    over an odd square window, clamped at the borders by default.
//!
//! [`pipeline::PipelineContext`] keeps the four stage buffers apart for a
//! driver such as the `spatial-filtering` binary.

pub mod buffer;
pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{PixelBuffer, Rgb};
pub use config::PipelineConfig;
pub use error::{FilterError, FilterResult};
pub use filters::channel::{isolate_channel, Channel};
pub use filters::core::{BorderPolicy, MaskSize, WindowOptions};
pub use filters::noise::{inject_noise, NoiseInjector, NoiseKind};
pub use filters::{apply_filter, FilterKind};
pub use io::{decode_image, encode_image};
pub use pipeline::PipelineContext;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::PixelBuffer;
    use crate::error::FilterError;
    use crate::filters::channel::{isolate_channel as isolate_channel_impl, Channel};
    use crate::filters::core::{BorderPolicy, MaskSize, WindowOptions, MAX_MASK_SIZE};
    use crate::filters::noise::{NoiseInjector, NoiseKind};
    use crate::filters::{apply_filter, FilterKind};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn window_options(mask_size: usize, border: &str) -> Result<WindowOptions, FilterError> {
        if mask_size > MAX_MASK_SIZE {
            return Err(FilterError::InvalidParameter(format!(
                "mask_size must be at most {MAX_MASK_SIZE}, got {mask_size}"
            )));
        }
        let border: BorderPolicy = border.parse()?;
        Ok(WindowOptions::new(MaskSize::new(mask_size)?).with_border(border))
    }

    fn filter_py<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kind: FilterKind,
        mask_size: usize,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let options = window_options(mask_size, border)?;
        let source = PixelBuffer::from_view(image.as_array())?;
        let result = apply_filter(&source, kind, options)?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// Overwrite 10% of the pixels of an RGB u8 image with impulse noise.
    ///
    /// # Arguments
    /// * `image` - (H, W, 3) u8 array
    /// * `kind` - "unipolar" (white) or "bipolar" (black or white)
    /// * `seed` - Optional seed for reproducible output
    #[pyfunction]
    #[pyo3(signature = (image, kind="unipolar", seed=None))]
    pub fn inject_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kind: &str,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kind: NoiseKind = kind.parse()?;
        let mut buffer = PixelBuffer::from_view(image.as_array())?;
        let injector = match seed {
            Some(seed) => NoiseInjector::new(kind).with_seed(seed),
            None => NoiseInjector::new(kind),
        };
        injector.inject(&mut buffer)?;
        Ok(buffer.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Channel Isolation
    // ========================================================================

    /// Keep one channel ("r", "g" or "b") and zero the other two.
    #[pyfunction]
    pub fn isolate_channel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        channel: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let channel: Channel = channel.parse()?;
        let mut buffer = PixelBuffer::from_view(image.as_array())?;
        isolate_channel_impl(&mut buffer, channel);
        Ok(buffer.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Windowed Filters
    // ========================================================================

    /// Per-channel median filter over an odd mask (3-11).
    #[pyfunction]
    #[pyo3(signature = (image, mask_size=3, border="clamp"))]
    pub fn median_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask_size: usize,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        filter_py(py, image, FilterKind::Median, mask_size, border)
    }

    /// Per-channel harmonic mean filter over an odd mask (3-11).
    #[pyfunction]
    #[pyo3(signature = (image, mask_size=3, border="clamp"))]
    pub fn harmonic_mean_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask_size: usize,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        filter_py(py, image, FilterKind::HarmonicMean, mask_size, border)
    }

    /// Spatial filtering extension module
    #[pymodule]
    pub fn spatial_filtering(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(inject_noise, m)?)?;
        m.add_function(wrap_pyfunction!(isolate_channel, m)?)?;
        m.add_function(wrap_pyfunction!(median_filter, m)?)?;
        m.add_function(wrap_pyfunction!(harmonic_mean_filter, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::spatial_filtering;
