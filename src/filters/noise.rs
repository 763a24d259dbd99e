//! Impulse noise injection: unipolar (salt) and bipolar (salt-and-pepper).
//!
//! A fixed fraction of the pixels (10% by default) is chosen uniformly at
//! random **without replacement** and overwritten with an extreme color.
//! The noised count is exact, `floor(width * height * ratio)`, rather than a
//! per-pixel probability.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, BLACK, WHITE};
use crate::error::{FilterError, FilterResult};

/// Fraction of pixels replaced by noise.
pub const DEFAULT_NOISE_RATIO: f64 = 0.1;

/// Kind of impulse noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Every affected pixel becomes white.
    #[default]
    Unipolar,
    /// Every affected pixel becomes black or white with equal probability.
    Bipolar,
}

impl FromStr for NoiseKind {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unipolar" | "salt" => Ok(NoiseKind::Unipolar),
            "bipolar" | "salt-and-pepper" => Ok(NoiseKind::Bipolar),
            other => Err(FilterError::invalid(format!(
                "unknown noise kind '{other}' (expected unipolar or bipolar)"
            ))),
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseKind::Unipolar => f.write_str("unipolar"),
            NoiseKind::Bipolar => f.write_str("bipolar"),
        }
    }
}

/// Number of pixels noised for `pixel_count` pixels at `ratio` (floored).
pub fn noise_amount(pixel_count: usize, ratio: f64) -> usize {
    (pixel_count as f64 * ratio) as usize
}

/// Overwrite `floor(pixels * ratio)` distinct pixels with noise.
///
/// Coordinates are drawn with a partial shuffle over the flat pixel index,
/// so the work is proportional to the noised count, not the image size.
///
/// # Arguments
/// * `buffer` - Buffer modified in place
/// * `kind` - Unipolar or bipolar noise
/// * `ratio` - Fraction of pixels to noise (0.0-1.0)
/// * `rng` - Random source; seed it for reproducible output
///
/// # Returns
/// Number of pixels that were overwritten
pub fn inject_noise_with_ratio<R: Rng + ?Sized>(
    buffer: &mut PixelBuffer,
    kind: NoiseKind,
    ratio: f64,
    rng: &mut R,
) -> FilterResult<usize> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(FilterError::invalid(format!(
            "noise ratio must be within 0.0-1.0, got {ratio}"
        )));
    }

    let amount = noise_amount(buffer.pixel_count(), ratio);
    scatter(buffer, kind, amount, rng);
    Ok(amount)
}

/// Overwrite 10% of the pixels with noise. See [`inject_noise_with_ratio`].
pub fn inject_noise<R: Rng + ?Sized>(buffer: &mut PixelBuffer, kind: NoiseKind, rng: &mut R) -> usize {
    let amount = noise_amount(buffer.pixel_count(), DEFAULT_NOISE_RATIO);
    scatter(buffer, kind, amount, rng);
    amount
}

fn scatter<R: Rng + ?Sized>(buffer: &mut PixelBuffer, kind: NoiseKind, amount: usize, rng: &mut R) {
    let width = buffer.width();
    let total = buffer.pixel_count();

    tracing::debug!(
        total_pixels = total,
        noise_pixels = amount,
        noise_percent = amount as f64 * 100.0 / total as f64,
        kind = %kind,
        "injecting noise"
    );

    for i in index::sample(rng, total, amount).into_iter() {
        let color = match kind {
            NoiseKind::Unipolar => WHITE,
            NoiseKind::Bipolar if rng.random_bool(0.5) => BLACK,
            NoiseKind::Bipolar => WHITE,
        };
        buffer.put(i % width, i / width, color);
    }
}

/// Noise settings bundled with an optional seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseInjector {
    pub kind: NoiseKind,
    pub ratio: f64,
    pub seed: Option<u64>,
}

impl NoiseInjector {
    /// Injector with the default 10% ratio and an OS-seeded generator.
    pub fn new(kind: NoiseKind) -> Self {
        NoiseInjector {
            kind,
            ratio: DEFAULT_NOISE_RATIO,
            seed: None,
        }
    }

    /// Same injector with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Same injector with a different noise ratio.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Build the random source: seeded when a seed is set, OS entropy
    /// otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Inject noise into `buffer` in place.
    pub fn inject(&self, buffer: &mut PixelBuffer) -> FilterResult<usize> {
        let mut rng = self.rng();
        inject_noise_with_ratio(buffer, self.kind, self.ratio, &mut rng)
    }
}
