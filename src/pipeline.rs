//! Stage buffers for one noise → channel → filter session.
//!
//! [`PipelineContext`] owns the four buffers a driver displays or saves:
//! the decoded original, the noisy copy, the channel-isolated copy of the
//! noisy image and the filtered image. Each stage works on its own clone,
//! so running a later stage never changes an earlier one.

use std::path::{Path, PathBuf};

use crate::buffer::PixelBuffer;
use crate::config::PipelineConfig;
use crate::error::{FilterError, FilterResult};
use crate::filters::channel::{isolate_channel, Channel};
use crate::filters::core::WindowOptions;
use crate::filters::noise::NoiseInjector;
use crate::filters::{apply_filter, FilterKind};
use crate::io::encode_image;

/// Default file name for the noisy image.
pub const NOISY_FILE_NAME: &str = "noise-image-01.png";
/// Default file name for the channel-isolated image.
pub const CHANNEL_FILE_NAME: &str = "channel-image-01.png";
/// Default file name for the filtered image.
pub const FILTERED_FILE_NAME: &str = "filter-image-01.png";

#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    original: Option<PixelBuffer>,
    noisy: Option<PixelBuffer>,
    channel: Option<PixelBuffer>,
    filtered: Option<PixelBuffer>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new original image and drop every derived stage.
    pub fn load(&mut self, original: PixelBuffer) {
        self.reset();
        self.original = Some(original);
    }

    /// Noise a clone of the original, then isolate `channel` on a clone of
    /// the noisy result.
    ///
    /// # Errors
    /// `InvalidParameter` when no original has been loaded.
    pub fn apply_noise_and_channel(
        &mut self,
        injector: &NoiseInjector,
        channel: Channel,
    ) -> FilterResult<()> {
        let original = self
            .original
            .as_ref()
            .ok_or_else(|| FilterError::invalid("no original image loaded"))?;

        let mut noisy = original.snapshot();
        let noised = injector.inject(&mut noisy)?;
        tracing::info!(noised, kind = %injector.kind, "noise stage complete");

        let mut isolated = noisy.snapshot();
        isolate_channel(&mut isolated, channel);
        tracing::info!(channel = %channel, "channel stage complete");

        self.noisy = Some(noisy);
        self.channel = Some(isolated);
        self.filtered = None;
        Ok(())
    }

    /// Filter the noisy image into the filtered stage.
    ///
    /// # Errors
    /// `InvalidParameter` when noise has not been applied yet.
    pub fn apply_filter(&mut self, kind: FilterKind, options: WindowOptions) -> FilterResult<()> {
        let noisy = self
            .noisy
            .as_ref()
            .ok_or_else(|| FilterError::invalid("noise must be applied before filtering"))?;

        let filtered = apply_filter(noisy, kind, options)?;
        noisy.ensure_same_dimensions(&filtered)?;
        tracing::info!(
            filter = %kind,
            mask = %options.mask,
            border = %options.border,
            "filter stage complete"
        );

        self.filtered = Some(filtered);
        Ok(())
    }

    /// Run all three stages with `config`.
    pub fn run(&mut self, config: &PipelineConfig) -> FilterResult<()> {
        let options = config.window_options()?;
        self.apply_noise_and_channel(&config.noise_injector(), config.channel)?;
        self.apply_filter(config.filter, options)
    }

    /// Drop every buffer.
    pub fn reset(&mut self) {
        self.original = None;
        self.noisy = None;
        self.channel = None;
        self.filtered = None;
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn noisy(&self) -> Option<&PixelBuffer> {
        self.noisy.as_ref()
    }

    pub fn channel(&self) -> Option<&PixelBuffer> {
        self.channel.as_ref()
    }

    pub fn filtered(&self) -> Option<&PixelBuffer> {
        self.filtered.as_ref()
    }

    /// Write every derived stage that exists into `dir` under the default
    /// file names. Returns the paths written.
    pub fn save_all(&self, dir: &Path) -> FilterResult<Vec<PathBuf>> {
        let stages = [
            (&self.noisy, NOISY_FILE_NAME),
            (&self.channel, CHANNEL_FILE_NAME),
            (&self.filtered, FILTERED_FILE_NAME),
        ];

        let mut written = Vec::new();
        for (buffer, name) in stages {
            if let Some(buffer) = buffer {
                let path = dir.join(name);
                encode_image(buffer, &path)?;
                tracing::info!(path = %path.display(), "saved image");
                written.push(path);
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BLACK, WHITE};
    use crate::filters::core::MaskSize;
    use crate::filters::noise::NoiseKind;

    fn original() -> PixelBuffer {
        PixelBuffer::from_fn(20, 10, |x, y| [(x * 10) as u8, (y * 20) as u8, 77]).unwrap()
    }

    #[test]
    fn test_filter_requires_noise() {
        let mut ctx = PipelineContext::new();
        ctx.load(original());
        let options = WindowOptions::new(MaskSize::new(3).unwrap());
        assert!(matches!(
            ctx.apply_filter(FilterKind::Median, options),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_noise_requires_original() {
        let mut ctx = PipelineContext::new();
        let injector = NoiseInjector::new(NoiseKind::Unipolar);
        assert!(ctx.apply_noise_and_channel(&injector, Channel::R).is_err());
    }

    #[test]
    fn test_stages_do_not_alias() {
        let mut ctx = PipelineContext::new();
        ctx.load(original());
        let injector = NoiseInjector::new(NoiseKind::Bipolar).with_seed(5);
        ctx.apply_noise_and_channel(&injector, Channel::G).unwrap();

        assert_eq!(ctx.original(), Some(&original()));

        let noisy = ctx.noisy().unwrap();
        let channel = ctx.channel().unwrap();
        let noised = noisy
            .pixels()
            .filter(|&(_, _, c)| c == WHITE || c == BLACK)
            .count();
        assert_eq!(noised, 20);

        for ((x, y, n), (_, _, c)) in noisy.pixels().zip(channel.pixels()) {
            assert_eq!(c, [0, n[1], 0], "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_run_fills_every_stage() {
        let mut ctx = PipelineContext::new();
        ctx.load(original());
        let config = PipelineConfig {
            filter: FilterKind::HarmonicMean,
            mask_size: 5,
            seed: Some(11),
            ..Default::default()
        };
        ctx.run(&config).unwrap();

        let filtered = ctx.filtered().unwrap();
        assert_eq!((filtered.width(), filtered.height()), (20, 10));
        assert!(ctx.channel().is_some());
    }

    #[test]
    fn test_renoise_clears_filtered() {
        let mut ctx = PipelineContext::new();
        ctx.load(original());
        ctx.run(&PipelineConfig::default()).unwrap();
        assert!(ctx.filtered().is_some());

        let injector = NoiseInjector::new(NoiseKind::Unipolar).with_seed(1);
        ctx.apply_noise_and_channel(&injector, Channel::B).unwrap();
        assert!(ctx.filtered().is_none());
    }

    #[test]
    fn test_reset_and_load() {
        let mut ctx = PipelineContext::new();
        ctx.load(original());
        ctx.run(&PipelineConfig::default()).unwrap();
        ctx.reset();
        assert!(ctx.original().is_none());
        assert!(ctx.noisy().is_none());
        assert!(ctx.channel().is_none());
        assert!(ctx.filtered().is_none());
    }

    #[test]
    fn test_run_rejects_invalid_mask_before_noise() {
        let mut ctx = PipelineContext::new();
        ctx.load(original());
        let config = PipelineConfig {
            mask_size: 4,
            ..Default::default()
        };
        assert!(ctx.run(&config).is_err());
        assert!(ctx.noisy().is_none());
    }
}
