//! Pipeline configuration.
//!
//! Defaults mirror the interactive tool: unipolar noise on 10% of the
//! pixels, red channel, 3x3 median filter with clamped borders. A JSON file
//! may override any subset of the fields:
//!
//! ```json
//! { "noise": "bipolar", "filter": "harmonic-mean", "mask_size": 5, "seed": 42 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::filters::channel::Channel;
use crate::filters::core::{BorderPolicy, MaskSize, WindowOptions, MAX_MASK_SIZE};
use crate::filters::noise::{NoiseInjector, NoiseKind, DEFAULT_NOISE_RATIO};
use crate::filters::FilterKind;

/// Settings for one run of the three-stage pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub noise: NoiseKind,
    pub noise_ratio: f64,
    pub channel: Channel,
    pub filter: FilterKind,
    pub mask_size: usize,
    pub border: BorderPolicy,
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            noise: NoiseKind::Unipolar,
            noise_ratio: DEFAULT_NOISE_RATIO,
            channel: Channel::R,
            filter: FilterKind::Median,
            mask_size: 3,
            border: BorderPolicy::Clamp,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_json_file(path: &Path) -> FilterResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| FilterError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&text).map_err(|e| FilterError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> FilterResult<()> {
        if !(0.0..=1.0).contains(&self.noise_ratio) {
            return Err(FilterError::invalid(format!(
                "noise_ratio must be within 0.0-1.0, got {}",
                self.noise_ratio
            )));
        }
        self.window_options()?;
        Ok(())
    }

    /// Noise injector for this configuration.
    pub fn noise_injector(&self) -> NoiseInjector {
        let injector = NoiseInjector::new(self.noise).with_ratio(self.noise_ratio);
        match self.seed {
            Some(seed) => injector.with_seed(seed),
            None => injector,
        }
    }

    /// Validated window options. Mask sizes above 11 are rejected here even
    /// though the filters themselves accept them.
    pub fn window_options(&self) -> FilterResult<WindowOptions> {
        if self.mask_size > MAX_MASK_SIZE {
            return Err(FilterError::invalid(format!(
                "mask_size must be at most {MAX_MASK_SIZE}, got {}",
                self.mask_size
            )));
        }
        Ok(WindowOptions::new(MaskSize::new(self.mask_size)?).with_border(self.border))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.noise_injector().ratio, 0.1);
        assert_eq!(config.window_options().unwrap().mask.get(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "noise": "bipolar", "filter": "harmonic-mean", "seed": 9 }"#)
                .unwrap();
        assert_eq!(config.noise, NoiseKind::Bipolar);
        assert_eq!(config.filter, FilterKind::HarmonicMean);
        assert_eq!(config.channel, Channel::R);
        assert_eq!(config.mask_size, 3);
        assert_eq!(config.noise_injector().seed, Some(9));
    }

    #[test]
    fn test_validate_rejects_bad_mask() {
        for mask_size in [2, 4, 13] {
            let config = PipelineConfig {
                mask_size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(FilterError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        let config = PipelineConfig {
            noise_ratio: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "spatial_filtering_config_{}.json",
            std::process::id()
        ));
        let config = PipelineConfig {
            channel: Channel::B,
            border: BorderPolicy::Crop,
            mask_size: 7,
            ..Default::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(PipelineConfig::from_json_file(&path).unwrap(), config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_unknown_channel() {
        let path = std::env::temp_dir().join(format!(
            "spatial_filtering_bad_config_{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "channel": "alpha" }"#).unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(FilterError::Config { .. })
        ));
        let _ = fs::remove_file(&path);
    }
}
