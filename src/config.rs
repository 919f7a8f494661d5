use crate::{
    error::{ConfigError, PainterError, PainterResult},
    evaluator::Chunking,
};

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Everything a generation needs to know. Build one, [validate](GenerationConfig::validate)
/// it once and hand it to a [Painter](crate::painter::Painter).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of dense layers, the last of which produces the color.
    pub layer_count: usize,
    /// Units of every hidden layer.
    pub hidden_width: usize,
    /// Frames of an animation, 1 renders a still image.
    pub frame_count: usize,
    /// Amplitude of the cosine/sine time signal.
    pub time_radius: f32,
    pub chunking: Chunking,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            layer_count: 3,
            hidden_width: 10,
            frame_count: 20,
            time_radius: 100.,
            chunking: Chunking::Rows,
        }
    }
}

impl GenerationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PainterResult<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| PainterError::ConfigFile {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_str(&s)?;
        Ok(config)
    }

    /// The same configuration rendering a single frame.
    pub fn still(&self) -> Self {
        Self {
            frame_count: 1,
            ..self.clone()
        }
    }

    pub fn is_animation(&self) -> bool {
        self.frame_count > 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.layer_count == 0 {
            return Err(ConfigError::NoLayers);
        }
        if self.hidden_width == 0 {
            return Err(ConfigError::NoHiddenUnits);
        }
        if self.frame_count == 0 {
            return Err(ConfigError::NoFrames);
        }
        if !self.time_radius.is_finite() || self.time_radius < 0. {
            return Err(ConfigError::InvalidRadius(self.time_radius));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.is_animation());
        assert!(!config.still().is_animation());
    }

    #[test]
    fn each_field_is_checked() {
        let base = GenerationConfig::default();
        let cases = vec![
            (
                GenerationConfig { width: 0, ..base.clone() },
                ConfigError::EmptyCanvas { width: 0, height: 256 },
            ),
            (
                GenerationConfig { height: 0, ..base.clone() },
                ConfigError::EmptyCanvas { width: 256, height: 0 },
            ),
            (
                GenerationConfig { layer_count: 0, ..base.clone() },
                ConfigError::NoLayers,
            ),
            (
                GenerationConfig { hidden_width: 0, ..base.clone() },
                ConfigError::NoHiddenUnits,
            ),
            (
                GenerationConfig { frame_count: 0, ..base.clone() },
                ConfigError::NoFrames,
            ),
            (
                GenerationConfig { time_radius: -1., ..base.clone() },
                ConfigError::InvalidRadius(-1.),
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }

        let nan = GenerationConfig { time_radius: f32::NAN, ..base };
        assert!(matches!(nan.validate(), Err(ConfigError::InvalidRadius(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{ "width": 64, "chunking": "field" }"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 256);
        assert_eq!(config.chunking, Chunking::Field);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<GenerationConfig>(r#"{ "widht": 64 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn loads_from_file() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("neural-painter-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "layer_count": 7, "frame_count": 1 }"#)?;
        let config = GenerationConfig::from_file(&path)?;
        fs::remove_file(&path)?;

        assert_eq!(config.layer_count, 7);
        assert!(!config.is_animation());
        Ok(())
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = GenerationConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
