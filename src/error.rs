use std::path::PathBuf;

pub type PainterResult<T> = Result<T, PainterError>;

/// A generation request that can't be honored. Checked before anything random happens.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("canvas must be at least 1x1, received {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("the network needs at least one layer")]
    NoLayers,

    #[error("hidden layers need at least one unit")]
    NoHiddenUnits,

    #[error("at least one frame must be rendered")]
    NoFrames,

    #[error("time radius must be a finite, non-negative number, received {0}")]
    InvalidRadius(f32),
}

/// An Error during the construction of a network.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConsError {
    /// A layer is incompatible with the previous one
    #[error(
        "layer {index} is incompatible with the layer before: expected input length of {expected_input} but received {received_input}"
    )]
    Incompatible {
        index: usize,
        received_input: usize,
        expected_input: usize,
    },

    #[error("the network must have at least a single layer, but it was empty")]
    Empty,

    #[error("the network must read at least one input channel")]
    NoInputs,

    #[error("the layers need {expected} weights but {found} were stored")]
    WeightCount { expected: usize, found: usize },

    #[error("layer {index} is empty or reads weights outside of the storage")]
    BadLayer { index: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The field was built for a different network, e.g. a time field fed to a network
    /// built for a static one.
    #[error("network expects {expected} input channels but the field provides {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("cannot evaluate an empty {width}x{height} field")]
    EmptyField { width: u32, height: u32 },

    #[error("network produces {found} channels per pixel instead of a color")]
    OutputChannels { found: usize },
}

/// Failure reported by an animation encoder.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("frame is {found:?} but the animation is {expected:?}")]
    FrameSize {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("encoder error: {0}")]
    Other(String),
}

impl EncodeError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PainterError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build network: {0}")]
    Construction(#[from] ConsError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("animation encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("a generation is already in progress")]
    Busy,

    #[error("failed to read config '{path}': {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(PainterError::from(ConfigError::NoLayers)
            .to_string()
            .starts_with("invalid configuration:"));
        assert!(PainterError::from(EvalError::ShapeMismatch {
            expected: 2,
            found: 4
        })
        .to_string()
        .contains("expects 2 input channels"));
        assert!(PainterError::from(EncodeError::other("boom"))
            .to_string()
            .contains("boom"));
    }
}
