//! Random network architectures.
//!
//! Every hidden block is a dense layer with a randomly drawn activation followed by a
//! normalization layer. The last block maps to the three color channels through one more
//! randomly drawn activation. Weights are never trained, all of the variety comes from
//! the drawn depth, activations and initial weights.

use crate::{
    a_funcs::Activation,
    error::{ConfigError, PainterResult},
    initializer::GlorotUniform,
    layers::{DenseBuilder, NormBuilder},
    network::{LinearBuilder, Network},
};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::debug;

/// Number of outputs of every network, one per color channel.
pub const COLOR_CHANNELS: usize = 3;

/// Draws random networks. Every call to [build](RandomArchitecture::build) produces a
/// brand new network, nothing is shared between the networks of one builder.
pub struct RandomArchitecture<R = SmallRng> {
    rng: R,
}

impl RandomArchitecture {
    /// Seeded from system entropy, so no two generations look alike.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Reproducible draws, used by tests and by the `--seed` flag of the binary.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for RandomArchitecture {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomArchitecture<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Build a network reading `in_channels` values per pixel with `layer_count - 1`
    /// hidden blocks of `hidden_width` units and a final block producing the color.
    #[tracing::instrument(skip(self))]
    pub fn build(
        &mut self,
        in_channels: usize,
        hidden_width: usize,
        layer_count: usize,
    ) -> PainterResult<Network> {
        if layer_count < 1 {
            return Err(ConfigError::NoLayers.into());
        }
        if hidden_width < 1 {
            return Err(ConfigError::NoHiddenUnits.into());
        }

        let mut builder = LinearBuilder::new(in_channels);
        for i in 0..layer_count - 1 {
            let a_func = Activation::random(&mut self.rng);
            debug!(layer = i, activation = %a_func, width = hidden_width, "hidden block");
            builder = builder
                .layer(DenseBuilder::new(
                    a_func,
                    GlorotUniform::with_rng(&mut self.rng),
                    hidden_width,
                ))
                .layer(NormBuilder::new());
        }

        let a_func = Activation::random(&mut self.rng);
        debug!(activation = %a_func, "output block");
        let network = builder
            .layer(DenseBuilder::new(
                a_func,
                GlorotUniform::with_rng(&mut self.rng),
                COLOR_CHANNELS,
            ))
            .build()?;

        debug!(weights = network.weight_count(), "network built");
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConsError, PainterError};
    use crate::layers::{BasicLayer, Layer};

    #[test]
    fn hidden_blocks_are_dense_then_norm() {
        let network = RandomArchitecture::with_seed(1).build(2, 10, 4).unwrap();
        let layers = network.layers();

        assert_eq!(layers.len(), 3 * 2 + 1);
        for block in layers[..6].chunks(2) {
            assert!(matches!(block[0], BasicLayer::Dense(_)));
            assert!(matches!(block[1], BasicLayer::Norm(_)));
            assert_eq!(block[0].out_size(), 10);
        }
        assert_eq!(layers[0].in_size(), 2);
        assert_eq!(layers[6].in_size(), 10);
        assert_eq!(network.out_size(), COLOR_CHANNELS);
        assert_eq!(network.activations().len(), 4);
    }

    #[test]
    fn single_layer_maps_inputs_to_color() {
        let network = RandomArchitecture::with_seed(2).build(4, 10, 1).unwrap();
        assert_eq!(network.layers().len(), 1);
        assert_eq!(network.in_size(), 4);
        assert_eq!(network.out_size(), 3);
        assert_eq!(network.weight_count(), 4 * 3 + 3);
    }

    #[test]
    fn bad_shapes_are_rejected() {
        let mut arch = RandomArchitecture::with_seed(3);
        assert!(matches!(
            arch.build(2, 10, 0),
            Err(PainterError::Config(ConfigError::NoLayers))
        ));
        assert!(matches!(
            arch.build(2, 0, 3),
            Err(PainterError::Config(ConfigError::NoHiddenUnits))
        ));
        assert!(matches!(
            arch.build(0, 10, 3),
            Err(PainterError::Construction(ConsError::NoInputs))
        ));
    }

    #[test]
    fn rejection_happens_before_drawing() {
        let mut rejected = RandomArchitecture::with_seed(4);
        assert!(rejected.build(2, 10, 0).is_err());
        let after_rejection = rejected.build(2, 10, 3).unwrap();

        let fresh = RandomArchitecture::with_seed(4).build(2, 10, 3).unwrap();
        assert_eq!(after_rejection, fresh);
    }

    #[test]
    fn consecutive_builds_differ() {
        let mut arch = RandomArchitecture::with_seed(5);
        let a = arch.build(2, 10, 3).unwrap();
        let b = arch.build(2, 10, 3).unwrap();
        assert_ne!(a.weights(), b.weights());
    }

    #[test]
    fn same_seed_same_network() {
        let a = RandomArchitecture::with_seed(6).build(2, 8, 5).unwrap();
        let b = RandomArchitecture::with_seed(6).build(2, 8, 5).unwrap();
        assert_eq!(a, b);
    }
}
