pub mod construction;

pub use self::construction::LinearBuilder;

use crate::a_funcs::Activation;
use crate::error::ConsError;
use crate::layers::{BasicLayer, Layer};
use crate::storage::Storage;

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// An immutable feed-forward network. Every layer reads its weights from one shared
/// storage block, and evaluation only ever needs a shared reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedNetwork")]
pub struct Network {
    layers: Vec<BasicLayer>,
    weights: Storage,
}

/// A network as it is read from disk, before its layers are checked.
#[derive(Deserialize)]
struct SavedNetwork {
    layers: Vec<BasicLayer>,
    weights: Storage,
}

impl TryFrom<SavedNetwork> for Network {
    type Error = ConsError;

    fn try_from(saved: SavedNetwork) -> Result<Self, ConsError> {
        let in_size = saved.layers.first().map_or(0, |l| l.in_size());
        construction::check_chain(in_size, &saved.layers)?;

        let expected: usize = saved.layers.iter().map(|l| l.weight_count()).sum();
        if expected != saved.weights.len() {
            return Err(ConsError::WeightCount {
                expected,
                found: saved.weights.len(),
            });
        }

        if let Some(index) = saved.layers.iter().position(|l| !l.fits(&saved.weights)) {
            return Err(ConsError::BadLayer { index });
        }
        Ok(Self::new(saved.weights, saved.layers))
    }
}

impl Network {
    /// Use [LinearBuilder](self::LinearBuilder) which checks that the layers fit together.
    pub(crate) fn new(weights: Storage, layers: Vec<BasicLayer>) -> Self {
        Self { layers, weights }
    }

    pub fn layers(&self) -> &[BasicLayer] {
        &self.layers
    }

    pub fn weights(&self) -> &Storage {
        &self.weights
    }

    /// Returns input size of the network
    pub fn in_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.in_size())
    }

    /// Return output size of the network
    pub fn out_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.out_size())
    }

    pub fn weight_count(&self) -> usize {
        self.layers.iter().map(|l| l.weight_count()).sum()
    }

    /// Activation functions of the dense layers in evaluation order.
    pub fn activations(&self) -> Vec<Activation> {
        self.layers
            .iter()
            .filter_map(|l| match l {
                BasicLayer::Dense(d) => Some(d.activation()),
                BasicLayer::Norm(_) => None,
            })
            .collect()
    }

    /// Evaluates a batch of pixels in one go, `input` holding `in_size` values per pixel.
    /// Normalization statistics are taken over the batch itself.
    pub fn predict(&self, input: &[f32]) -> Vec<f32> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            let pixels = current.len() / layer.in_size();
            let stats = layer.observe(&current);
            let mut next = vec![0.; pixels * layer.out_size()];
            layer.eval(&current, &self.weights, stats.as_ref(), &mut next);
            current = next;
        }
        current
    }
}
