pub mod dense_layer;
pub mod norm_layer;

pub use dense_layer::{DenseBuilder, DenseLayer};
pub use norm_layer::{ChannelStats, NormBuilder, NormLayer};

use crate::storage::{Allocator, Storage};

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// A single step of a feed-forward network.
///
/// Layers operate on chunks of pixels. A chunk holds `pixels * in_size` values laid out
/// pixel by pixel, and the layer writes `pixels * out_size` values to `output`.
/// Layers never hold evaluation state, so a network can be evaluated any number of
/// times through a shared reference.
#[enum_dispatch]
pub trait Layer {
    /// Evaluate a chunk. `stats` is whatever [observe](Layer::observe) returned for the
    /// field the chunk belongs to.
    fn eval(&self, input: &[f32], weights: &Storage, stats: Option<&ChannelStats>, output: &mut [f32]);

    /// Collect the statistics this layer needs from the whole field before any chunk
    /// can be evaluated. Layers which only look at a single pixel return None.
    fn observe(&self, _input: &[f32]) -> Option<ChannelStats> {
        None
    }

    /// Get layer's input size
    fn in_size(&self) -> usize;
    /// Get layer's output size
    fn out_size(&self) -> usize;
    /// Get number of weights in the layer
    fn weight_count(&self) -> usize;

    /// Whether the layer can be evaluated against `weights`, i.e. its sizes are non-zero
    /// and every block it reads lies inside the storage.
    fn fits(&self, weights: &Storage) -> bool;
}

/// Trait all layer builders must implement in order to be added to a LinearBuilder via the layer function.
pub trait LayerBuilder {
    type Output: Layer;
    /// Connect a layer to the previous one, `in_size` being the output size of the layer before.
    fn connect(self, in_size: usize, alloc: &mut Allocator) -> Self::Output;
}

/// Every layer kind a network can be made of.
#[enum_dispatch(Layer)]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BasicLayer {
    Dense(DenseLayer),
    Norm(NormLayer),
}
