use crate::{
    error::ConsError,
    layers::{BasicLayer, Layer, LayerBuilder},
    network::Network,
    storage::Allocator,
};

/// Builder for networks where all layers have only a single input and output.
pub struct LinearBuilder {
    allocator: Allocator,
    layers: Vec<BasicLayer>,
    in_size: usize,
}

impl LinearBuilder {
    pub fn new(in_size: usize) -> Self {
        LinearBuilder {
            allocator: Allocator::new(),
            layers: Vec::new(),
            in_size,
        }
    }

    fn last_out_size(&self) -> usize {
        self.layers.last().map_or(self.in_size, |l| l.out_size())
    }

    /// Adds a single layer to the network.
    pub fn layer<T>(mut self, layer: T) -> Self
    where
        T: LayerBuilder,
        T::Output: Into<BasicLayer>,
    {
        let in_size = self.last_out_size();
        let layer = layer.connect(in_size, &mut self.allocator).into();
        self.layers.push(layer);
        self
    }

    /// Adds all of the layers provided by the `builders` argument.
    pub fn layers<T>(mut self, builders: T) -> Self
    where
        T: IntoIterator,
        T::Item: LayerBuilder,
        <T::Item as LayerBuilder>::Output: Into<BasicLayer>,
    {
        for builder in builders {
            self = self.layer(builder);
        }
        self
    }

    /// Builds the network. Fails if no layers had been provided or there is nothing to read.
    pub fn build(self) -> Result<Network, ConsError> {
        check_chain(self.in_size, &self.layers)?;
        Ok(Network::new(self.allocator.finish(), self.layers))
    }
}

/// Every layer must read exactly what the one before it produces.
pub(crate) fn check_chain(in_size: usize, layers: &[BasicLayer]) -> Result<(), ConsError> {
    if in_size == 0 {
        return Err(ConsError::NoInputs);
    }

    let mut expected = in_size;
    for (index, layer) in layers.iter().enumerate() {
        if layer.in_size() != expected {
            return Err(ConsError::Incompatible {
                index,
                received_input: expected,
                expected_input: layer.in_size(),
            });
        }
        expected = layer.out_size();
    }

    if layers.is_empty() {
        return Err(ConsError::Empty);
    }
    Ok(())
}
