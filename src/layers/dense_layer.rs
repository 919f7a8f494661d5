use crate::{
    a_funcs::{ActivFunc, Activation},
    initializer::{GlorotUniform, Initializer},
    layers::{ChannelStats, Layer, LayerBuilder},
    storage::{Allocator, Handle, Storage},
};
use serde::{Deserialize, Serialize};

/// Your run of the mill fully connected (dense) layer, applied to every pixel independently.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DenseLayer {
    in_size: usize,
    size: usize,

    weights: Handle,
    biases: Handle,

    a_func: Activation,
}

impl DenseLayer {
    /// Weights are requested from `init` output by output, biases start at zero.
    pub fn new<I>(a_func: Activation, mut init: I, alloc: &mut Allocator, in_size: usize, size: usize) -> Self
    where
        I: Initializer,
    {
        let weights = alloc.allocate(
            in_size * size,
            std::iter::repeat_with(|| init.get(in_size, size)),
        );
        let biases = alloc.allocate_zeroed(size);

        Self {
            in_size,
            size,
            weights,
            biases,
            a_func,
        }
    }

    pub fn activation(&self) -> Activation {
        self.a_func
    }
}

impl Layer for DenseLayer {
    fn eval(&self, input: &[f32], weights: &Storage, _stats: Option<&ChannelStats>, output: &mut [f32]) {
        let biases = weights.get(self.biases);
        let weights = weights.get(self.weights);

        // assert dominance
        assert_eq!(weights.len(), self.in_size * self.size);
        assert_eq!(biases.len(), self.size);
        assert_eq!(input.len() / self.in_size, output.len() / self.size);
        assert_eq!(input.len() % self.in_size, 0);

        for (pixel, out) in input
            .chunks_exact(self.in_size)
            .zip(output.chunks_exact_mut(self.size))
        {
            for ((o, w), b) in out
                .iter_mut()
                .zip(weights.chunks_exact(self.in_size))
                .zip(biases)
            {
                *o = pixel
                    .iter()
                    .zip(w)
                    .fold(*b, |acc, (inp, w)| inp.mul_add(*w, acc));
            }
            self.a_func.apply(out);
        }
    }

    fn in_size(&self) -> usize {
        self.in_size
    }

    fn out_size(&self) -> usize {
        self.size
    }

    fn weight_count(&self) -> usize {
        self.in_size * self.size + self.size
    }

    fn fits(&self, weights: &Storage) -> bool {
        self.in_size > 0
            && self.size > 0
            && weights.contains(self.weights)
            && weights.contains(self.biases)
            && self.weights.len() == self.in_size * self.size
            && self.biases.len() == self.size
    }
}

pub struct DenseBuilder<I = GlorotUniform> {
    a_func: Activation,
    init: I,
    size: usize,
}

impl<I> DenseBuilder<I> {
    pub fn new(a_func: Activation, init: I, size: usize) -> Self {
        DenseBuilder { a_func, init, size }
    }
}

impl<I> LayerBuilder for DenseBuilder<I>
where
    I: Initializer,
{
    type Output = DenseLayer;

    fn connect(self, in_size: usize, alloc: &mut Allocator) -> Self::Output {
        DenseLayer::new(self.a_func, self.init, alloc, in_size, self.size)
    }
}
