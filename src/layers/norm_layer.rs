use crate::{
    layers::{Layer, LayerBuilder},
    storage::{Allocator, Storage},
};
use serde::{Deserialize, Serialize};

/// Per channel mean and inverse standard deviation of a layer's input over a whole field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub mean: Vec<f32>,
    pub inv_std: Vec<f32>,
}

impl ChannelStats {
    /// Population statistics of `input`, which holds `channels` values per pixel.
    pub fn compute(input: &[f32], channels: usize, epsilon: f32) -> Self {
        let pixels = input.len() / channels;
        let mut sum = vec![0f64; channels];
        let mut sum_sq = vec![0f64; channels];

        for pixel in input.chunks_exact(channels) {
            for ((s, sq), v) in sum.iter_mut().zip(&mut sum_sq).zip(pixel) {
                let v = f64::from(*v);
                *s += v;
                *sq += v * v;
            }
        }

        let n = pixels.max(1) as f64;
        let mut mean = Vec::with_capacity(channels);
        let mut inv_std = Vec::with_capacity(channels);
        for (s, sq) in sum.into_iter().zip(sum_sq) {
            let m = s / n;
            // rounding can push the variance of a constant channel slightly below zero
            let var = (sq / n - m * m).max(0.);
            mean.push(m as f32);
            inv_std.push((1. / (var + f64::from(epsilon)).sqrt()) as f32);
        }

        Self { mean, inv_std }
    }
}

/// Normalizes every channel to zero mean and unit variance over the field being
/// evaluated. Nothing here is learned, the layer has no weights.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NormLayer {
    size: usize,
    epsilon: f32,
}

impl NormLayer {
    pub const DEFAULT_EPSILON: f32 = 1e-3;

    pub fn new(size: usize, epsilon: f32) -> Self {
        Self { size, epsilon }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

impl Layer for NormLayer {
    fn eval(&self, input: &[f32], _weights: &Storage, stats: Option<&ChannelStats>, output: &mut [f32]) {
        let stats = stats.expect("NormLayer evaluated without observing the field first");

        assert_eq!(input.len(), output.len());
        assert_eq!(stats.mean.len(), self.size);

        for (inp, out) in input
            .chunks_exact(self.size)
            .zip(output.chunks_exact_mut(self.size))
        {
            for (((o, i), m), s) in out
                .iter_mut()
                .zip(inp)
                .zip(&stats.mean)
                .zip(&stats.inv_std)
            {
                *o = (*i - *m) * *s;
            }
        }
    }

    fn observe(&self, input: &[f32]) -> Option<ChannelStats> {
        Some(ChannelStats::compute(input, self.size, self.epsilon))
    }

    fn in_size(&self) -> usize {
        self.size
    }

    fn out_size(&self) -> usize {
        self.size
    }

    fn weight_count(&self) -> usize {
        0
    }

    fn fits(&self, _weights: &Storage) -> bool {
        self.size > 0 && self.epsilon.is_finite() && self.epsilon >= 0.
    }
}

pub struct NormBuilder {
    epsilon: f32,
}

impl NormBuilder {
    pub fn new() -> Self {
        Self {
            epsilon: NormLayer::DEFAULT_EPSILON,
        }
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl Default for NormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerBuilder for NormBuilder {
    type Output = NormLayer;

    fn connect(self, in_size: usize, _alloc: &mut Allocator) -> Self::Output {
        NormLayer::new(in_size, self.epsilon)
    }
}
