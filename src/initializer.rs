use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

//I used this blog post as reference to the initialization methods ->
//https://towardsdatascience.com/weight-initialization-in-neural-networks-a-journey-from-the-basics-to-kaiming-954fb9b47c79

/// Source of the initial weights of a layer. `in_size` and `size` are the fan in and fan out
/// of the layer the weight belongs to.
pub trait Initializer {
    fn get(&mut self, in_size: usize, size: usize) -> f32;
}

impl<T: Initializer + ?Sized> Initializer for &mut T {
    fn get(&mut self, in_size: usize, size: usize) -> f32 {
        (**self).get(in_size, size)
    }
}

/// Glorot uniform initialization, samples from `U(-l, l)` where `l = sqrt(6 / (in + out))`.
/// This is the default kernel initializer of the layers in this crate.
pub struct GlorotUniform<R = SmallRng> {
    rng: R,
}

impl GlorotUniform {
    /// Seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }
}

impl Default for GlorotUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GlorotUniform<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Initializer for GlorotUniform<R> {
    fn get(&mut self, in_size: usize, size: usize) -> f32 {
        let limit = (6. / (in_size + size) as f32).sqrt();
        self.rng.gen_range(-limit, limit)
    }
}

///Xavier initialization should be used for layers with symetric activation functions such as sigmoid or tanH
pub struct Xavier<R = SmallRng> {
    rng: R,
}

impl Xavier {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }
}

impl Default for Xavier {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Xavier<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Initializer for Xavier<R> {
    fn get(&mut self, in_size: usize, _size: usize) -> f32 {
        self.rng.sample::<f32, _>(StandardNormal) / (in_size as f32).sqrt()
    }
}

///Always initializes weights to one
#[derive(Clone, Copy, Debug, Default)]
pub struct Ones;
impl Initializer for Ones {
    fn get(&mut self, _: usize, _: usize) -> f32 {
        1.
    }
}

/// This initializer accepts an iterator over f32 values and uses them to initialize the weights.
/// Panics if a weight is requested but the iterator returns None.
pub struct WeightInit<I> {
    iter: I,
}

impl<I: Iterator<Item = f32>> WeightInit<I> {
    pub fn new<T: IntoIterator<Item = f32, IntoIter = I>>(weights: T) -> Self {
        Self {
            iter: weights.into_iter(),
        }
    }
}

impl<I: Iterator<Item = f32>> Initializer for WeightInit<I> {
    fn get(&mut self, _in_size: usize, _size: usize) -> f32 {
        self.iter.next().expect("Ran out of weights")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glorot_stays_within_limit() {
        let mut init = GlorotUniform::with_rng(SmallRng::seed_from_u64(3));
        let limit = (6f32 / 12.).sqrt();
        for _ in 0..1000 {
            let w = init.get(2, 10);
            assert!(w.abs() <= limit, "{} outside of +-{}", w, limit);
        }
    }

    #[test]
    fn glorot_is_not_constant() {
        let mut init = GlorotUniform::with_rng(SmallRng::seed_from_u64(3));
        let first = init.get(4, 4);
        assert!((0..100).any(|_| init.get(4, 4) != first));
    }

    #[test]
    fn xavier_scales_with_fan_in() {
        let mut init = Xavier::with_rng(SmallRng::seed_from_u64(11));
        let n = 10_000;
        let var = (0..n).map(|_| init.get(100, 1).powi(2)).sum::<f32>() / n as f32;
        assert!((var - 0.01).abs() < 0.002, "variance was {}", var);
    }

    #[test]
    fn borrowed_initializer_advances() {
        fn draw<I: Initializer>(mut init: I) -> f32 {
            init.get(1, 1)
        }

        let mut init = WeightInit::new(vec![1., 2., 3.]);
        assert_eq!(draw(&mut init), 1.);
        assert_eq!(init.get(1, 1), 2.);
        assert_eq!(Ones.get(5, 5), 1.);
    }
}
