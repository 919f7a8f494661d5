use neural_painter::{GenerationConfig, Painter, RandomArchitecture};
use rand::{rngs::SmallRng, RngCore, SeedableRng};
use std::{cell::Cell, rc::Rc};

/// Counts every value drawn from the wrapped generator.
pub struct CountingRng {
    inner: SmallRng,
    draws: Rc<Cell<usize>>,
}

impl CountingRng {
    pub fn new(seed: u64) -> (Self, Rc<Cell<usize>>) {
        let draws = Rc::new(Cell::new(0));
        let rng = Self {
            inner: SmallRng::seed_from_u64(seed),
            draws: Rc::clone(&draws),
        };
        (rng, draws)
    }

    fn count(&self) {
        self.draws.set(self.draws.get() + 1);
    }
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.count();
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.count();
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.count();
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.count();
        self.inner.try_fill_bytes(dest)
    }
}

pub fn small_config() -> GenerationConfig {
    GenerationConfig {
        width: 16,
        height: 16,
        layer_count: 3,
        hidden_width: 6,
        frame_count: 5,
        time_radius: 10.,
        ..GenerationConfig::default()
    }
}

pub fn seeded_painter(config: GenerationConfig, seed: u64) -> Painter {
    Painter::with_architecture(config, RandomArchitecture::with_seed(seed))
        .expect("test configurations are valid")
}
