//! The generation pipeline tied together: configuration in, pixels or an animation out.

use crate::{
    animation::{assemble, AnimationEncoder, Sweep},
    architecture::RandomArchitecture,
    config::GenerationConfig,
    error::{PainterError, PainterResult},
    evaluator::Evaluator,
    field::{FieldCache, SPATIAL_CHANNELS, TEMPORAL_CHANNELS},
    network::Network,
    observer::Observer,
    render::{render, PixelBuffer},
};

use rand::{rngs::SmallRng, Rng};
use std::sync::{Arc, Mutex, TryLockError};
use tracing::info;

/// A still image together with the network that painted it.
#[derive(Debug, Clone)]
pub struct Painting {
    pub network: Network,
    pub pixels: PixelBuffer,
}

/// Whatever the encoder produced, together with the network that painted it.
#[derive(Debug, Clone)]
pub struct Animation<T> {
    pub network: Network,
    pub output: T,
}

/// Reports the generating state to an observer, resetting it when dropped so the state
/// is cleared on every way out of a generation.
struct Generating<O: Observer>(O);

impl<O: Observer> Generating<O> {
    fn start(mut observer: O) -> Self {
        observer.generating(true);
        Self(observer)
    }
}

impl<O: Observer> Drop for Generating<O> {
    fn drop(&mut self) {
        self.0.generating(false);
    }
}

/// Runs generations for a validated configuration. Every generation draws a brand new
/// network, only the coordinate field cache carries over between them.
pub struct Painter<R = SmallRng> {
    config: GenerationConfig,
    architecture: RandomArchitecture<R>,
    evaluator: Evaluator,
    cache: FieldCache,
}

impl Painter {
    pub fn new(config: GenerationConfig) -> PainterResult<Self> {
        Self::with_architecture(config, RandomArchitecture::new())
    }
}

impl<R: Rng> Painter<R> {
    /// Fails without drawing anything if the configuration is invalid.
    pub fn with_architecture(
        config: GenerationConfig,
        architecture: RandomArchitecture<R>,
    ) -> PainterResult<Self> {
        config.validate()?;
        Ok(Self {
            evaluator: Evaluator::new(config.chunking),
            config,
            architecture,
            cache: FieldCache::new(),
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Replace the configuration, keeping the old one if the new one is invalid.
    pub fn set_config(&mut self, config: GenerationConfig) -> PainterResult<()> {
        config.validate()?;
        self.evaluator = Evaluator::new(config.chunking);
        self.config = config;
        Ok(())
    }

    /// Paint a still image from a freshly drawn network.
    pub fn image<O: Observer>(&mut self, observer: O) -> PainterResult<Painting> {
        let mut guard = Generating::start(observer);
        let config = &self.config;
        info!(
            width = config.width,
            height = config.height,
            layers = config.layer_count,
            hidden = config.hidden_width,
            "painting image"
        );

        let network =
            self.architecture
                .build(SPATIAL_CHANNELS, config.hidden_width, config.layer_count)?;
        let field = self.cache.spatial(config.width, config.height);
        let observer = &mut guard.0;
        let raw = self
            .evaluator
            .evaluate(&network, field, |p| observer.progress(p))?;
        let pixels = render(&raw);

        info!("image finished");
        Ok(Painting { network, pixels })
    }

    /// Paint a looping animation of `frame_count` frames from a freshly drawn network,
    /// handing every frame to `encoder`.
    pub fn animation<E, O>(&mut self, encoder: E, observer: O) -> PainterResult<Animation<E::Output>>
    where
        E: AnimationEncoder,
        O: Observer,
    {
        let mut guard = Generating::start(observer);
        let config = &self.config;
        info!(
            width = config.width,
            height = config.height,
            frames = config.frame_count,
            radius = config.time_radius,
            "painting animation"
        );

        let network =
            self.architecture
                .build(TEMPORAL_CHANNELS, config.hidden_width, config.layer_count)?;
        let sweep = Sweep {
            width: config.width,
            height: config.height,
            frames: config.frame_count,
            radius: config.time_radius,
        };
        let output = assemble(
            &self.evaluator,
            &network,
            &mut self.cache,
            sweep,
            encoder,
            &mut guard.0,
        )?;

        info!("animation finished");
        Ok(Animation { network, output })
    }
}

/// A painter shared between threads which turns away requests while it is busy instead
/// of queueing them.
pub struct SharedPainter<R = SmallRng> {
    inner: Arc<Mutex<Painter<R>>>,
}

impl<R> Clone for SharedPainter<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedPainter<R> {
    pub fn new(painter: Painter<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(painter)),
        }
    }

    fn try_run<T, F>(&self, job: F) -> PainterResult<T>
    where
        F: FnOnce(&mut Painter<R>) -> PainterResult<T>,
    {
        let mut painter = match self.inner.try_lock() {
            Ok(painter) => painter,
            Err(TryLockError::WouldBlock) => return Err(PainterError::Busy),
            // a panic mid generation leaves nothing half written behind
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        job(&mut painter)
    }

    pub fn try_image<O: Observer>(&self, observer: O) -> PainterResult<Painting> {
        self.try_run(|p| p.image(observer))
    }

    pub fn try_animation<E, O>(&self, encoder: E, observer: O) -> PainterResult<Animation<E::Output>>
    where
        E: AnimationEncoder,
        O: Observer,
    {
        self.try_run(|p| p.animation(encoder, observer))
    }
}
