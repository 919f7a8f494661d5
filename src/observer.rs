use std::fmt::Debug;

use tracing::{debug, info};

/// Receives updates while a generation runs. Every method is called from the thread
/// doing the work, between two chunks of it.
pub trait Observer: Debug {
    /// Fraction of the generation completed so far, never decreasing within one generation.
    fn progress(&mut self, fraction: f32);

    /// Called with true when a generation starts and with false once it ended, whether it
    /// succeeded or not.
    fn generating(&mut self, _active: bool) {}

    /// Called after frame `index` of an animation has been handed to the encoder.
    fn frame(&mut self, _index: usize, _time: f32) {}
}

impl<T: Observer + ?Sized> Observer for &mut T {
    fn progress(&mut self, fraction: f32) {
        (**self).progress(fraction)
    }

    fn generating(&mut self, active: bool) {
        (**self).generating(active)
    }

    fn frame(&mut self, index: usize, time: f32) {
        (**self).frame(index, time)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockObserver;

impl Observer for MockObserver {
    fn progress(&mut self, _fraction: f32) {}
}

/// Reports progress through `tracing` whenever another `step` of the work is done.
#[derive(Debug, Clone)]
pub struct LogObserver {
    step: f32,
    next: f32,
}

impl LogObserver {
    /// Smallest accepted step, anything below (or NaN) is raised to it.
    pub const MIN_STEP: f32 = 0.01;

    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(Self::MIN_STEP),
            next: 0.,
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Observer for LogObserver {
    fn progress(&mut self, fraction: f32) {
        if fraction >= self.next {
            info!("{:>3}%", (fraction * 100.).round());
            self.next = ((fraction / self.step).floor() + 1.) * self.step;
        }
    }

    fn generating(&mut self, active: bool) {
        if active {
            self.next = 0.;
        }
        debug!(active, "generating");
    }

    fn frame(&mut self, index: usize, time: f32) {
        debug!(index, time, "frame encoded");
    }
}

/// Keeps every update, handy when checking what a generation reported.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recorder {
    pub progress: Vec<f32>,
    pub generating: Vec<bool>,
    pub frames: Vec<(usize, f32)>,
}

impl Observer for Recorder {
    fn progress(&mut self, fraction: f32) {
        self.progress.push(fraction);
    }

    fn generating(&mut self, active: bool) {
        self.generating.push(active);
    }

    fn frame(&mut self, index: usize, time: f32) {
        self.frames.push((index, time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_observer_steps_forward() {
        let mut observer = LogObserver::new(0.25);
        observer.progress(0.);
        assert_eq!(observer.next, 0.25);
        observer.progress(0.1);
        assert_eq!(observer.next, 0.25);
        observer.progress(0.6);
        assert_eq!(observer.next, 0.75);
        observer.generating(true);
        assert_eq!(observer.next, 0.);
    }

    #[test]
    fn degenerate_steps_are_raised() {
        for &step in &[0., -1., f32::NAN] {
            let mut observer = LogObserver::new(step);
            assert_eq!(observer.step, LogObserver::MIN_STEP);
            observer.progress(0.);
            observer.progress(1.);
            assert!(observer.next > 1.);
        }
    }

    #[test]
    fn borrowed_observer_forwards() {
        fn drive<O: Observer>(mut observer: O) {
            observer.generating(true);
            observer.progress(0.5);
            observer.frame(2, 0.4);
            observer.generating(false);
        }

        let mut recorder = Recorder::default();
        drive(&mut recorder);
        assert_eq!(recorder.progress, vec![0.5]);
        assert_eq!(recorder.generating, vec![true, false]);
        assert_eq!(recorder.frames, vec![(2, 0.4)]);
    }
}
