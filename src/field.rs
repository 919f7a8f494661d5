//! Coordinate fields: the per pixel inputs fed to a network.

use std::f32::consts::PI;

use tracing::{debug, trace};

/// Channels of a field without a time signal: the centered x and y coordinates.
pub const SPATIAL_CHANNELS: usize = 2;
/// Channels of a time varying field: centered x and y plus the cosine/sine pair.
pub const TEMPORAL_CHANNELS: usize = 4;

/// Input values for every pixel of a canvas, stored row by row with `channels`
/// values per pixel. Rows are indexed by y, so a row holds `width` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<f32>,
}

impl Field {
    /// Centered x and y coordinates, the origin sits in the middle of the canvas.
    pub fn spatial(width: u32, height: u32) -> Self {
        Self::build(width, height, &[])
    }

    /// The spatial channels plus `(radius * cos(2πt), radius * sin(2πt))`, identical for
    /// every pixel of the frame.
    pub fn temporal(width: u32, height: u32, t: f32, radius: f32) -> Self {
        let angle = 2. * PI * t;
        Self::build(width, height, &[radius * angle.cos(), radius * angle.sin()])
    }

    fn build(width: u32, height: u32, extra: &[f32]) -> Self {
        let channels = SPATIAL_CHANNELS + extra.len();
        let half_width = width as f32 / 2.;
        let half_height = height as f32 / 2.;

        let mut data = Vec::with_capacity(width as usize * height as usize * channels);
        for y in 0..height {
            for x in 0..width {
                data.push(x as f32 - half_width);
                data.push(y as f32 - half_height);
                data.extend_from_slice(extra);
            }
        }

        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// All values of row `y`.
    pub fn row(&self, y: u32) -> &[f32] {
        let len = self.width as usize * self.channels;
        let start = y as usize * len;
        &self.data[start..start + len]
    }

    /// The channels of a single pixel.
    pub fn get(&self, x: u32, y: u32) -> &[f32] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[start..start + self.channels]
    }
}

/// Everything a field depends on. Two fields with equal keys are identical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKey {
    Spatial { width: u32, height: u32 },
    Temporal {
        width: u32,
        height: u32,
        t: f32,
        radius: f32,
    },
}

impl FieldKey {
    pub fn channels(&self) -> usize {
        match self {
            FieldKey::Spatial { .. } => SPATIAL_CHANNELS,
            FieldKey::Temporal { .. } => TEMPORAL_CHANNELS,
        }
    }

    pub fn build(&self) -> Field {
        match *self {
            FieldKey::Spatial { width, height } => Field::spatial(width, height),
            FieldKey::Temporal {
                width,
                height,
                t,
                radius,
            } => Field::temporal(width, height, t, radius),
        }
    }
}

/// Remembers the most recently built field so consecutive requests with the same
/// key don't rebuild it. Holds a single field, any other key replaces it.
#[derive(Debug, Default)]
pub struct FieldCache {
    last: Option<(FieldKey, Field)>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn get(&mut self, key: FieldKey) -> &Field {
        let hit = matches!(&self.last, Some((cached, _)) if *cached == key);
        if hit {
            trace!(?key, "field cache hit");
        } else {
            debug!(?key, "building coordinate field");
            self.last = None;
        }
        &self.last.get_or_insert_with(|| (key, key.build())).1
    }

    pub fn spatial(&mut self, width: u32, height: u32) -> &Field {
        self.get(FieldKey::Spatial { width, height })
    }

    pub fn temporal(&mut self, width: u32, height: u32, t: f32, radius: f32) -> &Field {
        self.get(FieldKey::Temporal {
            width,
            height,
            t,
            radius,
        })
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        matches!(&self.last, Some((cached, _)) if cached == key)
    }

    /// Drop the cached field.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn spatial_is_centered() {
        let field = Field::spatial(8, 6);
        assert_eq!(field.channels(), 2);
        assert_eq!(field.data().len(), 8 * 6 * 2);

        assert_eq!(field.get(0, 0), &[-4., -3.]);
        assert_eq!(field.get(7, 0)[0], 7. - 4.);
        assert_eq!(field.get(0, 5)[1], 5. - 3.);
        assert_eq!(field.get(4, 3), &[0., 0.]);
    }

    #[test]
    fn odd_sizes_center_on_half_pixels() {
        let field = Field::spatial(5, 3);
        assert_eq!(field.get(0, 0), &[-2.5, -1.5]);
        assert_eq!(field.get(4, 2), &[1.5, 0.5]);
    }

    #[test]
    fn temporal_adds_global_signal() {
        let (t, radius) = (0.125, 10.);
        let field = Field::temporal(4, 3, t, radius);
        let spatial = Field::spatial(4, 3);
        let angle = 2. * PI * t;

        assert_eq!(field.channels(), 4);
        for y in 0..3 {
            for x in 0..4 {
                let pixel = field.get(x, y);
                assert_eq!(&pixel[..2], spatial.get(x, y));
                assert!((pixel[2] - radius * angle.cos()).abs() < TOLERANCE);
                assert!((pixel[3] - radius * angle.sin()).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn temporal_is_periodic() {
        let a = Field::temporal(2, 2, 0.25, 3.);
        let b = Field::temporal(2, 2, 1.25, 3.);
        for (x, y) in a.data().iter().zip(b.data()) {
            assert!((x - y).abs() < TOLERANCE);
        }
    }

    #[test]
    fn rows_are_contiguous() {
        let field = Field::spatial(3, 2);
        assert_eq!(field.row(1), &[-1.5, 0., -0.5, 0., 0.5, 0.]);
    }

    #[test]
    fn cache_reuses_matching_key() {
        let mut cache = FieldCache::new();
        let key = FieldKey::Temporal {
            width: 4,
            height: 4,
            t: 0.2,
            radius: 10.,
        };
        assert!(!cache.contains(&key));

        let first = cache.get(key).data().as_ptr();
        assert!(cache.contains(&key));
        let second = cache.get(key).data().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn cache_holds_a_single_field() {
        let mut cache = FieldCache::new();
        cache.spatial(4, 4);
        let field = cache.temporal(4, 4, 0., 1.);
        assert_eq!(field.channels(), 4);
        assert!(!cache.contains(&FieldKey::Spatial { width: 4, height: 4 }));

        let field = cache.spatial(4, 4);
        assert_eq!(field, &Field::spatial(4, 4));

        cache.clear();
        assert!(!cache.contains(&FieldKey::Spatial { width: 4, height: 4 }));
    }
}
