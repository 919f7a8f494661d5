use crate::{
    architecture::COLOR_CHANNELS,
    error::EvalError,
    field::Field,
    layers::Layer,
    network::Network,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How much of the field is evaluated between two progress reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chunking {
    /// One canvas row per step.
    #[default]
    Rows,
    /// The whole field per step.
    Field,
}

/// Raw network output, three values per pixel stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutput {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl RawOutput {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * COLOR_CHANNELS,
            "raw output length doesn't match a {}x{} canvas",
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The color channels of a single pixel.
    pub fn get(&self, x: u32, y: u32) -> &[f32] {
        let start = (y as usize * self.width as usize + x as usize) * COLOR_CHANNELS;
        &self.data[start..start + COLOR_CHANNELS]
    }
}

/// Runs a network forward over every pixel of a field.
///
/// Normalization layers need statistics over the whole field, so the field is pushed
/// through the network one layer at a time. With [Chunking::Rows] every layer is
/// evaluated row by row and progress is reported after each row, giving
/// `layers * height` steps in total.
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator {
    chunking: Chunking,
}

impl Evaluator {
    pub fn new(chunking: Chunking) -> Self {
        Self { chunking }
    }

    pub fn chunking(&self) -> Chunking {
        self.chunking
    }

    /// Evaluate `network` at every pixel of `field`.
    ///
    /// `on_progress` receives 0.0 before the first step, the fraction of completed steps
    /// after every step, and the last value it receives is exactly 1.0. A field the network
    /// can't read is rejected before anything is reported.
    #[tracing::instrument(skip_all, fields(width = field.width(), height = field.height(), chunking = ?self.chunking))]
    pub fn evaluate<P>(
        &self,
        network: &Network,
        field: &Field,
        mut on_progress: P,
    ) -> Result<RawOutput, EvalError>
    where
        P: FnMut(f32),
    {
        if network.in_size() != field.channels() {
            return Err(EvalError::ShapeMismatch {
                expected: network.in_size(),
                found: field.channels(),
            });
        }
        if field.pixels() == 0 {
            return Err(EvalError::EmptyField {
                width: field.width(),
                height: field.height(),
            });
        }
        if network.out_size() != COLOR_CHANNELS {
            return Err(EvalError::OutputChannels {
                found: network.out_size(),
            });
        }

        let layers = network.layers();
        let row_pixels = field.width() as usize;
        let steps_per_layer = match self.chunking {
            Chunking::Rows => field.height() as usize,
            Chunking::Field => 1,
        };
        let total = (layers.len() * steps_per_layer) as f32;
        let mut done = 0usize;

        on_progress(0.);

        let mut buffer: Vec<f32> = Vec::new();
        for (i, layer) in layers.iter().enumerate() {
            let input: &[f32] = if i == 0 { field.data() } else { &buffer };
            let stats = layer.observe(input);
            let mut output = vec![0.; field.pixels() * layer.out_size()];

            match self.chunking {
                Chunking::Rows => {
                    for (inp, out) in input
                        .chunks_exact(row_pixels * layer.in_size())
                        .zip(output.chunks_exact_mut(row_pixels * layer.out_size()))
                    {
                        layer.eval(inp, network.weights(), stats.as_ref(), out);
                        done += 1;
                        on_progress(done as f32 / total);
                    }
                }
                Chunking::Field => {
                    layer.eval(input, network.weights(), stats.as_ref(), &mut output);
                    done += 1;
                    on_progress(done as f32 / total);
                }
            }

            buffer = output;
        }

        debug!(steps = done, "evaluation finished");
        Ok(RawOutput::new(field.width(), field.height(), buffer))
    }
}
