//! Looping animations: one network evaluated over a sweep of time fields.

use crate::{
    error::{EncodeError, PainterError, PainterResult},
    evaluator::Evaluator,
    field::FieldCache,
    network::Network,
    observer::Observer,
    render::{render, PixelBuffer},
};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::io::Write;
use tracing::debug;

/// Consumes rendered frames one at a time and produces the finished animation.
/// [finish](AnimationEncoder::finish) is only called once every frame was accepted.
pub trait AnimationEncoder {
    type Output;

    fn push_frame(&mut self, frame: &PixelBuffer) -> Result<(), EncodeError>;

    fn finish(self) -> Result<Self::Output, EncodeError>;
}

fn check_size(size: &mut Option<(u32, u32)>, frame: &PixelBuffer) -> Result<(), EncodeError> {
    let found = (frame.width(), frame.height());
    match *size {
        Some(expected) if expected != found => Err(EncodeError::FrameSize { expected, found }),
        Some(_) => Ok(()),
        None => {
            *size = Some(found);
            Ok(())
        }
    }
}

/// Endlessly looping GIF written to `W` as frames arrive.
///
/// The GIF trailer is written when the encoder is dropped in
/// [finish](AnimationEncoder::finish), and a failure to write it can't be reported.
/// Encode into memory (a `Vec<u8>`) and write the bytes out afterwards when the
/// destination can fail.
pub struct GifAnimation<W: Write> {
    encoder: GifEncoder<W>,
    delay: Delay,
    size: Option<(u32, u32)>,
}

impl<W: Write> GifAnimation<W> {
    pub const DEFAULT_DELAY_MS: u32 = 100;

    pub fn new(writer: W, delay_ms: u32) -> Result<Self, EncodeError> {
        let mut encoder = GifEncoder::new(writer);
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            encoder,
            delay: Delay::from_numer_denom_ms(delay_ms, 1),
            size: None,
        })
    }
}

impl<W: Write> AnimationEncoder for GifAnimation<W> {
    type Output = ();

    fn push_frame(&mut self, frame: &PixelBuffer) -> Result<(), EncodeError> {
        check_size(&mut self.size, frame)?;
        let frame = Frame::from_parts(frame.to_image(), 0, 0, self.delay);
        self.encoder.encode_frame(frame)?;
        Ok(())
    }

    fn finish(self) -> Result<(), EncodeError> {
        if self.size.is_none() {
            return Err(EncodeError::other("an animation needs at least one frame"));
        }
        drop(self.encoder);
        Ok(())
    }
}

/// Encodes every frame as a standalone PNG and hands back the whole sequence.
#[derive(Debug, Default)]
pub struct PngFrames {
    frames: Vec<Vec<u8>>,
    size: Option<(u32, u32)>,
}

impl PngFrames {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationEncoder for PngFrames {
    type Output = Vec<Vec<u8>>;

    fn push_frame(&mut self, frame: &PixelBuffer) -> Result<(), EncodeError> {
        check_size(&mut self.size, frame)?;
        self.frames.push(frame.to_png()?);
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, EncodeError> {
        Ok(self.frames)
    }
}

/// The time values of an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    pub width: u32,
    pub height: u32,
    pub frames: usize,
    pub radius: f32,
}

impl Sweep {
    /// `frames` evenly spaced points of one period, starting at zero. The last frame
    /// stops one step short of a full turn so the animation loops seamlessly.
    pub fn times(&self) -> impl Iterator<Item = f32> {
        let frames = self.frames;
        (0..frames).map(move |i| i as f32 / frames as f32)
    }
}

/// Evaluate `network` over every frame of `sweep` and feed the rendered frames to `encoder`.
///
/// Progress of the animation as a whole goes to `observer`. If the encoder rejects a frame
/// the sweep stops, progress is resolved to 1.0 and the error is returned without ever
/// finishing the encoder.
#[tracing::instrument(skip(evaluator, network, cache, encoder, observer))]
pub fn assemble<E, O>(
    evaluator: &Evaluator,
    network: &Network,
    cache: &mut FieldCache,
    sweep: Sweep,
    mut encoder: E,
    mut observer: O,
) -> PainterResult<E::Output>
where
    E: AnimationEncoder,
    O: Observer,
{
    let frames = sweep.frames as f32;
    observer.progress(0.);

    for (index, time) in sweep.times().enumerate() {
        let field = cache.temporal(sweep.width, sweep.height, time, sweep.radius);
        let raw = evaluator.evaluate(network, field, |p| {
            observer.progress((index as f32 + p) / frames)
        })?;

        let pixels = render(&raw);
        if let Err(e) = encoder.push_frame(&pixels) {
            observer.progress(1.);
            return Err(PainterError::Encode(e));
        }

        debug!(index, time, "frame rendered");
        observer.frame(index, time);
    }

    let output = encoder.finish();
    observer.progress(1.);
    Ok(output?)
}
