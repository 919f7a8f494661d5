use crate::{architecture::COLOR_CHANNELS, error::EncodeError, evaluator::RawOutput};

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Bytes per pixel of a [PixelBuffer].
pub const RGBA: usize = 4;

/// An 8 bit RGBA image stored row by row, alpha is always opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The RGBA bytes of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (x as usize + y as usize * self.width as usize) * RGBA;
        &self.data[start..start + RGBA]
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .expect("pixel buffer length always matches its dimensions")
    }

    /// Encode as a standalone PNG file.
    pub fn to_png(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Cursor::new(Vec::new());
        self.to_image().write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}

/// Scale a raw channel value to a byte. Values are clamped to [0, 1] first so unbounded
/// activations saturate instead of wrapping around, NaN ends up black.
pub fn quantize(value: f32) -> u8 {
    (value.max(0.).min(1.) * 255.).floor() as u8
}

/// Turn raw network output into pixels.
pub fn render(raw: &RawOutput) -> PixelBuffer {
    let mut data = Vec::with_capacity(raw.data().len() / COLOR_CHANNELS * RGBA);
    for color in raw.data().chunks_exact(COLOR_CHANNELS) {
        data.extend(color.iter().map(|c| quantize(*c)));
        data.push(u8::MAX);
    }

    PixelBuffer {
        width: raw.width(),
        height: raw.height(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_scales_and_floors() {
        assert_eq!(quantize(0.), 0);
        assert_eq!(quantize(1.), 255);
        assert_eq!(quantize(0.5), 127);
        assert_eq!(quantize(0.999), 254);
    }

    #[test]
    fn quantize_clamps_out_of_range() {
        assert_eq!(quantize(-3.), 0);
        assert_eq!(quantize(6.), 255);
        assert_eq!(quantize(f32::INFINITY), 255);
        assert_eq!(quantize(f32::NEG_INFINITY), 0);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn pixels_are_row_major_and_opaque() {
        // 2x2 canvas, red grows with x, green with y
        let raw = RawOutput::new(
            2,
            2,
            vec![
                0., 0., 1., //
                1., 0., 1., //
                0., 1., 1., //
                1., 1., 1.,
            ],
        );
        let buffer = render(&raw);

        assert_eq!(buffer.as_bytes().len(), 2 * 2 * 4);
        assert_eq!(buffer.pixel(1, 0), &[255, 0, 255, 255]);
        assert_eq!(buffer.pixel(0, 1), &[0, 255, 255, 255]);
        assert_eq!(&buffer.as_bytes()[(1 + 1 * 2) * 4..], &[255, 255, 255, 255]);
        assert!(buffer.as_bytes().chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn png_round_trips_through_image() {
        let raw = RawOutput::new(3, 1, vec![0.2, 0.4, 0.6, 1., 0., 0., 0., 0., 0.]);
        let buffer = render(&raw);

        let png = buffer.to_png().unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.as_raw(), buffer.as_bytes());
    }
}
