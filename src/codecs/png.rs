//! PNG codec adapter using the png crate.
//!
//! Note: requires std due to the png crate's use of std::io traits.

extern crate std;

use std::io::Cursor;

use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::error::{BoxError, DecodeFailure};
use crate::format::ImageFormat;
use crate::pixel::{Rgba, Transparency};
use crate::span::{ByteSink, ByteSpan};

/// Decode PNG bytes into the buffer, expanding every color type to RGBA8.
pub(crate) fn decode(
    buffer: &mut PixelBuffer,
    span: &mut ByteSpan<'_>,
) -> Result<(), DecodeFailure> {
    let data = span.remaining();
    if ImageFormat::detect(data) != Some(ImageFormat::Png) {
        return Err(DecodeFailure::Unrecognized);
    }

    let decoder = png::Decoder::new(Cursor::new(data));
    let mut reader = decoder.read_info().map_err(DecodeFailure::malformed)?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    buffer
        .alloc(width, height)
        .map_err(DecodeFailure::malformed)?;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| DecodeFailure::malformed("cannot determine PNG output buffer size"))?;
    let mut raw = vec![0u8; buffer_size];
    let output_info = reader
        .next_frame(&mut raw)
        .map_err(DecodeFailure::malformed)?;
    raw.truncate(output_info.buffer_size());

    let (color_type, _bit_depth) = reader.output_color_type();
    let pixels = buffer.pixels_mut();
    match color_type {
        png::ColorType::Rgba => {
            pixels.copy_from_slice(bytemuck::cast_slice(&raw));
        }
        png::ColorType::Rgb => {
            for (px, rgb) in pixels.iter_mut().zip(raw.chunks_exact(3)) {
                *px = Rgba::new(rgb[0], rgb[1], rgb[2], 0xFF);
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for (px, ga) in pixels.iter_mut().zip(raw.chunks_exact(2)) {
                *px = Rgba::new(ga[0], ga[0], ga[0], ga[1]);
            }
        }
        png::ColorType::Grayscale => {
            for (px, &gray) in pixels.iter_mut().zip(raw.iter()) {
                *px = Rgba::new(gray, gray, gray, 0xFF);
            }
        }
        png::ColorType::Indexed => {
            // The default decoder transformations expand indexed output.
            return Err(DecodeFailure::malformed("indexed PNG was not expanded"));
        }
    }
    Ok(())
}

/// Encode the buffer as PNG: RGB8 when Solid (no alpha to preserve), RGBA8
/// otherwise.
pub(crate) fn encode(buffer: &PixelBuffer, sink: &mut ByteSink) -> Result<(), BoxError> {
    let width = buffer.width();
    let height = buffer.height();
    if width == 0 || height == 0 {
        return Err("cannot encode an empty buffer".into());
    }

    let mut encoder = png::Encoder::new(sink.as_mut_vec(), width, height);
    encoder.set_depth(png::BitDepth::Eight);

    if buffer.transparency() == Transparency::Solid {
        encoder.set_color(png::ColorType::Rgb);
        let mut writer = encoder.write_header()?;
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for px in buffer.pixels() {
            rgb.extend_from_slice(&[px.r, px.g, px.b]);
        }
        writer.write_image_data(&rgb)?;
    } else {
        encoder.set_color(png::ColorType::Rgba);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(bytemuck::cast_slice(buffer.pixels()))?;
    }
    Ok(())
}
