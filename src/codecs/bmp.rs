//! BMP codec: uncompressed BI_RGB, 24- and 32-bit.
//!
//! A BITMAPFILEHEADER ("BM", file size, pixel data offset) followed by a
//! BITMAPINFOHEADER of at least 40 bytes. Rows are stored bottom-up unless
//! the height is negative, padded to 4-byte boundaries, channels in BGR(A)
//! order. Encode writes 24-bit for Solid buffers and 32-bit otherwise.

use crate::buffer::PixelBuffer;
use crate::error::{BoxError, DecodeFailure};
use crate::pixel::{Rgba, Transparency};
use crate::span::{ByteSink, ByteSpan};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;

fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn le_i32(data: &[u8], offset: usize) -> i32 {
    le_u32(data, offset) as i32
}

/// Row byte length padded to a 4-byte boundary.
fn row_stride(width: usize, bytes_per_px: usize) -> usize {
    (width * bytes_per_px + 3) & !3
}

/// Decode uncompressed 24/32-bit BMP bytes into the buffer.
pub(crate) fn decode(
    buffer: &mut PixelBuffer,
    span: &mut ByteSpan<'_>,
) -> Result<(), DecodeFailure> {
    let data = span.remaining();
    if data.len() < 2 || &data[..2] != b"BM" {
        return Err(DecodeFailure::Unrecognized);
    }
    if data.len() < FILE_HEADER_LEN + INFO_HEADER_LEN {
        return Err(DecodeFailure::malformed("truncated BMP header"));
    }

    let pixel_offset = le_u32(data, 10) as usize;
    let header_len = le_u32(data, 14) as usize;
    if header_len < INFO_HEADER_LEN {
        return Err(DecodeFailure::malformed("unsupported BMP core header"));
    }
    let width = le_i32(data, 18);
    let height = le_i32(data, 22);
    let bits = le_u16(data, 28);
    let compression = le_u32(data, 30);
    if compression != 0 {
        return Err(DecodeFailure::malformed("compressed BMP is not supported"));
    }
    if bits != 24 && bits != 32 {
        return Err(DecodeFailure::malformed(
            "only 24- and 32-bit BMPs are supported",
        ));
    }
    if width <= 0 || height == 0 {
        return Err(DecodeFailure::malformed("degenerate BMP dimensions"));
    }

    let w = width as u32;
    let top_down = height < 0;
    let h = height.unsigned_abs();
    let bytes_per_px = bits as usize / 8;
    let stride = row_stride(w as usize, bytes_per_px);
    let needed = pixel_offset as u64 + stride as u64 * u64::from(h);
    if (data.len() as u64) < needed {
        return Err(DecodeFailure::malformed("truncated BMP pixel data"));
    }

    buffer.alloc(w, h).map_err(DecodeFailure::malformed)?;
    let w = w as usize;
    let pixels = buffer.pixels_mut();
    for y in 0..h as usize {
        let src_y = if top_down { y } else { h as usize - 1 - y };
        let src_row = &data[pixel_offset + src_y * stride..];
        let dst_row = &mut pixels[y * w..][..w];
        for (x, px) in dst_row.iter_mut().enumerate() {
            let p = &src_row[x * bytes_per_px..];
            *px = if bytes_per_px == 4 {
                Rgba::new(p[2], p[1], p[0], p[3])
            } else {
                Rgba::new(p[2], p[1], p[0], 0xFF)
            };
        }
    }
    Ok(())
}

/// Encode the buffer as uncompressed BMP, bottom-up rows.
pub(crate) fn encode(buffer: &PixelBuffer, sink: &mut ByteSink) -> Result<(), BoxError> {
    let width = buffer.width();
    let height = buffer.height();
    if width == 0 || height == 0 {
        return Err("cannot encode an empty buffer".into());
    }

    let solid = buffer.transparency() == Transparency::Solid;
    let bytes_per_px: usize = if solid { 3 } else { 4 };
    let stride = row_stride(width as usize, bytes_per_px);
    let image_size = stride * height as usize;
    let file_size = FILE_HEADER_LEN + INFO_HEADER_LEN + image_size;

    // BITMAPFILEHEADER
    sink.write(b"BM");
    sink.write(&(file_size as u32).to_le_bytes());
    sink.write(&[0u8; 4]); // reserved
    sink.write(&((FILE_HEADER_LEN + INFO_HEADER_LEN) as u32).to_le_bytes());

    // BITMAPINFOHEADER
    sink.write(&(INFO_HEADER_LEN as u32).to_le_bytes());
    sink.write(&(width as i32).to_le_bytes());
    sink.write(&(height as i32).to_le_bytes()); // positive: bottom-up
    sink.write(&1u16.to_le_bytes()); // planes
    sink.write(&(bytes_per_px as u16 * 8).to_le_bytes());
    sink.write(&0u32.to_le_bytes()); // BI_RGB
    sink.write(&(image_size as u32).to_le_bytes());
    sink.write(&2835i32.to_le_bytes()); // 72 dpi
    sink.write(&2835i32.to_le_bytes());
    sink.write(&0u32.to_le_bytes()); // palette size
    sink.write(&0u32.to_le_bytes()); // important colors

    let padding = [0u8; 3];
    let pad_len = stride - width as usize * bytes_per_px;
    for row in buffer.pixels().chunks_exact(width as usize).rev() {
        for px in row {
            if solid {
                sink.write(&[px.b, px.g, px.r]);
            } else {
                sink.write(&[px.b, px.g, px.r, px.a]);
            }
        }
        sink.write(&padding[..pad_len]);
    }
    Ok(())
}
