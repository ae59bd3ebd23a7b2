//! Rotation geometry and resampling.

use alloc::vec::Vec;
use core::f32::consts::PI;

use crate::pixel::{CLEAR, ImgRef, ImgRefMut, Rgba};

use super::math;

/// Output extents for rotating a `width × height` image clockwise by
/// `degrees` (taken modulo 360).
///
/// Quarter turns map exactly; other angles get the bounding box of the
/// rotated source rectangle.
pub fn rotated_extents(width: u32, height: u32, degrees: u32) -> (u32, u32) {
    match degrees % 360 {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        deg => {
            let rad = deg as f32 * PI / 180.0;
            let sin = math::fabsf(math::sinf(rad));
            let cos = math::fabsf(math::cosf(rad));
            let w = width as f32;
            let h = height as f32;
            let out_w = math::ceilf(w * cos + h * sin) as u32;
            let out_h = math::ceilf(w * sin + h * cos) as u32;
            (out_w.max(1), out_h.max(1))
        }
    }
}

/// Fill `dst` with `src` rotated clockwise by `degrees` (taken modulo 360).
///
/// `dst` must already be sized per [`rotated_extents`]. Quarter turns are
/// exact pixel permutations; any other angle inverse-maps each destination
/// pixel through the rotation about the image center and bilinearly samples
/// the source, with transparent black outside the source rectangle.
pub fn rotate_into(src: ImgRef<'_, Rgba<u8>>, mut dst: ImgRefMut<'_, Rgba<u8>>, degrees: u32) {
    let (sw, sh) = (src.width(), src.height());
    if sw == 0 || sh == 0 || dst.width() == 0 || dst.height() == 0 {
        return;
    }
    let src_rows: Vec<&[Rgba<u8>]> = src.rows().collect();

    match degrees % 360 {
        0 => {
            for (y, drow) in dst.rows_mut().enumerate() {
                drow.copy_from_slice(src_rows[y]);
            }
        }
        90 => {
            for (dy, drow) in dst.rows_mut().enumerate() {
                for (dx, px) in drow.iter_mut().enumerate() {
                    *px = src_rows[sh - 1 - dx][dy];
                }
            }
        }
        180 => {
            for (dy, drow) in dst.rows_mut().enumerate() {
                for (dx, px) in drow.iter_mut().enumerate() {
                    *px = src_rows[sh - 1 - dy][sw - 1 - dx];
                }
            }
        }
        270 => {
            for (dy, drow) in dst.rows_mut().enumerate() {
                for (dx, px) in drow.iter_mut().enumerate() {
                    *px = src_rows[dx][sw - 1 - dy];
                }
            }
        }
        deg => rotate_arbitrary(&src_rows, sw, sh, &mut dst, deg),
    }
}

fn rotate_arbitrary(
    src_rows: &[&[Rgba<u8>]],
    sw: usize,
    sh: usize,
    dst: &mut ImgRefMut<'_, Rgba<u8>>,
    degrees: u32,
) {
    let rad = degrees as f32 * PI / 180.0;
    let sin = math::sinf(rad);
    let cos = math::cosf(rad);

    let dcx = dst.width() as f32 / 2.0;
    let dcy = dst.height() as f32 / 2.0;
    let scx = sw as f32 / 2.0;
    let scy = sh as f32 / 2.0;

    for (dy, drow) in dst.rows_mut().enumerate() {
        let oy = dy as f32 + 0.5 - dcy;
        for (dx, px) in drow.iter_mut().enumerate() {
            let ox = dx as f32 + 0.5 - dcx;
            // Inverse of a clockwise rotation: rotate the offset back.
            let sx = cos * ox + sin * oy + scx;
            let sy = -sin * ox + cos * oy + scy;
            *px = sample_bilinear(src_rows, sw, sh, sx - 0.5, sy - 0.5);
        }
    }
}

/// Bilinear sample at fractional pixel coordinates; neighbors outside the
/// source contribute transparent black.
fn sample_bilinear(rows: &[&[Rgba<u8>]], sw: usize, sh: usize, x: f32, y: f32) -> Rgba<u8> {
    let xf = math::floorf(x);
    let yf = math::floorf(y);
    let fx = x - xf;
    let fy = y - yf;
    let x0 = xf as i64;
    let y0 = yf as i64;

    let mut acc = [0.0f32; 4];
    for (dy, wy) in [(0i64, 1.0 - fy), (1, fy)] {
        for (dx, wx) in [(0i64, 1.0 - fx), (1, fx)] {
            let weight = wx * wy;
            if weight == 0.0 {
                continue;
            }
            let (xx, yy) = (x0 + dx, y0 + dy);
            if xx < 0 || yy < 0 || xx >= sw as i64 || yy >= sh as i64 {
                continue;
            }
            let p = rows[yy as usize][xx as usize];
            acc[0] += weight * f32::from(p.r);
            acc[1] += weight * f32::from(p.g);
            acc[2] += weight * f32::from(p.b);
            acc[3] += weight * f32::from(p.a);
        }
    }
    if acc[3] == 0.0 {
        return CLEAR;
    }
    Rgba {
        r: (acc[0].clamp(0.0, 255.0) + 0.5) as u8,
        g: (acc[1].clamp(0.0, 255.0) + 0.5) as u8,
        b: (acc[2].clamp(0.0, 255.0) + 0.5) as u8,
        a: (acc[3].clamp(0.0, 255.0) + 0.5) as u8,
    }
}
