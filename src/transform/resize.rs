//! Separable two-pass resampling.

use alloc::vec;
use alloc::vec::Vec;

use crate::pixel::{ImgRef, ImgRefMut, Rgba};

use super::{Filter, math};

/// Per-destination-index contribution window into the source axis.
struct Contrib {
    start: usize,
    weights: Vec<f32>,
}

/// Build the contribution table for one axis.
///
/// When minifying, the kernel window widens by the scale factor so every
/// source pixel contributes to some destination pixel.
fn contributions(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Contrib> {
    let scale = src_len as f32 / dst_len as f32;
    let filter_scale = scale.max(1.0);
    let support = filter.support() * filter_scale;

    let mut table = Vec::with_capacity(dst_len);
    for i in 0..dst_len {
        let center = (i as f32 + 0.5) * scale - 0.5;
        let start = math::ceilf(center - support).max(0.0) as usize;
        let end = (math::floorf(center + support).max(0.0) as usize).min(src_len - 1);
        let start = start.min(end);

        let mut weights = Vec::with_capacity(end - start + 1);
        let mut sum = 0.0f32;
        for j in start..=end {
            let w = filter.eval((j as f32 - center) / filter_scale);
            sum += w;
            weights.push(w);
        }
        if sum != 0.0 {
            for w in &mut weights {
                *w /= sum;
            }
        }
        table.push(Contrib { start, weights });
    }
    table
}

fn clamp_u8(v: f32) -> u8 {
    (v.clamp(0.0, 255.0) + 0.5) as u8
}

/// Fill a pre-sized destination by resampling `src` under `filter`.
///
/// Horizontal pass first (into an f32 intermediate), then vertical. Nearest
/// skips the kernel machinery and uses the same floor-index mapping as the
/// single-axis setters.
pub fn resize_into(src: ImgRef<'_, Rgba<u8>>, mut dst: ImgRefMut<'_, Rgba<u8>>, filter: Filter) {
    let (sw, sh) = (src.width(), src.height());
    let (dw, dh) = (dst.width(), dst.height());
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
        return;
    }

    if filter == Filter::Nearest {
        resize_nearest(src, &mut dst);
        return;
    }

    let src_rows: Vec<&[Rgba<u8>]> = src.rows().collect();

    // Horizontal: src (sw × sh) -> mid (dw × sh), f32 accumulators.
    let x_contribs = contributions(sw, dw, filter);
    let mut mid = vec![[0.0f32; 4]; dw * sh];
    for (y, row) in src_rows.iter().enumerate() {
        let out = &mut mid[y * dw..][..dw];
        for (x, contrib) in x_contribs.iter().enumerate() {
            let mut acc = [0.0f32; 4];
            for (k, &w) in contrib.weights.iter().enumerate() {
                let p = row[contrib.start + k];
                acc[0] += w * f32::from(p.r);
                acc[1] += w * f32::from(p.g);
                acc[2] += w * f32::from(p.b);
                acc[3] += w * f32::from(p.a);
            }
            out[x] = acc;
        }
    }

    // Vertical: mid (dw × sh) -> dst (dw × dh).
    let y_contribs = contributions(sh, dh, filter);
    for (y, drow) in dst.rows_mut().enumerate() {
        let contrib = &y_contribs[y];
        for (x, px) in drow.iter_mut().enumerate() {
            let mut acc = [0.0f32; 4];
            for (k, &w) in contrib.weights.iter().enumerate() {
                let m = &mid[(contrib.start + k) * dw + x];
                acc[0] += w * m[0];
                acc[1] += w * m[1];
                acc[2] += w * m[2];
                acc[3] += w * m[3];
            }
            *px = Rgba {
                r: clamp_u8(acc[0]),
                g: clamp_u8(acc[1]),
                b: clamp_u8(acc[2]),
                a: clamp_u8(acc[3]),
            };
        }
    }
}

fn resize_nearest(src: ImgRef<'_, Rgba<u8>>, dst: &mut ImgRefMut<'_, Rgba<u8>>) {
    let (sw, sh) = (src.width(), src.height());
    let (dw, dh) = (dst.width(), dst.height());
    let x_index: Vec<usize> = (0..dw).map(|x| x * sw / dw).collect();
    let src_rows: Vec<&[Rgba<u8>]> = src.rows().collect();

    for (dy, drow) in dst.rows_mut().enumerate() {
        let srow = src_rows[dy * sh / dh];
        for (dx, px) in drow.iter_mut().enumerate() {
            *px = srow[x_index[dx]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Img;

    fn uniform(w: usize, h: usize, px: Rgba<u8>) -> Vec<Rgba<u8>> {
        vec![px; w * h]
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let red = Rgba::new(255, 0, 0, 255);
        let src_buf = uniform(4, 4, red);
        let src = Img::new(&src_buf[..], 4, 4);

        for filter in [
            Filter::Nearest,
            Filter::Triangle,
            Filter::CatmullRom,
            Filter::Lanczos3,
        ] {
            let mut dst_buf = uniform(2, 2, Rgba::new(0, 0, 0, 0));
            resize_into(src, Img::new(&mut dst_buf[..], 2, 2), filter);
            assert!(dst_buf.iter().all(|&p| p == red), "{filter:?}");
        }
    }

    #[test]
    fn nearest_uses_floor_index_mapping() {
        // 4 -> 2 columns: destination x takes source column x * 4 / 2.
        let row = [
            Rgba::new(10, 0, 0, 255),
            Rgba::new(20, 0, 0, 255),
            Rgba::new(30, 0, 0, 255),
            Rgba::new(40, 0, 0, 255),
        ];
        let src = Img::new(&row[..], 4, 1);
        let mut dst_buf = uniform(2, 1, Rgba::new(0, 0, 0, 0));
        resize_into(src, Img::new(&mut dst_buf[..], 2, 1), Filter::Nearest);
        assert_eq!(dst_buf[0].r, 10);
        assert_eq!(dst_buf[1].r, 30);
    }

    #[test]
    fn upscale_interpolates_between_neighbors() {
        let row = [Rgba::new(0, 0, 0, 255), Rgba::new(100, 0, 0, 255)];
        let src = Img::new(&row[..], 2, 1);
        let mut dst_buf = uniform(4, 1, Rgba::new(0, 0, 0, 0));
        resize_into(src, Img::new(&mut dst_buf[..], 4, 1), Filter::Triangle);
        // Monotone ramp, endpoints anchored at the source values.
        assert_eq!(dst_buf[0].r, 0);
        assert_eq!(dst_buf[3].r, 100);
        assert!(dst_buf[1].r <= dst_buf[2].r);
    }
}
