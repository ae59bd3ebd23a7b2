//! Stateless geometric transforms: filtered 2-D resize and rotation.
//!
//! Both entry points fill a destination the caller has already sized;
//! neither owns buffer lifetime. [`PixelBuffer`](crate::PixelBuffer)
//! allocates the destination and swaps it in when the transform completes.

mod resize;
mod rotate;

pub use resize::resize_into;
pub use rotate::{rotate_into, rotated_extents};

/// Interpolation filters for [`resize_into`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Filter {
    /// Point sampling — fastest, blocky.
    Nearest,
    /// Linear tent kernel (bilinear).
    Triangle,
    /// Catmull-Rom cubic — the default, commonly called "bicubic".
    #[default]
    CatmullRom,
    /// Mitchell-Netravali cubic (B = C = 1/3).
    Mitchell,
    /// 3-lobe Lanczos windowed sinc.
    Lanczos3,
}

impl Filter {
    /// Parse a filter name (case-insensitive). Returns None if unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "nearest" | "point" => Some(Filter::Nearest),
            "triangle" | "bilinear" | "linear" => Some(Filter::Triangle),
            "catmullrom" | "catmull-rom" | "catrom" | "bicubic" => Some(Filter::CatmullRom),
            "mitchell" => Some(Filter::Mitchell),
            "lanczos" | "lanczos3" => Some(Filter::Lanczos3),
            _ => None,
        }
    }

    /// Parse a filter name, falling back to the default (Catmull-Rom) when
    /// the name is absent or unrecognized.
    pub fn from_name_or_default(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or_default()
    }

    /// Kernel radius in source pixels (before minification scaling).
    pub(crate) fn support(self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Triangle => 1.0,
            Filter::CatmullRom | Filter::Mitchell => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Kernel weight at distance `x` from the sample center.
    pub(crate) fn eval(self, x: f32) -> f32 {
        match self {
            Filter::Nearest => {
                if math::fabsf(x) <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Filter::Triangle => (1.0 - math::fabsf(x)).max(0.0),
            Filter::CatmullRom => bc_cubic(x, 0.0, 0.5),
            Filter::Mitchell => bc_cubic(x, 1.0 / 3.0, 1.0 / 3.0),
            Filter::Lanczos3 => lanczos(x, 3.0),
        }
    }
}

/// Mitchell-Netravali BC family of cubic kernels.
fn bc_cubic(x: f32, b: f32, c: f32) -> f32 {
    let x = math::fabsf(x);
    if x < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * x * x * x
            + (-18.0 + 12.0 * b + 6.0 * c) * x * x
            + (6.0 - 2.0 * b))
            / 6.0
    } else if x < 2.0 {
        ((-b - 6.0 * c) * x * x * x
            + (6.0 * b + 30.0 * c) * x * x
            + (-12.0 * b - 48.0 * c) * x
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        let t = core::f32::consts::PI * x;
        math::sinf(t) / t
    }
}

fn lanczos(x: f32, taps: f32) -> f32 {
    let x = math::fabsf(x);
    if x < taps { sinc(x) * sinc(x / taps) } else { 0.0 }
}

/// Float helpers routed through libm so the kernel math works on `no_std`.
pub(crate) mod math {
    #[inline]
    pub(crate) fn sinf(x: f32) -> f32 {
        libm::sinf(x)
    }

    #[inline]
    pub(crate) fn cosf(x: f32) -> f32 {
        libm::cosf(x)
    }

    #[inline]
    pub(crate) fn floorf(x: f32) -> f32 {
        libm::floorf(x)
    }

    #[inline]
    pub(crate) fn ceilf(x: f32) -> f32 {
        libm::ceilf(x)
    }

    #[inline]
    pub(crate) fn fabsf(x: f32) -> f32 {
        libm::fabsf(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parsing_with_aliases() {
        assert_eq!(Filter::from_name("Bicubic"), Some(Filter::CatmullRom));
        assert_eq!(Filter::from_name("LANCZOS"), Some(Filter::Lanczos3));
        assert_eq!(Filter::from_name("bilinear"), Some(Filter::Triangle));
        assert_eq!(Filter::from_name("gaussian"), None);
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(Filter::from_name_or_default(None), Filter::CatmullRom);
        assert_eq!(Filter::from_name_or_default(Some("no-such")), Filter::CatmullRom);
        assert_eq!(Filter::from_name_or_default(Some("nearest")), Filter::Nearest);
    }

    #[test]
    fn kernels_peak_at_zero() {
        for filter in [Filter::Triangle, Filter::CatmullRom, Filter::Lanczos3] {
            assert!((filter.eval(0.0) - 1.0).abs() < 1e-6);
            assert!(filter.eval(filter.support() + 0.1).abs() < 1e-6);
        }
    }
}
