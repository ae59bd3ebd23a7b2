//! # rasterbuf
//!
//! Embeddable RGBA raster buffer with geometric transforms, alpha
//! compositing, and a pluggable codec registry.
//!
//! The crate has two halves: [`PixelBuffer`] owns a flat grid of RGBA pixels
//! and performs the geometry (resize, rotate, crop-copy, composited draw,
//! fill, transparency classification); [`CodecRegistry`] converts between
//! that in-memory form and compressed byte streams through an ordered list
//! of pluggable codecs. Built-in codec adapters are feature-gated:
//!
//! ```toml
//! [dependencies]
//! rasterbuf = { version = "0.1", features = ["png", "bmp"] }
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use rasterbuf::{Budget, ByteSpan, CodecRegistry, ImageFormat, PixelBuffer};
//!
//! let budget = Arc::new(Budget::default());
//! let registry = CodecRegistry::builtin();
//!
//! let data: &[u8] = &[]; // your image bytes
//! let mut image = PixelBuffer::new(budget);
//! let mut span = ByteSpan::new(data);
//! registry.decode(&mut image, &mut span)?;
//!
//! image.resize(800, 0, Some("lanczos"))?; // height follows the aspect ratio
//! image.rotate(90)?;
//!
//! let png = registry.encode(&image, ImageFormat::Png, None)?;
//! # let _ = png;
//! # Ok::<(), rasterbuf::RasterError>(())
//! ```
//!
//! Every operation is synchronous and runs on the calling thread. The one
//! piece of cross-buffer state is the [`Budget`], which carries the
//! dimension limits and the byte-usage counter; the host constructs it and
//! injects it into each buffer. A populated registry is read-only and can be
//! shared across threads.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod error;
mod format;
mod limits;
mod registry;
mod span;

pub mod pixel;
pub mod transform;

#[cfg(any(feature = "png", feature = "bmp"))]
pub(crate) mod codecs;

pub use buffer::PixelBuffer;
pub use error::{BoxError, DecodeFailure, RasterError};
pub use format::ImageFormat;
pub use limits::{Budget, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
pub use pixel::{Rgba, Transparency};
pub use registry::{CodecRegistry, DecodeFn, EncodeFn};
pub use span::{ByteSink, ByteSpan};
pub use transform::Filter;
