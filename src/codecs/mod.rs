//! Codec adapters for format-specific implementations.
//!
//! Each module provides a thin adapter between the registry's codec contract
//! and a format-specific implementation. [`CodecRegistry::builtin`]
//! (crate::CodecRegistry::builtin) registers them in a fixed order.

#[cfg(feature = "png")]
pub(crate) mod png;

#[cfg(feature = "bmp")]
pub(crate) mod bmp;
