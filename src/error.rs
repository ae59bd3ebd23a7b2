//! Unified error types for buffer and codec operations.

use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

use crate::format::ImageFormat;

/// Boxed error type used to carry codec-specific failure details.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Unified error type for all fallible operations.
///
/// Every failure is returned as an explicit value from the call that caused
/// it; there is no shared error slot and no logging in the core.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RasterError {
    /// Pixel storage could not be allocated.
    #[error("allocation failed: {0}")]
    AllocationFailed(String),
    /// Requested dimensions exceed the budget's limits.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// Input validation failed (e.g. malformed byte-range bounds).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No registered decoder recognized the input.
    #[error("no codec recognized the input")]
    UnrecognizedFormat,
    /// A decoder recognized the input but rejected its content.
    #[error("decode error ({format:?}): {source}")]
    Decode {
        format: ImageFormat,
        source: BoxError,
    },
    /// No registered entry can encode the requested format.
    #[error("format {0:?} has no registered encoder")]
    UnsupportedFormat(ImageFormat),
    /// The encoder failed to produce output.
    #[error("encode error ({format:?}): {source}")]
    Encode {
        format: ImageFormat,
        source: BoxError,
    },
    /// The buffer has no pixel storage to encode.
    #[error("buffer is uninitialized")]
    Uninitialized,
}

/// Failure reported by a decoder to the registry.
///
/// `Unrecognized` means "not my format" and lets the registry move on to the
/// next entry; `Malformed` means the decoder claimed the format but the
/// content is broken. If no decoder succeeds, the registry surfaces the most
/// recent `Malformed` detail, falling back to
/// [`RasterError::UnrecognizedFormat`] when every decoder passed.
#[derive(Debug)]
pub enum DecodeFailure {
    /// Input does not look like this codec's format.
    Unrecognized,
    /// Input was recognized but its content is malformed.
    Malformed(BoxError),
}

impl DecodeFailure {
    /// Wrap a codec-specific error or message as a `Malformed` failure.
    pub fn malformed(detail: impl Into<BoxError>) -> Self {
        DecodeFailure::Malformed(detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_carries_detail() {
        let err = RasterError::LimitExceeded("width 20000 exceeds 10240".into());
        assert_eq!(err.to_string(), "limit exceeded: width 20000 exceeds 10240");
    }

    #[test]
    fn decode_wraps_source() {
        let err = RasterError::Decode {
            format: ImageFormat::Png,
            source: "bad chunk".into(),
        };
        assert!(err.to_string().contains("bad chunk"));
    }

    #[test]
    fn malformed_from_message() {
        let failure = DecodeFailure::malformed("truncated header");
        assert!(matches!(failure, DecodeFailure::Malformed(_)));
    }
}
