//! Ordered codec registry: decode and encode dispatch.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::error::{BoxError, DecodeFailure, RasterError};
use crate::format::ImageFormat;
use crate::span::{ByteSink, ByteSpan};

/// Decoder half of a codec: populate the buffer from the span.
///
/// Return [`DecodeFailure::Unrecognized`] when the bytes are not this
/// codec's format; [`DecodeFailure::Malformed`] when they are but the
/// content is broken. A failing decoder may leave the cursor anywhere — the
/// registry rewinds it before every attempt.
pub type DecodeFn =
    Box<dyn Fn(&mut PixelBuffer, &mut ByteSpan<'_>) -> Result<(), DecodeFailure> + Send + Sync>;

/// Encoder half of a codec: write the buffer's encoded form into the sink.
pub type EncodeFn = Box<dyn Fn(&PixelBuffer, &mut ByteSink) -> Result<(), BoxError> + Send + Sync>;

struct CodecEntry {
    format: ImageFormat,
    decode: Option<DecodeFn>,
    encode: Option<EncodeFn>,
}

/// Append-ordered collection of codecs.
///
/// Populated once at startup and read-only afterward; decode attempts run in
/// registration order (first registered, first tried). All dispatch methods
/// take `&self`, so a populated registry can be shared freely across
/// concurrent decode/encode calls.
pub struct CodecRegistry {
    entries: Vec<CodecEntry>,
}

impl CodecRegistry {
    /// An empty registry — caller registers every codec.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry with the compiled-in codec adapters registered, PNG first,
    /// then BMP.
    pub fn builtin() -> Self {
        #[cfg_attr(not(any(feature = "png", feature = "bmp")), allow(unused_mut))]
        let mut registry = Self::new();
        #[cfg(feature = "png")]
        registry.register(
            ImageFormat::Png,
            Some(Box::new(crate::codecs::png::decode)),
            Some(Box::new(crate::codecs::png::encode)),
        );
        #[cfg(feature = "bmp")]
        registry.register(
            ImageFormat::Bmp,
            Some(Box::new(crate::codecs::bmp::decode)),
            Some(Box::new(crate::codecs::bmp::encode)),
        );
        registry
    }

    /// Append a codec entry. Decode-only and encode-only entries are valid.
    pub fn register(
        &mut self,
        format: ImageFormat,
        decode: Option<DecodeFn>,
        encode: Option<EncodeFn>,
    ) {
        self.entries.push(CodecEntry {
            format,
            decode,
            encode,
        });
    }

    /// Whether an entry with this tag has a decoder. Decoding itself probes
    /// every decoder in order, regardless of tag.
    pub fn can_decode(&self, format: ImageFormat) -> bool {
        self.entries
            .iter()
            .any(|e| e.format == format && e.decode.is_some())
    }

    /// Whether a registered entry can encode this format.
    pub fn can_encode(&self, format: ImageFormat) -> bool {
        self.entries
            .iter()
            .any(|e| e.format == format && e.encode.is_some())
    }

    /// Format tags in registration order.
    pub fn formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        self.entries.iter().map(|e| e.format)
    }

    /// Decode `span` into `buffer`, trying decoders in registration order.
    ///
    /// Existing buffer content is discarded up front, and the buffer is
    /// freed and the cursor rewound before each attempt, so a failing
    /// decoder leaves nothing behind. The first success wins and the
    /// buffer's transparency classification is recomputed. If every decoder
    /// fails, the most recent `Malformed` detail is surfaced; with none,
    /// the input is simply [`RasterError::UnrecognizedFormat`].
    pub fn decode(
        &self,
        buffer: &mut PixelBuffer,
        span: &mut ByteSpan<'_>,
    ) -> Result<(), RasterError> {
        buffer.free();
        let mut detail: Option<(ImageFormat, BoxError)> = None;

        for entry in &self.entries {
            let Some(decode) = &entry.decode else {
                continue;
            };
            buffer.free();
            span.reset();
            match decode(buffer, span) {
                Ok(()) => {
                    buffer.detect_transparency();
                    return Ok(());
                }
                Err(DecodeFailure::Unrecognized) => {}
                Err(DecodeFailure::Malformed(source)) => {
                    detail = Some((entry.format, source));
                }
            }
        }

        buffer.free();
        match detail {
            Some((format, source)) => Err(RasterError::Decode { format, source }),
            None => Err(RasterError::UnrecognizedFormat),
        }
    }

    /// Encode `buffer` as `format`, returning the produced bytes.
    ///
    /// `reuse` optionally donates a buffer whose capacity seeds the output —
    /// a performance hint only. An uninitialized buffer fails before the
    /// registry is consulted; a tag with no entry, or whose entry lacks an
    /// encoder, fails with [`RasterError::UnsupportedFormat`].
    pub fn encode(
        &self,
        buffer: &PixelBuffer,
        format: ImageFormat,
        reuse: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, RasterError> {
        if buffer.is_empty() {
            return Err(RasterError::Uninitialized);
        }
        let encode = self
            .entries
            .iter()
            .find(|e| e.format == format)
            .and_then(|e| e.encode.as_ref())
            .ok_or(RasterError::UnsupportedFormat(format))?;

        let mut sink = ByteSink::with_reuse(reuse);
        encode(buffer, &mut sink).map_err(|source| RasterError::Encode { format, source })?;
        Ok(sink.into_bytes())
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Budget;
    use crate::pixel::{Rgba, Transparency};
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(Arc::new(Budget::default()))
    }

    /// A decoder that accepts any input starting with `magic` and fills a
    /// 1x1 opaque buffer.
    fn accepting(magic: u8) -> DecodeFn {
        Box::new(move |buffer, span| {
            if span.remaining().first() != Some(&magic) {
                return Err(DecodeFailure::Unrecognized);
            }
            buffer
                .alloc(1, 1)
                .map_err(DecodeFailure::malformed)?;
            buffer.pixels_mut()[0] = Rgba::new(magic, 0, 0, 255);
            Ok(())
        })
    }

    #[test]
    fn decode_tries_registration_order_and_rewinds() {
        let ticket = Arc::new(AtomicUsize::new(0));

        let first_ticket = Arc::new(AtomicUsize::new(usize::MAX));
        let second_ticket = Arc::new(AtomicUsize::new(usize::MAX));

        let counter = ticket.clone();
        let slot = first_ticket.clone();
        let first: DecodeFn = Box::new(move |_, span| {
            slot.store(counter.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            // Disturb the cursor; the registry must rewind before the next try.
            span.advance(3);
            Err(DecodeFailure::Unrecognized)
        });

        let counter = ticket.clone();
        let slot = second_ticket.clone();
        let second: DecodeFn = Box::new(move |buffer, span| {
            slot.store(counter.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            assert_eq!(span.position(), 0);
            buffer
                .alloc(1, 1)
                .map_err(DecodeFailure::malformed)?;
            Ok(())
        });

        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Gif, Some(first), None);
        registry.register(ImageFormat::Bmp, Some(second), None);

        let data = [0u8; 8];
        let mut span = ByteSpan::new(&data);
        let mut buffer = buffer();
        registry.decode(&mut buffer, &mut span).unwrap();

        assert_eq!(first_ticket.load(Ordering::SeqCst), 0);
        assert_eq!(second_ticket.load(Ordering::SeqCst), 1);
        assert_eq!((buffer.width(), buffer.height()), (1, 1));
    }

    #[test]
    fn decode_discards_previous_content() {
        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Bmp, Some(accepting(7)), None);

        let mut buffer = buffer();
        buffer.alloc(4, 4).unwrap();
        buffer.fill(Rgba::new(255, 0, 0, 255));

        let data = [9u8];
        let mut span = ByteSpan::new(&data);
        let err = registry.decode(&mut buffer, &mut span).unwrap_err();
        assert!(matches!(err, RasterError::UnrecognizedFormat));
        // Old content is gone even though no decoder matched.
        assert!(buffer.is_empty());
    }

    #[test]
    fn decode_surfaces_malformed_detail() {
        let rejecting: DecodeFn =
            Box::new(|_, _| Err(DecodeFailure::malformed("bad pixel data")));

        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Gif, Some(rejecting), None);
        registry.register(ImageFormat::Bmp, Some(accepting(1)), None);

        let data = [2u8];
        let mut span = ByteSpan::new(&data);
        let mut buffer = buffer();
        let err = registry.decode(&mut buffer, &mut span).unwrap_err();
        match err {
            RasterError::Decode { format, source } => {
                assert_eq!(format, ImageFormat::Gif);
                assert!(source.to_string().contains("bad pixel data"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_success_sets_classification() {
        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Bmp, Some(accepting(1)), None);

        let data = [1u8];
        let mut span = ByteSpan::new(&data);
        let mut buffer = buffer();
        registry.decode(&mut buffer, &mut span).unwrap();
        assert_eq!(buffer.transparency(), Transparency::Solid);
    }

    #[test]
    fn encode_requires_initialized_buffer() {
        let registry = CodecRegistry::new();
        let empty = buffer();
        assert!(matches!(
            registry.encode(&empty, ImageFormat::Png, None),
            Err(RasterError::Uninitialized)
        ));
    }

    #[test]
    fn encode_decode_only_tag_is_unsupported() {
        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Gif, Some(accepting(1)), None);
        assert!(registry.can_decode(ImageFormat::Gif));
        assert!(!registry.can_encode(ImageFormat::Gif));

        let mut buffer = buffer();
        buffer.alloc(1, 1).unwrap();
        assert!(matches!(
            registry.encode(&buffer, ImageFormat::Gif, None),
            Err(RasterError::UnsupportedFormat(ImageFormat::Gif))
        ));
    }

    #[test]
    fn encode_runs_matching_entry() {
        let encoder: EncodeFn = Box::new(|buffer, sink| {
            sink.write(&[buffer.width() as u8, buffer.height() as u8]);
            Ok(())
        });

        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Bmp, None, Some(encoder));

        let mut buffer = buffer();
        buffer.alloc(3, 2).unwrap();
        let bytes = registry.encode(&buffer, ImageFormat::Bmp, None).unwrap();
        assert_eq!(bytes, [3, 2]);
    }

    #[test]
    fn encode_failure_carries_detail() {
        let failing: EncodeFn = Box::new(|_, _| Err("disk full of bees".into()));

        let mut registry = CodecRegistry::new();
        registry.register(ImageFormat::Png, None, Some(failing));

        let mut buffer = buffer();
        buffer.alloc(1, 1).unwrap();
        let err = registry
            .encode(&buffer, ImageFormat::Png, None)
            .unwrap_err();
        match err {
            RasterError::Encode { format, source } => {
                assert_eq!(format, ImageFormat::Png);
                assert!(source.to_string().contains("bees"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
