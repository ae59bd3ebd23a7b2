//! Byte views handed to and from codecs.
//!
//! [`ByteSpan`] is a read cursor over a caller-owned byte range; the registry
//! rewinds it before every decode attempt. [`ByteSink`] collects encoder
//! output, optionally reusing a caller-supplied buffer's capacity.

use alloc::format;
use alloc::vec::Vec;

use crate::error::RasterError;

/// Read-only view over a caller-owned byte range plus a cursor.
#[derive(Debug)]
pub struct ByteSpan<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteSpan<'a> {
    /// View the whole slice, cursor at 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// View a sub-range of the slice, cursor at 0.
    ///
    /// `start`/`end` default to the slice bounds when absent. Fails with
    /// [`RasterError::InvalidInput`] when `start > end` or `end` is past the
    /// end of the slice.
    pub fn slice(
        data: &'a [u8],
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<Self, RasterError> {
        let start = start.unwrap_or(0);
        let end = end.unwrap_or(data.len());
        if start > end || end > data.len() {
            return Err(RasterError::InvalidInput(format!(
                "byte range {start}..{end} out of bounds for {} bytes",
                data.len()
            )));
        }
        Ok(Self {
            data: &data[start..end],
            pos: 0,
        })
    }

    /// Total length of the viewed range.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the viewed range is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind the cursor to the start of the range.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Bytes from the cursor to the end of the range.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Advance the cursor, saturating at the end of the range.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.data.len());
    }

    /// Read `n` bytes, advancing the cursor; `None` if fewer remain.
    pub fn read(&mut self, n: usize) -> Option<&'a [u8]> {
        let bytes = self.remaining().get(..n)?;
        self.pos += n;
        Some(bytes)
    }
}

/// Growable output region an encoder writes into.
///
/// Seeding with a caller-supplied buffer reuses its capacity — a performance
/// hint only, never a correctness requirement.
#[derive(Debug, Default)]
pub struct ByteSink {
    data: Vec<u8>,
}

impl ByteSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink reusing the capacity of `reuse`, cleared of any content.
    pub fn with_reuse(reuse: Option<Vec<u8>>) -> Self {
        let mut data = reuse.unwrap_or_default();
        data.clear();
        Self { data }
    }

    /// Append bytes to the sink.
    pub fn write(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying vector, for encoders built on `std::io::Write`.
    pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Consume the sink, returning the produced bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(feature = "std")]
impl std::io::Write for ByteSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
