//! Dimension limits and memory accounting.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Default width bound for a fresh [`Budget`].
pub const DEFAULT_MAX_WIDTH: u32 = 10_240;
/// Default height bound for a fresh [`Budget`].
pub const DEFAULT_MAX_HEIGHT: u32 = 10_240;

/// Dimension limits plus the byte-usage counter for the buffers it governs.
///
/// The host constructs one budget and shares it (via `Arc`) with every
/// [`PixelBuffer`](crate::PixelBuffer) it creates. Allocation checks
/// dimensions against the limits and charges the counter; freeing releases
/// exactly what was charged. Counter updates are atomic so the pairing holds
/// even when a multi-threaded host owns buffers on different threads.
#[derive(Debug)]
pub struct Budget {
    max_width: AtomicU32,
    max_height: AtomicU32,
    used_bytes: AtomicUsize,
}

impl Budget {
    /// Create a budget with explicit dimension bounds.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width: AtomicU32::new(max_width),
            max_height: AtomicU32::new(max_height),
            used_bytes: AtomicUsize::new(0),
        }
    }

    /// Check whether dimensions are within the configured bounds.
    ///
    /// Returns `Err` with a description if either limit is exceeded.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), &'static str> {
        if width > self.max_width() {
            return Err("width exceeds limit");
        }
        if height > self.max_height() {
            return Err("height exceeds limit");
        }
        Ok(())
    }

    /// Maximum allowed buffer width.
    pub fn max_width(&self) -> u32 {
        self.max_width.load(Ordering::Relaxed)
    }

    /// Maximum allowed buffer height.
    pub fn max_height(&self) -> u32 {
        self.max_height.load(Ordering::Relaxed)
    }

    /// Set the maximum allowed buffer width.
    ///
    /// Affects future allocations only; existing buffers are untouched.
    pub fn set_max_width(&self, max_width: u32) {
        self.max_width.store(max_width, Ordering::Relaxed);
    }

    /// Set the maximum allowed buffer height.
    pub fn set_max_height(&self, max_height: u32) {
        self.max_height.store(max_height, Ordering::Relaxed);
    }

    /// Total bytes of pixel storage currently charged against this budget.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes.load(Ordering::Relaxed)
    }

    pub(crate) fn reserve(&self, bytes: usize) {
        self.used_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn release(&self, bytes: usize) {
        self.used_bytes.fetch_sub(bytes, Ordering::Relaxed);
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT)
    }
}
