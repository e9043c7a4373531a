//! # Raw Byte Buffer
//!
//! Growable byte buffer used for PCM staging inside readers.
//!
//! ## Design
//!
//! - **Ownership**: Each buffer is owned by exactly one reader and never shared
//! - **Resizing**: Explicit, with the caller choosing whether existing bytes
//!   survive the resize
//! - **Contents**: Raw interleaved sample bytes; the buffer knows nothing about
//!   sample formats
//!
//! ## Usage
//!
//! ```rust
//! use core_playback::buffer::RawBuffer;
//!
//! let mut buffer = RawBuffer::new(4);
//! buffer.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);
//!
//! // Grow while keeping what was written
//! buffer.resize(8, true);
//! assert_eq!(&buffer.as_slice()[..4], &[1, 2, 3, 4]);
//! ```

/// Growable raw byte buffer.
#[derive(Debug, Clone, Default)]
pub struct RawBuffer {
    data: Vec<u8>,
}

impl RawBuffer {
    /// Create a zero-filled buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Current size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resize the buffer to `size` bytes.
    ///
    /// With `keep` set, the first `min(old, new)` bytes are preserved.
    /// Without it the contents after the call are unspecified, which lets the
    /// buffer skip copying bytes that are about to be overwritten anyway.
    pub fn resize(&mut self, size: usize, keep: bool) {
        if !keep {
            self.data.clear();
        }
        self.data.resize(size, 0);
    }

    /// Grow to at least `size` bytes. Never shrinks.
    ///
    /// Returns `true` if the buffer was resized.
    pub fn ensure(&mut self, size: usize, keep: bool) -> bool {
        if self.data.len() >= size {
            return false;
        }
        self.resize(size, keep);
        true
    }

    /// The buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the buffer contents.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Move `range` to the start of the buffer.
    ///
    /// Bytes outside the moved region keep unspecified values.
    pub fn shift_down(&mut self, range: std::ops::Range<usize>) {
        self.data.copy_within(range, 0);
    }
}
