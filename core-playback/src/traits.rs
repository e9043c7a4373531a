//! # Core Reader Traits
//!
//! This module defines the sample-level abstractions shared by every reader in
//! the host audio system: the PCM sample formats, the stream specs a reader
//! produces, the source a reader is opened from, and the [`SampleReader`]
//! contract itself.
//!
//! ## Threading Model
//!
//! Readers are synchronous and single-threaded. Every call runs to completion
//! on the caller's thread; callers that share a reader across threads must
//! serialize access themselves.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use core_playback::SampleReader;
//!
//! fn drain(reader: &mut dyn SampleReader) -> usize {
//!     let mut total = 0;
//!     loop {
//!         let (supplied, _bytes) = reader.read(4096);
//!         total += supplied;
//!         if supplied < 4096 {
//!             break;
//!         }
//!     }
//!     total
//! }
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Sample Format Types
// ============================================================================

/// Raw PCM sample formats a reader can deliver.
///
/// Samples are interleaved and stored in native byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Unsigned 8-bit
    U8,
    /// Signed 16-bit
    S16,
    /// Signed 24-bit, packed in 3 bytes
    S24,
    /// Signed 32-bit
    S32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl SampleFormat {
    /// Size of one sample of this format in bytes.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::S16 => 2,
            SampleFormat::S24 => 3,
            SampleFormat::S32 => 4,
            SampleFormat::F32 => 4,
            SampleFormat::F64 => 8,
        }
    }
}

/// Format of the PCM stream a reader produces.
///
/// Captured once when the reader is opened and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specs {
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample format of every channel
    pub format: SampleFormat,
    /// Sample rate in Hz
    pub rate: u32,
}

impl Specs {
    /// Create a new specs descriptor.
    pub fn new(channels: u16, format: SampleFormat, rate: u32) -> Self {
        Self {
            channels,
            format,
            rate,
        }
    }

    /// Bytes occupied by one sample across all channels.
    pub fn frame_size(&self) -> usize {
        self.format.bytes_per_sample() * self.channels as usize
    }
}

/// How a reader holds its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderType {
    /// The whole signal is held in memory.
    Buffer,
    /// Samples are produced on demand from an underlying source.
    Stream,
}

/// Audio codecs the engine can report for a stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    /// MPEG-1 Audio Layer 3
    Mp3,
    /// Advanced Audio Coding (AAC/M4A)
    Aac,
    /// Free Lossless Audio Codec
    Flac,
    /// Ogg Vorbis
    Vorbis,
    /// Opus (low-latency codec)
    Opus,
    /// Uncompressed PCM (WAV/AIFF payloads)
    Pcm,
    /// Apple Lossless Audio Codec
    Alac,
    /// Codec not recognized
    Unknown,
}

impl AudioCodec {
    /// Returns `true` if this is a lossless codec.
    pub fn is_lossless(&self) -> bool {
        matches!(self, AudioCodec::Flac | AudioCodec::Pcm | AudioCodec::Alac)
    }
}

// ============================================================================
// Audio Source Types
// ============================================================================

/// Source a reader is opened from.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Media file stored locally on the filesystem.
    LocalFile {
        /// Path to the container file
        path: PathBuf,
    },

    /// Encoded container data already held in memory.
    CachedChunk {
        /// Raw container bytes (encoded, not PCM)
        data: Bytes,
        /// Optional hint about the source codec, used to speed up probing
        codec_hint: Option<AudioCodec>,
    },
}

impl AudioSource {
    /// Source for a file on disk.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        AudioSource::LocalFile { path: path.into() }
    }

    /// Human readable description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            AudioSource::LocalFile { path } => {
                core_runtime::logging::strip_path(&path.to_string_lossy()).to_string()
            }
            AudioSource::CachedChunk { data, .. } => format!("memory buffer ({} bytes)", data.len()),
        }
    }
}

// ============================================================================
// Core Traits
// ============================================================================

/// A pull-based source of PCM sample blocks.
///
/// Positions and lengths are counted in samples (one sample = one value per
/// channel), never in bytes.
///
/// ## Contract
///
/// - `read` never fails. A short count signals end of data or a transient
///   decode gap; callers confirm the end against [`SampleReader::length`].
/// - `seek` is best effort. A seek the reader cannot honour is ignored and
///   leaves the reader untouched.
pub trait SampleReader {
    /// Whether `seek` is supported at all.
    fn is_seekable(&self) -> bool;

    /// Move the read cursor to `position` samples from the start.
    ///
    /// Negative positions are ignored.
    fn seek(&mut self, position: i64);

    /// Number of samples this reader expects to deliver, or `-1` if unknown.
    fn length(&self) -> i64;

    /// Current read cursor in samples.
    fn position(&self) -> i64;

    /// Format of the delivered samples.
    fn specs(&self) -> Specs;

    /// How the reader holds its data.
    fn reader_type(&self) -> ReaderType;

    /// Read up to `count` samples.
    ///
    /// Returns the number of samples supplied and the interleaved bytes for
    /// exactly those samples. The slice borrows the reader's output buffer and
    /// is only valid until the next call.
    fn read(&mut self, count: usize) -> (usize, &[u8]);
}

// ============================================================================
// Tests
// ============================================================================
