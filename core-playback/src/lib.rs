//! # Streaming Audio Reader
//!
//! Pull-based PCM sample reader over compressed audio containers.
//!
//! ## Overview
//!
//! This crate handles:
//! - Opening a container and selecting its first audio stream
//! - Decoding packets on demand into caller-sized batches of interleaved samples
//! - Sample-accurate position tracking and seeking
//! - Audio decoding using symphonia (feature-gated)
//!
//! ```rust,no_run
//! use core_playback::{AudioSource, SampleReader, StreamingReader};
//!
//! # fn main() -> core_playback::Result<()> {
//! let mut reader = StreamingReader::open(AudioSource::file("/music/track.flac"))?;
//! let specs = reader.specs();
//!
//! let (supplied, bytes) = reader.read(4096);
//! assert_eq!(bytes.len(), supplied * specs.frame_size());
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod reader;
pub mod traits;

pub use config::ReaderConfig;
pub use engine::{
    Container, DecodeStep, MediaEngine, Packet, PacketView, StreamDecoder, StreamInfo, StreamKind,
    TIME_BASE,
};
pub use error::{DecodeError, ReaderError, Result, SeekError};
pub use reader::StreamingReader;
pub use traits::{AudioCodec, AudioSource, ReaderType, SampleFormat, SampleReader, Specs};
