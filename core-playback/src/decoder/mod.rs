//! # Audio Decoder Module
//!
//! The bundled [`MediaEngine`](crate::engine::MediaEngine), built on the
//! Symphonia pure-Rust audio library.
//!
//! ## Supported Formats
//!
//! | Format | Codec | Feature Flag |
//! |--------|-------|--------------|
//! | MP3 | MPEG-1/2 Audio Layer III | `decoder-mp3` |
//! | FLAC | Free Lossless Audio Codec | `decoder-flac` |
//! | Vorbis | Ogg Vorbis | `decoder-vorbis` |
//! | Opus | Opus in Ogg | `decoder-opus` |
//! | AAC | Advanced Audio Coding | `decoder-aac` |
//! | WAV | PCM in RIFF | `decoder-wav` |
//! | ALAC | Apple Lossless | `decoder-alac` |
//!
//! ## Architecture
//!
//! ```text
//! AudioSource → MediaSourceStream → FormatReader → Decoder → interleaved PCM bytes
//!               └──────────── SymphoniaContainer ─┘  └ SymphoniaStreamDecoder ┘
//! ```
//!
//! Symphonia reports decoded audio as planar buffers of the codec's native
//! sample type; [`SampleConverter`] turns them into interleaved frames of the
//! stream's [`SampleFormat`](crate::SampleFormat).

#[cfg(feature = "core-decoder")]
mod format_detector;

#[cfg(feature = "core-decoder")]
mod sample_converter;

#[cfg(feature = "core-decoder")]
mod symphonia;

#[cfg(feature = "core-decoder")]
pub use self::symphonia::{SymphoniaContainer, SymphoniaEngine, SymphoniaStreamDecoder};

#[cfg(feature = "core-decoder")]
pub use format_detector::FormatDetector;

#[cfg(feature = "core-decoder")]
pub use sample_converter::SampleConverter;

#[cfg(not(feature = "core-decoder"))]
compile_error!(
    "Audio decoder feature is not enabled. Enable one of: \
     'decoder-mp3', 'decoder-flac', 'decoder-vorbis', 'decoder-opus', \
     'decoder-aac', 'decoder-wav', 'decoder-alac', or 'decoder-all'"
);
