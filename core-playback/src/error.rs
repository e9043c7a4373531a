//! # Reader Error Types
//!
//! Errors raised while opening a streaming reader, plus the engine-level
//! errors that the reader absorbs at runtime.

use thiserror::Error;

/// Errors that can occur while constructing a reader.
///
/// Every variant is fatal to construction: no partially opened reader is ever
/// returned, and engine handles acquired before the failure are released
/// before the error reaches the caller.
#[derive(Error, Debug)]
pub enum ReaderError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The container could not be opened or its streams could not be probed.
    #[error("Failed to open audio source: {0}")]
    SourceOpen(String),

    /// The container holds no audio stream.
    #[error("No audio stream found in {0}")]
    NoAudioStream(String),

    // ========================================================================
    // Format/Codec Errors
    // ========================================================================
    /// The stream's sample layout has no PCM representation.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// No decoder is available for the stream's codec.
    #[error("No decoder available: {0}")]
    DecoderUnavailable(String),

    /// A decoder exists but could not be opened.
    #[error("Failed to open decoder: {0}")]
    DecoderOpen(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Reader configuration failed validation.
    #[error("Invalid reader configuration: {0}")]
    InvalidConfig(String),
}

/// Failure to decode (part of) a single packet.
///
/// Never surfaces from `read`: the reader drops the rest of the packet and
/// moves on to the next one.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The packet data is malformed.
    #[error("Invalid packet data: {0}")]
    InvalidData(String),

    /// The decoder failed for another reason.
    #[error("Decoder failure: {0}")]
    Engine(String),
}

/// Failure of the engine to reposition the container.
#[derive(Error, Debug)]
pub enum SeekError {
    /// The container does not support seeking.
    #[error("Container is not seekable")]
    Unseekable,

    /// The target lies outside the container.
    #[error("Seek target {0} out of range")]
    OutOfRange(u64),

    /// The engine failed while seeking.
    #[error("Seek failed: {0}")]
    Engine(String),
}

/// Result type for reader construction.
pub type Result<T> = std::result::Result<T, ReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = ReaderError::NoAudioStream("clip.mp4".into());
        assert_eq!(err.to_string(), "No audio stream found in clip.mp4");

        let err = SeekError::OutOfRange(42);
        assert_eq!(err.to_string(), "Seek target 42 out of range");
    }
}
