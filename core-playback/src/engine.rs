//! # Demux/Decode Engine Interface
//!
//! Capability traits for the container demuxer and codec decoder a reader is
//! built on. The reader only ever talks to an engine through these traits, so
//! any backend (the bundled symphonia engine, or a scripted engine in tests)
//! can sit underneath it.
//!
//! ```text
//! MediaEngine ──open_container──▶ Container ──read_packet──▶ Packet
//!                                     │                          │
//!                                     └─open_decoder─▶ StreamDecoder ◀─decode
//! ```
//!
//! Handles are closed by dropping them.

use crate::error::{DecodeError, Result, SeekError};
use crate::traits::{AudioCodec, AudioSource, SampleFormat};

/// Ticks per second of the engine's native seek/duration time base.
pub const TIME_BASE: u64 = 1_000_000;

/// Classification of a container stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Other,
}

/// Per-stream metadata probed from a container.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Position of the stream within the container's stream list.
    pub index: usize,
    /// Stream classification.
    pub kind: StreamKind,
    /// Codec of the stream's packets.
    pub codec: AudioCodec,
    /// Channel count, if the container declares one.
    pub channels: Option<u16>,
    /// Sample rate in Hz, if the container declares one.
    pub sample_rate: Option<u32>,
    /// PCM format the decoder produces, or `None` if the stream's sample
    /// layout has no PCM representation.
    pub sample_format: Option<SampleFormat>,
}

impl StreamInfo {
    /// Audio stream with fully known parameters.
    pub fn audio(index: usize, codec: AudioCodec, channels: u16, rate: u32, format: SampleFormat) -> Self {
        Self {
            index,
            kind: StreamKind::Audio,
            codec,
            channels: Some(channels),
            sample_rate: Some(rate),
            sample_format: Some(format),
        }
    }

    /// Non-audio stream placeholder.
    pub fn other(index: usize) -> Self {
        Self {
            index,
            kind: StreamKind::Other,
            codec: AudioCodec::Unknown,
            channels: None,
            sample_rate: None,
            sample_format: None,
        }
    }

    /// Returns `true` if the stream carries audio.
    pub fn is_audio(&self) -> bool {
        self.kind == StreamKind::Audio
    }
}

/// A chunk of compressed data extracted from the container.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    /// Presentation timestamp in the stream's own time base.
    pub timestamp: u64,
    /// Duration in the stream's own time base.
    pub duration: u64,
    /// Compressed payload.
    pub data: Box<[u8]>,
}

impl Packet {
    /// View of the payload starting at `offset` bytes.
    pub fn view(&self, offset: usize) -> PacketView<'_> {
        PacketView {
            timestamp: self.timestamp,
            duration: self.duration,
            data: &self.data[offset.min(self.data.len())..],
        }
    }
}

/// The not yet consumed part of a packet, handed to a decoder.
#[derive(Debug, Clone, Copy)]
pub struct PacketView<'a> {
    pub timestamp: u64,
    pub duration: u64,
    pub data: &'a [u8],
}

/// Outcome of one decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeStep {
    /// Bytes of PCM written to the output slice.
    pub written: usize,
    /// Bytes of packet input consumed.
    pub consumed: usize,
}

/// An opened and probed media container.
///
/// Dropping the container closes it.
pub trait Container {
    /// Streams of the container, in container order.
    fn streams(&self) -> &[StreamInfo];

    /// Total duration in [`TIME_BASE`] ticks, if known.
    fn duration(&self) -> Option<u64>;

    /// Next packet of any stream, or `None` at end of stream.
    fn read_packet(&mut self) -> Option<Packet>;

    /// Reposition the container at or before `timestamp` ([`TIME_BASE`] ticks).
    ///
    /// Returns how many samples of the first audio stream lie between the
    /// landing point and the target. The next packets decode those samples
    /// first; the caller discards them.
    fn seek(&mut self, timestamp: u64) -> std::result::Result<u64, SeekError>;

    /// Find and open a decoder for `stream`.
    ///
    /// Fails with [`ReaderError::DecoderUnavailable`](crate::ReaderError::DecoderUnavailable)
    /// if no decoder handles the codec, or
    /// [`ReaderError::DecoderOpen`](crate::ReaderError::DecoderOpen) if one
    /// exists but cannot be opened.
    fn open_decoder(&self, stream: &StreamInfo) -> Result<Box<dyn StreamDecoder>>;
}

/// An opened decoder for one stream.
///
/// Dropping the decoder closes it. A decoder must be dropped before the
/// container whose stream it decodes.
pub trait StreamDecoder {
    /// Decode from the front of `input` into `out`.
    ///
    /// A call may consume only part of the input; the caller keeps calling
    /// with the remaining bytes until the packet is used up. `out` is at least
    /// as large as the configured maximal frame size.
    fn decode(
        &mut self,
        input: PacketView<'_>,
        out: &mut [u8],
    ) -> std::result::Result<DecodeStep, DecodeError>;

    /// Drop any internally buffered state (after a seek).
    fn flush(&mut self);
}

/// Entry point of a demux/decode backend.
pub trait MediaEngine {
    /// Open `source` and probe its streams.
    ///
    /// Fails with [`ReaderError::SourceOpen`](crate::ReaderError::SourceOpen).
    fn open_container(&self, source: &AudioSource) -> Result<Box<dyn Container>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_view_offsets() {
        let packet = Packet {
            stream_index: 0,
            timestamp: 10,
            duration: 4,
            data: vec![1, 2, 3, 4].into_boxed_slice(),
        };

        assert_eq!(packet.view(0).data, &[1, 2, 3, 4]);
        assert_eq!(packet.view(3).data, &[4]);
        assert!(packet.view(9).data.is_empty());
        assert_eq!(packet.view(1).timestamp, 10);
    }

    #[test]
    fn stream_info_constructors() {
        let audio = StreamInfo::audio(1, AudioCodec::Flac, 2, 48000, SampleFormat::S32);
        assert!(audio.is_audio());
        assert_eq!(audio.sample_rate, Some(48000));

        let video = StreamInfo::other(0);
        assert!(!video.is_audio());
        assert_eq!(video.sample_format, None);
    }
}
