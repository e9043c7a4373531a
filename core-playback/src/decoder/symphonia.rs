//! Symphonia-backed demux/decode engine.

use crate::decoder::format_detector::FormatDetector;
use crate::decoder::sample_converter::SampleConverter;
use crate::engine::{
    Container, DecodeStep, MediaEngine, Packet, PacketView, StreamDecoder, StreamInfo, StreamKind,
    TIME_BASE,
};
use crate::error::{DecodeError, ReaderError, Result, SeekError};
use crate::traits::{AudioCodec, AudioSource, SampleFormat};
use bytes::Bytes;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::{Error as SymphoniaError, SeekErrorKind};
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo, Track};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;
use tracing::{debug, error, info, instrument, trace, warn};

/// Engine that opens containers with symphonia's default probe and codec
/// registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaEngine;

impl SymphoniaEngine {
    pub fn new() -> Self {
        Self
    }

    fn open_local_file(path: &Path) -> Result<(MediaSourceStream, Hint)> {
        let file = std::fs::File::open(path).map_err(|e| {
            error!("Failed to open file {:?}: {}", path, e);
            ReaderError::SourceOpen(format!("Failed to open file: {}", e))
        })?;

        let hint = FormatDetector::hint_from_path(path);
        let media_source = Box::new(file) as Box<dyn MediaSource>;

        Ok((MediaSourceStream::new(media_source, Default::default()), hint))
    }

    fn open_memory_buffer(data: &Bytes, codec_hint: Option<&AudioCodec>) -> (MediaSourceStream, Hint) {
        let hint = FormatDetector::hint_from_codec(codec_hint);
        let cursor = Cursor::new(data.to_vec());
        let media_source = Box::new(cursor) as Box<dyn MediaSource>;

        (MediaSourceStream::new(media_source, Default::default()), hint)
    }
}

impl MediaEngine for SymphoniaEngine {
    #[instrument(skip(self, source), fields(source = %source.describe()))]
    fn open_container(&self, source: &AudioSource) -> Result<Box<dyn Container>> {
        let (media_source, hint) = match source {
            AudioSource::LocalFile { path } => Self::open_local_file(path)?,
            AudioSource::CachedChunk { data, codec_hint } => {
                Self::open_memory_buffer(data, codec_hint.as_ref())
            }
        };

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                media_source,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| {
                error!("Format probe failed: {}", e);
                ReaderError::SourceOpen(format!("Failed to probe format: {}", e))
            })?;

        let container = SymphoniaContainer::new(probed.format);
        info!(
            "Opened container with {} stream(s)",
            container.streams.len()
        );

        Ok(Box::new(container))
    }
}

/// Probed symphonia format reader.
pub struct SymphoniaContainer {
    reader: Box<dyn FormatReader>,
    streams: Vec<StreamInfo>,
    /// Symphonia track id per stream index
    track_ids: Vec<u32>,
    codec_params: Vec<CodecParameters>,
    duration: Option<u64>,
}

impl SymphoniaContainer {
    fn new(reader: Box<dyn FormatReader>) -> Self {
        let tracks = reader.tracks();

        let streams = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| Self::stream_info(index, track))
            .collect();
        let track_ids = tracks.iter().map(|t| t.id).collect();
        let codec_params = tracks.iter().map(|t| t.codec_params.clone()).collect();
        let duration = tracks.iter().filter_map(|t| Self::track_duration(&t.codec_params)).max();

        match duration {
            Some(ticks) => debug!("Container duration: {} us", ticks),
            None => debug!("Container duration unknown"),
        }

        Self {
            reader,
            streams,
            track_ids,
            codec_params,
            duration,
        }
    }

    fn stream_info(index: usize, track: &Track) -> StreamInfo {
        let params = &track.codec_params;
        if params.codec == CODEC_TYPE_NULL {
            return StreamInfo::other(index);
        }

        let channels = params
            .channels
            .or_else(|| params.channel_layout.map(|layout| layout.into_channels()))
            .map(|ch| ch.count() as u16);

        StreamInfo {
            index,
            kind: StreamKind::Audio,
            codec: FormatDetector::detect_codec(params.codec),
            channels,
            sample_rate: params.sample_rate,
            sample_format: FormatDetector::sample_format(params),
        }
    }

    /// Track duration in [`TIME_BASE`] ticks, rounded up so that converting
    /// back to samples at the track's rate yields the exact frame count.
    fn track_duration(params: &CodecParameters) -> Option<u64> {
        let frames = params.n_frames?;
        let (numer, denom) = match (params.time_base, params.sample_rate) {
            (Some(tb), _) => (tb.numer as u128, tb.denom as u128),
            (None, Some(rate)) => (1, rate as u128),
            _ => return None,
        };
        if denom == 0 {
            return None;
        }

        let ticks = (frames as u128 * numer * TIME_BASE as u128).div_ceil(denom);
        u64::try_from(ticks).ok()
    }

    /// Convert a span of track timestamps to samples at the track's rate.
    fn ts_to_samples(params: &CodecParameters, ts: u64) -> u64 {
        match (params.time_base, params.sample_rate) {
            (Some(tb), Some(rate)) if tb.denom > 0 => {
                let samples = ts as u128 * tb.numer as u128 * rate as u128 / tb.denom as u128;
                u64::try_from(samples).unwrap_or(u64::MAX)
            }
            _ => ts,
        }
    }

    fn seek_error(timestamp: u64, err: SymphoniaError) -> SeekError {
        match err {
            SymphoniaError::SeekError(SeekErrorKind::Unseekable)
            | SymphoniaError::SeekError(SeekErrorKind::ForwardOnly) => SeekError::Unseekable,
            SymphoniaError::SeekError(SeekErrorKind::OutOfRange) => SeekError::OutOfRange(timestamp),
            other => SeekError::Engine(other.to_string()),
        }
    }
}

impl Container for SymphoniaContainer {
    fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    fn duration(&self) -> Option<u64> {
        self.duration
    }

    fn read_packet(&mut self) -> Option<Packet> {
        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!("Reached end of container");
                    return None;
                }
                Err(e) => {
                    warn!("Failed to read packet, treating as end of stream: {}", e);
                    return None;
                }
            };

            let Some(stream_index) = self.track_ids.iter().position(|&id| id == packet.track_id()) else {
                trace!("Skipping packet of unknown track {}", packet.track_id());
                continue;
            };

            return Some(Packet {
                stream_index,
                timestamp: packet.ts,
                duration: packet.dur,
                data: packet.data,
            });
        }
    }

    fn seek(&mut self, timestamp: u64) -> std::result::Result<u64, SeekError> {
        let time = Time::new(
            timestamp / TIME_BASE,
            (timestamp % TIME_BASE) as f64 / TIME_BASE as f64,
        );

        let seeked = self
            .reader
            .seek(SeekMode::Accurate, SeekTo::Time { time, track_id: None })
            .map_err(|e| Self::seek_error(timestamp, e))?;

        let params = self
            .track_ids
            .iter()
            .position(|&id| id == seeked.track_id)
            .and_then(|index| self.codec_params.get(index));
        let preroll = params
            .map(|p| Self::ts_to_samples(p, seeked.required_ts.saturating_sub(seeked.actual_ts)))
            .unwrap_or(0);

        debug!(
            "Container seeked: required ts {}, actual ts {}, {} samples to skip",
            seeked.required_ts, seeked.actual_ts, preroll
        );
        Ok(preroll)
    }

    fn open_decoder(&self, stream: &StreamInfo) -> Result<Box<dyn StreamDecoder>> {
        let params = self.codec_params.get(stream.index).ok_or_else(|| {
            ReaderError::DecoderUnavailable(format!("No stream with index {}", stream.index))
        })?;

        FormatDetector::validate_codec_support(&stream.codec)?;

        let format = stream.sample_format.ok_or_else(|| {
            ReaderError::UnsupportedFormat(format!("{:?} has no PCM sample format", stream.codec))
        })?;

        let registry = symphonia::default::get_codecs();
        if registry.get_codec(params.codec).is_none() {
            error!("No registered decoder for {:?}", stream.codec);
            return Err(ReaderError::DecoderUnavailable(format!(
                "No decoder registered for {:?}",
                stream.codec
            )));
        }

        let decoder = registry
            .make(params, &DecoderOptions::default())
            .map_err(|e| {
                error!("Failed to create decoder: {}", e);
                ReaderError::DecoderOpen(format!("Failed to create codec decoder: {}", e))
            })?;

        debug!("Decoder opened for stream {}", stream.index);

        Ok(Box::new(SymphoniaStreamDecoder {
            decoder,
            track_id: self.track_ids[stream.index],
            format,
            staged: Vec::new(),
            staged_offset: 0,
        }))
    }
}

/// Symphonia codec decoder producing interleaved PCM in one fixed format.
///
/// Symphonia decodes a whole packet per call. The converted bytes are staged
/// and handed out across as many `decode` calls as the output slices need;
/// the packet counts as consumed once its staged bytes are drained.
pub struct SymphoniaStreamDecoder {
    decoder: Box<dyn Decoder>,
    track_id: u32,
    format: SampleFormat,
    staged: Vec<u8>,
    staged_offset: usize,
}

impl StreamDecoder for SymphoniaStreamDecoder {
    fn decode(
        &mut self,
        input: PacketView<'_>,
        out: &mut [u8],
    ) -> std::result::Result<DecodeStep, DecodeError> {
        if self.staged_offset >= self.staged.len() {
            self.staged.clear();
            self.staged_offset = 0;

            let packet = symphonia::core::formats::Packet::new_from_slice(
                self.track_id,
                input.timestamp,
                input.duration,
                input.data,
            );

            let decoded = self.decoder.decode(&packet).map_err(|e| match e {
                SymphoniaError::DecodeError(msg) => DecodeError::InvalidData(msg.to_string()),
                other => DecodeError::Engine(other.to_string()),
            })?;

            SampleConverter::append_interleaved(decoded, self.format, &mut self.staged);
        }

        let pending = &self.staged[self.staged_offset..];
        let written = pending.len().min(out.len());
        out[..written].copy_from_slice(&pending[..written]);
        self.staged_offset += written;

        let consumed = if self.staged_offset >= self.staged.len() {
            input.data.len()
        } else {
            0
        };

        Ok(DecodeStep { written, consumed })
    }

    fn flush(&mut self) {
        self.decoder.reset();
        self.staged.clear();
        self.staged_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::units::TimeBase;

    #[test]
    fn test_garbage_memory_buffer_fails_to_open() {
        let source = AudioSource::CachedChunk {
            data: Bytes::from(vec![0xFF, 0xFB, 0x90, 0x00]),
            codec_hint: Some(AudioCodec::Mp3),
        };

        let result = SymphoniaEngine::new().open_container(&source);
        assert!(matches!(result, Err(ReaderError::SourceOpen(_))));
    }

    #[test]
    fn test_missing_file_fails_to_open() {
        let source = AudioSource::file("/nonexistent/path/track.flac");
        let result = SymphoniaEngine::new().open_container(&source);
        assert!(matches!(result, Err(ReaderError::SourceOpen(_))));
    }

    #[test]
    fn test_track_duration_from_time_base() {
        let mut params = CodecParameters::new();
        params.with_n_frames(88200).with_time_base(TimeBase::new(1, 44100));
        assert_eq!(SymphoniaContainer::track_duration(&params), Some(2 * TIME_BASE));

        // 1000 / 44100 s is 22675.7 us
        params.with_n_frames(1000);
        assert_eq!(SymphoniaContainer::track_duration(&params), Some(22676));
    }

    #[test]
    fn test_track_duration_from_sample_rate() {
        let mut params = CodecParameters::new();
        params.with_n_frames(24000).with_sample_rate(48000);
        assert_eq!(SymphoniaContainer::track_duration(&params), Some(TIME_BASE / 2));

        let unknown = CodecParameters::new();
        assert_eq!(SymphoniaContainer::track_duration(&unknown), None);
    }

    #[test]
    fn test_ts_to_samples() {
        let mut params = CodecParameters::new();
        params.with_sample_rate(44100).with_time_base(TimeBase::new(1, 44100));
        assert_eq!(SymphoniaContainer::ts_to_samples(&params, 825), 825);

        // Millisecond time base at 48 kHz
        params.with_sample_rate(48000).with_time_base(TimeBase::new(1, 1000));
        assert_eq!(SymphoniaContainer::ts_to_samples(&params, 10), 480);

        assert_eq!(SymphoniaContainer::ts_to_samples(&CodecParameters::new(), 7), 7);
    }

    #[test]
    fn test_seek_error_mapping() {
        let err = SymphoniaContainer::seek_error(5, SymphoniaError::SeekError(SeekErrorKind::OutOfRange));
        assert!(matches!(err, SeekError::OutOfRange(5)));

        let err = SymphoniaContainer::seek_error(5, SymphoniaError::SeekError(SeekErrorKind::Unseekable));
        assert!(matches!(err, SeekError::Unseekable));
    }
}
