//! # Streaming Reader
//!
//! Pull-based PCM reader over a demux/decode engine.
//!
//! ## Buffering
//!
//! Three units of work have to line up: compressed packets of arbitrary size,
//! decoded frames of arbitrary size, and the fixed sample counts callers ask
//! for. The reader keeps two buffers:
//!
//! - the **output buffer**, handed to the caller, grown to the largest batch
//!   delivered so far;
//! - the **carry buffer**, which receives decoded bytes. Whatever the last
//!   decoded packet produced beyond the caller's request stays at the front of
//!   this buffer, its length recorded in `carry_len`, and is delivered first
//!   on the next `read`.
//!
//! ```text
//! read(n):  [carry_len bytes] ─┐
//!           packet ─decode─▶ carry ─copy─▶ output (n * frame_size bytes)
//!                             └─ surplus shifted to front, carry_len = surplus
//! ```
//!
//! After a seek the container may land before the requested sample. The
//! samples in between are decoded and dropped before anything is delivered.

use crate::buffer::RawBuffer;
use crate::config::ReaderConfig;
use crate::engine::{Container, MediaEngine, Packet, StreamDecoder, StreamInfo, TIME_BASE};
use crate::error::{ReaderError, Result};
use crate::traits::{AudioSource, ReaderType, SampleReader, Specs};
use tracing::{debug, error, info, instrument, trace, warn};

/// Streaming reader over the first audio stream of a container.
///
/// ## State Management
///
/// - `position` counts samples delivered since the start (or since the last
///   successful seek)
/// - `carry_len` counts decoded bytes waiting at the front of the carry buffer
/// - `skip_len` counts decoded bytes between a seek's landing point and its
///   target that are still to be dropped
/// - everything else is fixed at open
pub struct StreamingReader {
    // Field order matters: the decoder drops before the container it reads from.
    decoder: Box<dyn StreamDecoder>,
    container: Box<dyn Container>,

    /// Selected audio stream
    stream: StreamInfo,

    specs: Specs,

    /// Read cursor in samples
    position: i64,

    output: RawBuffer,
    carry: RawBuffer,

    /// Valid bytes at the front of `carry` not yet delivered
    carry_len: usize,

    /// Decoded bytes still to drop before the seek target is reached
    skip_len: usize,

    max_frame_bytes: usize,
}

impl StreamingReader {
    /// Open `source` with the bundled symphonia engine and default buffering.
    ///
    /// # Errors
    ///
    /// See [`StreamingReader::open_with`].
    #[cfg(feature = "core-decoder")]
    pub fn open(source: AudioSource) -> Result<Self> {
        Self::open_with(
            &crate::decoder::SymphoniaEngine::new(),
            source,
            &ReaderConfig::default(),
        )
    }

    /// Open `source` through `engine`.
    ///
    /// The first audio stream of the container is selected; later audio
    /// streams are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The container cannot be opened or probed
    /// - The container has no audio stream
    /// - The stream's sample layout has no PCM representation
    /// - No decoder exists for the codec, or it fails to open
    ///
    /// Handles acquired before the failure are dropped before returning.
    #[instrument(skip(engine, source, config), fields(source = %source.describe()))]
    pub fn open_with(
        engine: &dyn MediaEngine,
        source: AudioSource,
        config: &ReaderConfig,
    ) -> Result<Self> {
        config.validate().map_err(ReaderError::InvalidConfig)?;

        let container = engine.open_container(&source)?;

        let stream = container
            .streams()
            .iter()
            .find(|s| s.is_audio())
            .cloned()
            .ok_or_else(|| {
                error!("No audio stream in container");
                ReaderError::NoAudioStream(source.describe())
            })?;
        debug!("Selected stream index: {}", stream.index);

        let specs = Self::specs_for(&stream)?;
        debug!(
            "Stream specs: {}Hz, {} channels, {:?}",
            specs.rate, specs.channels, specs.format
        );

        let decoder = container.open_decoder(&stream)?;

        info!(
            "Streaming reader opened ({:?}, lossless: {})",
            stream.codec,
            stream.codec.is_lossless()
        );

        Ok(Self {
            decoder,
            container,
            stream,
            specs,
            position: 0,
            output: RawBuffer::new(0),
            carry: RawBuffer::new(config.carry_capacity),
            carry_len: 0,
            skip_len: 0,
            max_frame_bytes: config.max_frame_bytes,
        })
    }

    fn specs_for(stream: &StreamInfo) -> Result<Specs> {
        let format = stream.sample_format.ok_or_else(|| {
            error!("Stream sample format has no PCM representation");
            ReaderError::UnsupportedFormat(format!(
                "{:?} stream {} has no PCM sample format",
                stream.codec, stream.index
            ))
        })?;

        let channels = stream
            .channels
            .filter(|&c| c > 0)
            .ok_or_else(|| ReaderError::UnsupportedFormat("Missing channel count".to_string()))?;

        let rate = stream
            .sample_rate
            .filter(|&r| r > 0)
            .ok_or_else(|| ReaderError::UnsupportedFormat("Missing sample rate".to_string()))?;

        Ok(Specs::new(channels, format, rate))
    }

    /// Metadata of the selected audio stream.
    pub fn stream_info(&self) -> &StreamInfo {
        &self.stream
    }

    /// Decode every remaining byte of `packet` into the carry buffer, starting
    /// at offset 0. Returns the number of bytes decoded.
    ///
    /// A decode error abandons the rest of the packet; whatever was decoded
    /// before it is kept.
    fn decode_packet(&mut self, packet: &Packet) -> usize {
        let mut consumed = 0;
        let mut filled = 0;

        while consumed < packet.data.len() {
            if self.carry.len() - filled < self.max_frame_bytes {
                let grown = self.carry.len() + self.max_frame_bytes;
                trace!("Growing carry buffer to {} bytes", grown);
                self.carry.resize(grown, true);
            }

            let step = match self
                .decoder
                .decode(packet.view(consumed), &mut self.carry.as_mut_slice()[filled..])
            {
                Ok(step) => step,
                Err(e) => {
                    warn!(
                        "Dropping rest of packet at ts {} ({} bytes): {}",
                        packet.timestamp,
                        packet.data.len().saturating_sub(consumed),
                        e
                    );
                    break;
                }
            };

            if step.written == 0 && step.consumed == 0 {
                warn!("Decoder made no progress on packet at ts {}", packet.timestamp);
                break;
            }

            filled += step.written;
            consumed += step.consumed;
        }

        filled
    }

    /// Move the first `decoded` bytes of the carry buffer to the output at
    /// `cursor`, dropping pending seek preroll first and stopping after
    /// `left` samples. Returns the number of carry bytes used up.
    fn take_decoded(&mut self, decoded: usize, cursor: &mut usize, left: &mut usize) -> usize {
        let frame_size = self.specs.frame_size();

        let skipped = self.skip_len.min(decoded);
        self.skip_len -= skipped;

        let wanted = left.saturating_mul(frame_size);
        let delivered = whole_frames((decoded - skipped).min(wanted), frame_size);
        if delivered == 0 {
            return skipped;
        }

        if self.output.ensure(*cursor + delivered, true) {
            trace!("Output buffer grown to {} bytes", *cursor + delivered);
        }
        self.output.as_mut_slice()[*cursor..*cursor + delivered]
            .copy_from_slice(&self.carry.as_slice()[skipped..skipped + delivered]);

        *cursor += delivered;
        *left -= delivered / frame_size;
        skipped + delivered
    }
}

impl SampleReader for StreamingReader {
    fn is_seekable(&self) -> bool {
        true
    }

    fn seek(&mut self, position: i64) {
        if position < 0 {
            return;
        }

        // Rounded up so the container maps the timestamp back to `position`
        // rather than the sample before it.
        let Some(timestamp) = (position as u64)
            .checked_mul(TIME_BASE)
            .map(|t| t.div_ceil(self.specs.rate as u64))
        else {
            warn!("Seek target {} out of range, ignoring", position);
            return;
        };

        match self.container.seek(timestamp) {
            Ok(preroll) => {
                self.decoder.flush();
                self.position = position;
                self.carry_len = 0;
                self.skip_len = usize::try_from(preroll)
                    .unwrap_or(usize::MAX)
                    .saturating_mul(self.specs.frame_size());
                debug!("Seeked to sample {} ({} samples of preroll)", position, preroll);
            }
            Err(e) => {
                warn!("Seek to sample {} ignored: {}", position, e);
            }
        }
    }

    /// Remaining samples, estimated from the container duration.
    ///
    /// This is the container's total length minus the current position, not
    /// the total length.
    fn length(&self) -> i64 {
        match self.container.duration() {
            Some(duration) => {
                let total = duration as u128 * self.specs.rate as u128 / TIME_BASE as u128;
                i64::try_from(total).unwrap_or(i64::MAX) - self.position
            }
            None => -1,
        }
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn specs(&self) -> Specs {
        self.specs
    }

    fn reader_type(&self) -> ReaderType {
        ReaderType::Stream
    }

    fn read(&mut self, count: usize) -> (usize, &[u8]) {
        if count == 0 {
            return (0, &[]);
        }

        let mut left = count;
        let mut cursor = 0;

        // Bytes in the carry buffer that belong to the current packet (or the
        // previous call's surplus), and how many of them were skipped or
        // delivered.
        let mut decoded = std::mem::take(&mut self.carry_len);
        let mut used = 0;

        if decoded > 0 {
            used = self.take_decoded(decoded, &mut cursor, &mut left);
        }

        while left > 0 {
            let Some(packet) = self.container.read_packet() else {
                break;
            };

            if packet.stream_index != self.stream.index {
                continue;
            }

            decoded = self.decode_packet(&packet);
            used = self.take_decoded(decoded, &mut cursor, &mut left);
        }

        if decoded > used {
            self.carry.shift_down(used..decoded);
            self.carry_len = decoded - used;
        }

        let supplied = count - left;
        self.position += supplied as i64;

        if left > 0 {
            debug!("Short read: {} of {} samples", supplied, count);
        }

        (supplied, &self.output.as_slice()[..cursor])
    }
}

/// Round `bytes` down to a whole number of sample frames.
fn whole_frames(bytes: usize, frame_size: usize) -> usize {
    bytes - bytes % frame_size
}

impl Drop for StreamingReader {
    fn drop(&mut self) {
        debug!("Closing streaming reader at sample {}", self.position);
    }
}
