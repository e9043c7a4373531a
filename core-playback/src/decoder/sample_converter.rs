//! # Sample Format Converter
//!
//! Converts symphonia's planar decode output to interleaved PCM bytes.

use crate::traits::SampleFormat;
use symphonia::core::audio::{AudioBufferRef, RawSample, RawSampleBuffer};
use symphonia::core::conv::ConvertibleSample;
use symphonia::core::sample::i24;

/// Converts decoded audio into the reader's output layout.
///
/// Symphonia hands out planar buffers in whatever sample type the codec
/// produced (i16, i24, i32, f32, ...). The reader delivers interleaved frames
/// in one fixed [`SampleFormat`] per stream, in native byte order.
pub struct SampleConverter;

impl SampleConverter {
    /// Interleave `decoded`, convert it to `format` and append the bytes to
    /// `out`.
    ///
    /// Returns the number of bytes appended.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let decoded = decoder.decode(&packet)?;
    /// SampleConverter::append_interleaved(decoded, SampleFormat::S16, &mut staged);
    /// ```
    pub fn append_interleaved(
        decoded: AudioBufferRef<'_>,
        format: SampleFormat,
        out: &mut Vec<u8>,
    ) -> usize {
        match format {
            SampleFormat::U8 => Self::append_as::<u8>(decoded, out),
            SampleFormat::S16 => Self::append_as::<i16>(decoded, out),
            SampleFormat::S24 => Self::append_as::<i24>(decoded, out),
            SampleFormat::S32 => Self::append_as::<i32>(decoded, out),
            SampleFormat::F32 => Self::append_as::<f32>(decoded, out),
            SampleFormat::F64 => Self::append_as::<f64>(decoded, out),
        }
    }

    fn append_as<S>(decoded: AudioBufferRef<'_>, out: &mut Vec<u8>) -> usize
    where
        S: ConvertibleSample + RawSample,
    {
        if decoded.frames() == 0 {
            return 0;
        }

        let spec = *decoded.spec();
        let mut raw = RawSampleBuffer::<S>::new(decoded.capacity() as u64, spec);
        raw.copy_interleaved_ref(decoded);

        let bytes = raw.as_bytes();
        out.extend_from_slice(bytes);
        bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::audio::{AsAudioBufferRef, AudioBuffer, Channels, Signal, SignalSpec};

    fn stereo_i16(left: &[i16], right: &[i16]) -> AudioBuffer<i16> {
        let spec = SignalSpec::new(44100, Channels::FRONT_LEFT | Channels::FRONT_RIGHT);
        let mut buffer = AudioBuffer::<i16>::new(left.len() as u64, spec);
        buffer.render_reserved(Some(left.len()));
        buffer.chan_mut(0).copy_from_slice(left);
        buffer.chan_mut(1).copy_from_slice(right);
        buffer
    }

    #[test]
    fn test_interleaves_planar_input() {
        let buffer = stereo_i16(&[1, 2], &[3, 4]);
        let mut out = Vec::new();

        let appended =
            SampleConverter::append_interleaved(buffer.as_audio_buffer_ref(), SampleFormat::S16, &mut out);

        assert_eq!(appended, 8);
        let samples: Vec<i16> = out
            .chunks_exact(2)
            .map(|b| i16::from_ne_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_converts_to_float() {
        let buffer = stereo_i16(&[16384], &[-16384]);
        let mut out = Vec::new();

        SampleConverter::append_interleaved(buffer.as_audio_buffer_ref(), SampleFormat::F32, &mut out);

        let samples: Vec<f32> = out
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(samples, vec![0.5, -0.5]);
    }

    #[test]
    fn test_appends_after_existing_bytes() {
        let buffer = stereo_i16(&[7], &[8]);
        let mut out = vec![0xAA];

        SampleConverter::append_interleaved(buffer.as_audio_buffer_ref(), SampleFormat::S24, &mut out);

        assert_eq!(out.len(), 1 + 2 * 3);
        assert_eq!(out[0], 0xAA);
    }

    #[test]
    fn test_empty_buffer_appends_nothing() {
        let spec = SignalSpec::new(48000, Channels::FRONT_LEFT);
        let buffer = AudioBuffer::<f32>::new(64, spec);
        let mut out = Vec::new();

        let appended =
            SampleConverter::append_interleaved(buffer.as_audio_buffer_ref(), SampleFormat::F32, &mut out);
        assert_eq!(appended, 0);
        assert!(out.is_empty());
    }
}
