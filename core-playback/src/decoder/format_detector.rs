//! # Format Detection Module
//!
//! Maps symphonia's codec and sample descriptions onto the reader's types and
//! builds probe hints.

use crate::error::{ReaderError, Result};
use crate::traits::{AudioCodec, SampleFormat};
use std::path::Path;
use symphonia::core::codecs::{CodecParameters, CodecType};
use symphonia::core::probe::Hint;
use symphonia::core::sample::SampleFormat as SymphoniaSampleFormat;
use tracing::{debug, warn};

/// Format detector for audio streams.
///
/// Generates hints for symphonia's probe and translates probed codec
/// parameters into [`AudioCodec`] and [`SampleFormat`].
pub struct FormatDetector;

impl FormatDetector {
    /// Create a probe hint from a file path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_playback::decoder::FormatDetector;
    /// use std::path::Path;
    ///
    /// let hint = FormatDetector::hint_from_path(Path::new("/music/song.flac"));
    /// // Hint will contain extension "flac"
    /// ```
    pub fn hint_from_path(path: &Path) -> Hint {
        let mut hint = Hint::new();

        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            debug!("Setting probe hint extension: {}", extension);
            hint.with_extension(extension);
        } else {
            debug!("No file extension found, probe will auto-detect");
        }

        hint
    }

    /// Create a probe hint from an optional codec hint.
    pub fn hint_from_codec(codec: Option<&AudioCodec>) -> Hint {
        let mut hint = Hint::new();

        if let Some(codec) = codec {
            hint.with_extension(Self::codec_extension(codec));
            hint.mime_type(Self::codec_mime_type(codec));
        }

        hint
    }

    /// Detect audio codec from symphonia codec type.
    pub fn detect_codec(codec_type: CodecType) -> AudioCodec {
        use symphonia::core::codecs::*;

        if codec_type == CODEC_TYPE_MP3 {
            AudioCodec::Mp3
        } else if codec_type == CODEC_TYPE_AAC {
            AudioCodec::Aac
        } else if codec_type == CODEC_TYPE_FLAC {
            AudioCodec::Flac
        } else if codec_type == CODEC_TYPE_VORBIS {
            AudioCodec::Vorbis
        } else if codec_type == CODEC_TYPE_OPUS {
            AudioCodec::Opus
        } else if codec_type == CODEC_TYPE_ALAC {
            AudioCodec::Alac
        } else if [
            CODEC_TYPE_PCM_U8,
            CODEC_TYPE_PCM_S8,
            CODEC_TYPE_PCM_S16LE,
            CODEC_TYPE_PCM_S16BE,
            CODEC_TYPE_PCM_S24LE,
            CODEC_TYPE_PCM_S24BE,
            CODEC_TYPE_PCM_S32LE,
            CODEC_TYPE_PCM_S32BE,
            CODEC_TYPE_PCM_F32LE,
            CODEC_TYPE_PCM_F32BE,
            CODEC_TYPE_PCM_F64LE,
            CODEC_TYPE_PCM_F64BE,
            CODEC_TYPE_PCM_ALAW,
            CODEC_TYPE_PCM_MULAW,
        ]
        .contains(&codec_type)
        {
            AudioCodec::Pcm
        } else {
            warn!("Unknown codec type: {:?}", codec_type);
            AudioCodec::Unknown
        }
    }

    /// PCM format a stream decodes to.
    ///
    /// The declared sample format wins; otherwise it is inferred from the bit
    /// depth. Codecs that declare neither (the lossy ones) decode to `F32`.
    /// Returns `None` for layouts with no PCM counterpart (signed 8-bit,
    /// unsigned wider than 8 bits, odd bit depths).
    pub fn sample_format(params: &CodecParameters) -> Option<SampleFormat> {
        if let Some(format) = params.sample_format {
            return Self::map_sample_format(format);
        }

        match params.bits_per_sample {
            Some(8) => Some(SampleFormat::U8),
            Some(16) => Some(SampleFormat::S16),
            Some(24) => Some(SampleFormat::S24),
            Some(32) => Some(SampleFormat::S32),
            Some(bits) => {
                debug!("No PCM format for {} bits per sample", bits);
                None
            }
            None => Some(SampleFormat::F32),
        }
    }

    fn map_sample_format(format: SymphoniaSampleFormat) -> Option<SampleFormat> {
        match format {
            SymphoniaSampleFormat::U8 => Some(SampleFormat::U8),
            SymphoniaSampleFormat::S16 => Some(SampleFormat::S16),
            SymphoniaSampleFormat::S24 => Some(SampleFormat::S24),
            SymphoniaSampleFormat::S32 => Some(SampleFormat::S32),
            SymphoniaSampleFormat::F32 => Some(SampleFormat::F32),
            SymphoniaSampleFormat::F64 => Some(SampleFormat::F64),
            other => {
                debug!("No PCM format for {:?}", other);
                None
            }
        }
    }

    /// Validate that a decoder for `codec` was compiled in.
    ///
    /// Codecs without a feature flag of their own (ADPCM and other
    /// [`AudioCodec::Unknown`] streams) pass; the codec registry decides
    /// whether it can decode them.
    ///
    /// # Errors
    ///
    /// [`ReaderError::DecoderUnavailable`] if the codec's feature flag is
    /// disabled.
    pub fn validate_codec_support(codec: &AudioCodec) -> Result<()> {
        let (enabled, feature) = match codec {
            AudioCodec::Mp3 => (cfg!(feature = "decoder-mp3"), "decoder-mp3"),
            AudioCodec::Flac => (cfg!(feature = "decoder-flac"), "decoder-flac"),
            AudioCodec::Vorbis => (cfg!(feature = "decoder-vorbis"), "decoder-vorbis"),
            AudioCodec::Opus => (cfg!(feature = "decoder-opus"), "decoder-opus"),
            AudioCodec::Aac => (cfg!(feature = "decoder-aac"), "decoder-aac"),
            AudioCodec::Pcm => (cfg!(feature = "decoder-wav"), "decoder-wav"),
            AudioCodec::Alac => (cfg!(feature = "decoder-alac"), "decoder-alac"),
            AudioCodec::Unknown => return Ok(()),
        };

        if enabled {
            Ok(())
        } else {
            Err(ReaderError::DecoderUnavailable(format!(
                "{:?} decoder not enabled. Enable '{}' feature",
                codec, feature
            )))
        }
    }

    /// Get the common file extension for a codec.
    pub fn codec_extension(codec: &AudioCodec) -> &'static str {
        match codec {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Aac => "m4a",
            AudioCodec::Flac => "flac",
            AudioCodec::Vorbis => "ogg",
            AudioCodec::Opus => "opus",
            AudioCodec::Pcm => "wav",
            AudioCodec::Alac => "m4a",
            AudioCodec::Unknown => "bin",
        }
    }

    /// Get the MIME type for a codec.
    pub fn codec_mime_type(codec: &AudioCodec) -> &'static str {
        match codec {
            AudioCodec::Mp3 => "audio/mpeg",
            AudioCodec::Aac => "audio/mp4",
            AudioCodec::Flac => "audio/flac",
            AudioCodec::Vorbis => "audio/ogg",
            AudioCodec::Opus => "audio/opus",
            AudioCodec::Pcm => "audio/wav",
            AudioCodec::Alac => "audio/mp4",
            AudioCodec::Unknown => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::codecs::{CODEC_TYPE_FLAC, CODEC_TYPE_NULL, CODEC_TYPE_PCM_S16LE};

    fn params(format: Option<SymphoniaSampleFormat>, bits: Option<u32>) -> CodecParameters {
        let mut params = CodecParameters::new();
        if let Some(format) = format {
            params.with_sample_format(format);
        }
        if let Some(bits) = bits {
            params.with_bits_per_sample(bits);
        }
        params
    }

    #[test]
    fn test_detect_codec() {
        assert_eq!(FormatDetector::detect_codec(CODEC_TYPE_FLAC), AudioCodec::Flac);
        assert_eq!(FormatDetector::detect_codec(CODEC_TYPE_PCM_S16LE), AudioCodec::Pcm);
        assert_eq!(FormatDetector::detect_codec(CODEC_TYPE_NULL), AudioCodec::Unknown);
    }

    #[test]
    fn test_declared_sample_format_wins() {
        let p = params(Some(SymphoniaSampleFormat::F64), Some(16));
        assert_eq!(FormatDetector::sample_format(&p), Some(SampleFormat::F64));
    }

    #[test]
    fn test_sample_format_from_bit_depth() {
        assert_eq!(FormatDetector::sample_format(&params(None, Some(8))), Some(SampleFormat::U8));
        assert_eq!(FormatDetector::sample_format(&params(None, Some(16))), Some(SampleFormat::S16));
        assert_eq!(FormatDetector::sample_format(&params(None, Some(24))), Some(SampleFormat::S24));
        assert_eq!(FormatDetector::sample_format(&params(None, Some(32))), Some(SampleFormat::S32));
        assert_eq!(FormatDetector::sample_format(&params(None, Some(12))), None);
        assert_eq!(FormatDetector::sample_format(&params(None, None)), Some(SampleFormat::F32));
    }

    #[test]
    fn test_unrepresentable_sample_formats() {
        for format in [
            SymphoniaSampleFormat::S8,
            SymphoniaSampleFormat::U16,
            SymphoniaSampleFormat::U24,
            SymphoniaSampleFormat::U32,
        ] {
            assert_eq!(FormatDetector::sample_format(&params(Some(format), None)), None);
        }
    }

    #[test]
    fn test_codec_extension() {
        assert_eq!(FormatDetector::codec_extension(&AudioCodec::Mp3), "mp3");
        assert_eq!(FormatDetector::codec_extension(&AudioCodec::Vorbis), "ogg");
        assert_eq!(FormatDetector::codec_extension(&AudioCodec::Pcm), "wav");
        assert_eq!(FormatDetector::codec_mime_type(&AudioCodec::Flac), "audio/flac");
    }

    #[test]
    fn test_codec_validation() {
        assert_eq!(
            FormatDetector::validate_codec_support(&AudioCodec::Flac).is_ok(),
            cfg!(feature = "decoder-flac")
        );
    }

    #[test]
    fn test_codecs_without_feature_defer_to_registry() {
        use symphonia::core::codecs::CODEC_TYPE_ADPCM_IMA_WAV;

        let codec = FormatDetector::detect_codec(CODEC_TYPE_ADPCM_IMA_WAV);
        assert_eq!(codec, AudioCodec::Unknown);
        assert!(FormatDetector::validate_codec_support(&codec).is_ok());
        assert!(symphonia::default::get_codecs()
            .get_codec(CODEC_TYPE_ADPCM_IMA_WAV)
            .is_some());
    }

    #[test]
    fn test_hints_do_not_panic() {
        let _ = FormatDetector::hint_from_path(Path::new("/music/song.mp3"));
        let _ = FormatDetector::hint_from_path(Path::new("/music/no_extension"));
        let _ = FormatDetector::hint_from_codec(Some(&AudioCodec::Flac));
        let _ = FormatDetector::hint_from_codec(None);
    }
}
