#![cfg(feature = "decoder-wav")]

use bytes::Bytes;
use core_playback::{
    AudioCodec, AudioSource, ReaderError, SampleFormat, SampleReader, StreamingReader,
};

const RATE: u32 = 44_100;
const CHANNELS: u16 = 2;

/// 16-bit PCM WAV whose frame `i` holds `i % 30000` on the left channel and
/// its negation on the right.
fn wav_bytes(frames: u32) -> Vec<u8> {
    let block_align = CHANNELS as u32 * 2;
    let data_len = frames * block_align;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&RATE.to_le_bytes());
    wav.extend_from_slice(&(RATE * block_align).to_le_bytes());
    wav.extend_from_slice(&(block_align as u16).to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..frames {
        let sample = (i % 30_000) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
        wav.extend_from_slice(&(-sample).to_le_bytes());
    }

    wav
}

fn wav_source(frames: u32) -> AudioSource {
    AudioSource::CachedChunk {
        data: Bytes::from(wav_bytes(frames)),
        codec_hint: Some(AudioCodec::Pcm),
    }
}

fn left_channel(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(4)
        .map(|frame| i16::from_ne_bytes([frame[0], frame[1]]))
        .collect()
}

#[test]
fn test_wav_specs() {
    let reader = StreamingReader::open(wav_source(1000)).unwrap();
    let specs = reader.specs();

    assert_eq!(specs.channels, 2);
    assert_eq!(specs.rate, RATE);
    assert_eq!(specs.format, SampleFormat::S16);
    assert_eq!(reader.stream_info().codec, AudioCodec::Pcm);
    assert_eq!(reader.length(), 1000);
}

#[test]
fn test_wav_reads_every_sample() {
    let total = 100_000;
    let mut reader = StreamingReader::open(wav_source(total)).unwrap();

    let mut supplied_total = 0;
    let mut left = Vec::new();
    loop {
        let (supplied, bytes) = reader.read(4096);
        assert_eq!(bytes.len(), supplied * 4);
        left.extend(left_channel(bytes));
        supplied_total += supplied;
        if supplied < 4096 {
            break;
        }
    }

    assert_eq!(supplied_total, total as usize);
    assert_eq!(reader.position(), total as i64);
    assert_eq!(reader.length(), 0);

    let expected: Vec<i16> = (0..total).map(|i| (i % 30_000) as i16).collect();
    assert_eq!(left, expected);
}

#[test]
fn test_wav_seek_to_start() {
    let mut reader = StreamingReader::open(wav_source(20_000)).unwrap();

    let (_, first) = reader.read(1000);
    let first = first.to_vec();

    reader.read(5000);
    reader.seek(0);
    assert_eq!(reader.position(), 0);

    let (supplied, again) = reader.read(1000);
    assert_eq!(supplied, 1000);
    assert_eq!(again, first.as_slice());
}

#[test]
fn test_wav_seek_inside_packet() {
    let mut reader = StreamingReader::open(wav_source(50_000)).unwrap();

    reader.read(777);
    reader.seek(12_345);
    assert_eq!(reader.position(), 12_345);

    let (supplied, bytes) = reader.read(3);
    assert_eq!(supplied, 3);
    assert_eq!(left_channel(bytes), vec![12_345, 12_346, 12_347]);
    assert_eq!(reader.position(), 12_348);
    assert_eq!(reader.length(), 50_000 - 12_348);
}

#[test]
fn test_wav_seek_then_drain() {
    let mut reader = StreamingReader::open(wav_source(20_000)).unwrap();
    reader.seek(7_001);

    let mut left = Vec::new();
    loop {
        let (supplied, bytes) = reader.read(4096);
        left.extend(left_channel(bytes));
        if supplied < 4096 {
            break;
        }
    }

    let expected: Vec<i16> = (7_001..20_000).map(|i| i as i16).collect();
    assert_eq!(left, expected);
    assert_eq!(reader.position(), 20_000);
}

#[test]
fn test_garbage_bytes_fail_to_open() {
    let source = AudioSource::CachedChunk {
        data: Bytes::from_static(b"definitely not an audio container"),
        codec_hint: None,
    };

    assert!(matches!(
        StreamingReader::open(source),
        Err(ReaderError::SourceOpen(_))
    ));
}
