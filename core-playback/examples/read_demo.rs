//! # Streaming Reader Example
//!
//! Opens an audio file, reads it to the end in fixed batches and reports what
//! was decoded. A second pass after `seek(0)` checks that the stream replays.
//!
//! Run with: `cargo run --example read_demo --package core-playback -- <file>`

use anyhow::{bail, Context};
use core_playback::{AudioSource, SampleReader, StreamingReader};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

const BATCH: usize = 4096;

fn drain(reader: &mut StreamingReader) -> usize {
    let mut total = 0;
    loop {
        let (supplied, _) = reader.read(BATCH);
        total += supplied;
        if supplied < BATCH {
            return total;
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )
    .context("failed to initialise logging")?;

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: read_demo <audio-file>");
    };

    let mut reader = StreamingReader::open(AudioSource::file(&path))
        .with_context(|| format!("failed to open {}", path))?;

    let specs = reader.specs();
    println!("Codec:    {:?}", reader.stream_info().codec);
    println!(
        "Specs:    {} Hz, {} channel(s), {:?} ({} bytes/frame)",
        specs.rate,
        specs.channels,
        specs.format,
        specs.frame_size()
    );
    println!("Length:   {} samples", reader.length());

    let total = drain(&mut reader);
    println!(
        "Decoded:  {} samples ({:.2}s)",
        total,
        total as f64 / specs.rate as f64
    );

    reader.seek(0);
    let replayed = drain(&mut reader);
    println!("Replayed: {} samples after seek(0)", replayed);

    Ok(())
}
