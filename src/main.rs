use anyhow::Result;
use clap::Parser;
use pixwise::pixwise_core::exif::exiftool_available;
use pixwise::pixwise_core::transcribe::ffmpeg_available;
use pixwise::pixwise_core::{Cli, ExifToolBackend, ReconcileConfig, Updater, WhisperTranscriber};
use simplelog::{CombinedLogger, Config, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        cli.terminal_level(),
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("pixwise.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let directory = cli.directory()?;
    log::debug!(
        "exiftool available: {}, ffmpeg available: {}",
        exiftool_available(),
        ffmpeg_available()
    );

    let mut updater = Updater::new(
        Box::new(ExifToolBackend::new()),
        ReconcileConfig::default(),
        cli.dry_run,
    );

    if !cli.no_transcribe {
        match WhisperTranscriber::from_env()? {
            Some(transcriber) => updater = updater.with_transcriber(Box::new(transcriber)),
            None => log::warn!("OPENAI_API_KEY is not set; videos will not be transcribed"),
        }
    }

    let stats = updater.run(&directory)?;

    println!("\nProcessed {} sidecars in {}", stats.sidecars_found, directory.display());
    println!("  {} media files updated", stats.media_updated);
    println!("  {} media files already up to date", stats.media_unchanged);
    println!("  {} orphaned sidecars", stats.orphans);
    println!("  {} sidecars deleted", stats.sidecars_deleted);
    if stats.not_exports > 0 {
        println!("  {} non-export JSON files skipped", stats.not_exports);
    }
    if stats.malformed > 0 {
        println!("  {} malformed sidecars skipped", stats.malformed);
    }
    if stats.unreadable > 0 {
        println!("  {} media files with unreadable metadata", stats.unreadable);
    }
    if stats.failures > 0 {
        println!("  {} failures", stats.failures);
    }

    Ok(())
}
