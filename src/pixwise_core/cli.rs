use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Restore capture dates and titles from photo export sidecars into media files"
)]
pub struct Cli {
    /// Directory to scan for sidecar and media files (defaults to the current directory)
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Show what would change without writing metadata or deleting sidecars
    #[arg(long)]
    pub dry_run: bool,

    /// Do not transcribe the audio of videos
    #[arg(long)]
    pub no_transcribe: bool,

    /// Show debug output on the terminal
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable file logging to pixwise.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Directory to process, falling back to the working directory.
    pub fn directory(&self) -> std::io::Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    pub fn terminal_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
