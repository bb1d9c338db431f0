pub mod cli;
pub mod error;
pub mod exif;
pub mod media;
pub mod reconcile;
pub mod sidecar;
pub mod transcribe;
pub mod updater;

pub use cli::Cli;
pub use error::PixwiseError;
pub use exif::{EmbeddedMetadata, ExifToolBackend, MetadataTool};
pub use media::MediaKind;
pub use reconcile::{ReconcileConfig, UpdateDelta, reconcile};
pub use sidecar::{SidecarRecord, load_sidecar};
pub use transcribe::{Transcriber, WhisperTranscriber};
pub use updater::{SidecarOutcome, UpdateStats, Updater};
