use crate::pixwise_core::error::{PixwiseError, Result};
use crate::pixwise_core::exif::{EmbeddedMetadata, MetadataTool};
use crate::pixwise_core::reconcile::{ReconcileConfig, UpdateDelta, reconcile};
use crate::pixwise_core::sidecar::{is_sidecar, load_sidecar, media_path_for};
use crate::pixwise_core::transcribe::Transcriber;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What happened to a single sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidecarOutcome {
    /// JSON file without the export marker; left untouched.
    NotExport,
    /// No media file next to the sidecar.
    Orphan,
    /// The media file's metadata could not be read; sidecar kept.
    Unreadable,
    /// Metadata reconciled. The delta may be empty.
    Reconciled { media_path: PathBuf, delta: UpdateDelta },
}

/// Counters for a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateStats {
    pub sidecars_found: usize,
    pub not_exports: usize,
    pub malformed: usize,
    pub unreadable: usize,
    pub media_updated: usize,
    pub media_unchanged: usize,
    pub orphans: usize,
    pub sidecars_deleted: usize,
    pub failures: usize,
}

/// Find every sidecar under `root`, sorted by path.
pub fn find_sidecars(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(PixwiseError::NotADirectory(root.to_path_buf()));
    }

    let sidecars = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_sidecar(e.path()))
        .map(|e| e.into_path())
        .collect();

    Ok(sidecars)
}

/// Line printed for a media file in dry-run mode.
fn dry_run_report(media_path: &Path, delta: &UpdateDelta) -> String {
    if delta.is_empty() {
        format!("DRY RUN: {} would not change", media_path.display())
    } else {
        format!("DRY RUN: {} would be updated: {}", media_path.display(), delta)
    }
}

/// Applies export sidecars to the media files they describe.
pub struct Updater {
    tool: Box<dyn MetadataTool>,
    transcriber: Option<Box<dyn Transcriber>>,
    config: ReconcileConfig,
    dry_run: bool,
}

impl Updater {
    pub fn new(tool: Box<dyn MetadataTool>, config: ReconcileConfig, dry_run: bool) -> Self {
        Updater {
            tool,
            transcriber: None,
            config,
            dry_run,
        }
    }

    /// Transcribe the audio of every video encountered.
    pub fn with_transcriber(mut self, transcriber: Box<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Process every sidecar under `root`.
    ///
    /// Failures of individual files are logged and counted; only an invalid
    /// root aborts the run.
    pub fn run(&mut self, root: &Path) -> Result<UpdateStats> {
        if self.dry_run {
            println!("DRY RUN: no metadata will be written and no files deleted");
        }

        let sidecars = find_sidecars(root)?;
        log::info!("Found {} sidecar candidates under {}", sidecars.len(), root.display());

        let mut stats = UpdateStats {
            sidecars_found: sidecars.len(),
            ..Default::default()
        };

        for sidecar_path in &sidecars {
            log::info!("Processing {}", sidecar_path.display());
            match self.process_sidecar(sidecar_path) {
                Ok(outcome) => self.record(&mut stats, &outcome),
                Err(e @ PixwiseError::MalformedSidecar { .. }) => {
                    log::error!("{}. Skipping.", e);
                    stats.malformed += 1;
                }
                Err(e) => {
                    log::error!("Failed to process {}: {}", sidecar_path.display(), e);
                    stats.failures += 1;
                }
            }
        }

        Ok(stats)
    }

    fn record(&self, stats: &mut UpdateStats, outcome: &SidecarOutcome) {
        match outcome {
            SidecarOutcome::NotExport => stats.not_exports += 1,
            SidecarOutcome::Unreadable => stats.unreadable += 1,
            SidecarOutcome::Orphan => {
                stats.orphans += 1;
                if !self.dry_run {
                    stats.sidecars_deleted += 1;
                }
            }
            SidecarOutcome::Reconciled { delta, .. } => {
                if delta.is_empty() {
                    stats.media_unchanged += 1;
                } else {
                    stats.media_updated += 1;
                }
                if !self.dry_run {
                    stats.sidecars_deleted += 1;
                }
            }
        }
    }

    /// Load, reconcile and apply a single sidecar.
    pub fn process_sidecar(&mut self, sidecar_path: &Path) -> Result<SidecarOutcome> {
        let Some(sidecar) = load_sidecar(sidecar_path)? else {
            log::warn!("Skipping {}", sidecar_path.display());
            return Ok(SidecarOutcome::NotExport);
        };

        let media_path = media_path_for(sidecar_path);
        if !media_path.is_file() {
            log::info!(
                "No corresponding media file for {}. Deleting sidecar.",
                sidecar_path.display()
            );
            self.remove_sidecar(sidecar_path)?;
            return Ok(SidecarOutcome::Orphan);
        }

        let Some(current) = self.read_current(&media_path) else {
            log::warn!("Could not retrieve any metadata for {}", media_path.display());
            return Ok(SidecarOutcome::Unreadable);
        };
        log::debug!("Current metadata for {}: {:?}", media_path.display(), current);
        log::debug!("Sidecar data for {}: {:?}", sidecar_path.display(), sidecar);

        let delta = reconcile(&current, &sidecar, &self.config)?;
        log::info!("Update metadata for {}: {}", media_path.display(), delta);

        if self.dry_run {
            println!("{}", dry_run_report(&media_path, &delta));
        } else if delta.is_empty() {
            log::info!("No metadata to update for {}", media_path.display());
        } else {
            log::info!("Updating metadata for {}", media_path.display());
            self.tool.write_metadata(&media_path, &delta)?;
        }
        self.remove_sidecar(sidecar_path)?;

        Ok(SidecarOutcome::Reconciled { media_path, delta })
    }

    /// Read embedded metadata, transcribing videos along the way.
    fn read_current(&mut self, media_path: &Path) -> Option<EmbeddedMetadata> {
        let current = match self.tool.read_metadata(media_path) {
            Ok(current) => current,
            Err(e) => {
                log::warn!("Error retrieving metadata: {}", e);
                return None;
            }
        };

        if current.kind().is_video() {
            if let Some(transcriber) = &self.transcriber {
                match transcriber.transcribe(media_path) {
                    Ok(text) => log::info!("Transcript of {}: {}", media_path.display(), text),
                    Err(e) => log::warn!("Could not transcribe {}: {}", media_path.display(), e),
                }
            }
        }

        Some(current)
    }

    fn remove_sidecar(&self, sidecar_path: &Path) -> Result<()> {
        if self.dry_run {
            println!("DRY RUN: would delete {}", sidecar_path.display());
            return Ok(());
        }
        log::info!("Deleting sidecar {}", sidecar_path.display());
        fs::remove_file(sidecar_path)?;
        Ok(())
    }
}
