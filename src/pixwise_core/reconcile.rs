//! Decides which embedded metadata fields to fill in from an export sidecar.
//!
//! Reconciliation only ever fills gaps: a field that already holds a value in
//! the media file is never staged, so reconciling an updated file again
//! produces an empty delta.

use crate::pixwise_core::error::{PixwiseError, Result};
use crate::pixwise_core::exif::EmbeddedMetadata;
use crate::pixwise_core::media::MediaKind;
use crate::pixwise_core::sidecar::SidecarRecord;
use std::collections::BTreeMap;
use time::{OffsetDateTime, UtcOffset};

/// Creation-time tag used for PNG files (Apple convention).
pub const DATE_CREATED: &str = "DateCreated";

/// Title tag used for PNG files.
pub const TITLE: &str = "Title";

/// Date format written to `DateCreated`, e.g. `2021:01:01 03:00:00+0300`.
pub const ZONED_DATE_FORMAT: &[time::format_description::FormatItem] = time::macros::format_description!(
    "[year]:[month]:[day] [hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
);

/// Offset of Europe/Moscow, which has not observed DST since 2014.
pub const DEFAULT_OFFSET: UtcOffset = time::macros::offset!(+3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Zone capture times are converted to before being written.
    pub default_offset: UtcOffset,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            default_offset: DEFAULT_OFFSET,
        }
    }
}

/// Field updates staged for one media file, keyed by exiftool tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDelta {
    fields: BTreeMap<String, String>,
}

impl UpdateDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: &str, value: impl Into<String>) {
        self.fields.insert(tag.to_string(), value.into());
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for UpdateDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(no changes)");
        }
        let mut first = true;
        for (tag, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", tag, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Compute the fields to write into a media file from its sidecar.
pub fn reconcile(
    current: &EmbeddedMetadata,
    sidecar: &SidecarRecord,
    config: &ReconcileConfig,
) -> Result<UpdateDelta> {
    let mut delta = UpdateDelta::new();

    match current.kind() {
        MediaKind::Video => {}
        MediaKind::PngImage => reconcile_png(current, sidecar, config, &mut delta)?,
        MediaKind::Unsupported(mime) => {
            log::debug!("No reconciliation rules for {:?}", mime);
        }
    }

    Ok(delta)
}

fn reconcile_png(
    current: &EmbeddedMetadata,
    sidecar: &SidecarRecord,
    config: &ReconcileConfig,
    delta: &mut UpdateDelta,
) -> Result<()> {
    if !current.has_date_created() {
        let taken = format_in_zone(sidecar.taken_at()?, config.default_offset)
            .ok_or_else(|| PixwiseError::malformed_sidecar(&sidecar.path, "cannot format capture time"))?;
        delta.insert(DATE_CREATED, taken);
    }

    if let Some(title) = sidecar.title() {
        if current.file_name.as_deref() != Some(title) && !current.has_title() {
            // exiftool reads one argument per line.
            if has_line_break(title) {
                return Err(PixwiseError::malformed_sidecar(
                    &sidecar.path,
                    format!("title contains a line break: {:?}", title),
                ));
            }
            delta.insert(TITLE, title);
        }
    }

    Ok(())
}

pub(crate) fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

fn format_in_zone(at: OffsetDateTime, offset: UtcOffset) -> Option<String> {
    at.checked_to_offset(offset)?.format(ZONED_DATE_FORMAT).ok()
}
