use crate::pixwise_core::error::{PixwiseError, Result};
use crate::pixwise_core::media::MediaKind;
use crate::pixwise_core::reconcile::{UpdateDelta, has_line_break};
use exiftool::ExifTool;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Raw exiftool output. Tag values can come back as strings or numbers
/// (a title of "2021" is emitted as a number), so they stay as `Value`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct RawExifInfo {
    #[serde(rename = "MIMEType", default)]
    mime_type: Option<Value>,
    #[serde(default)]
    date_created: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    file_name: Option<Value>,
}

/// Embedded metadata of interest, as currently stored in a media file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedMetadata {
    pub mime_type: String,
    pub date_created: Option<String>,
    pub title: Option<String>,
    pub file_name: Option<String>,
}

impl EmbeddedMetadata {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime_type)
    }

    pub fn has_date_created(&self) -> bool {
        is_present(self.date_created.as_deref())
    }

    pub fn has_title(&self) -> bool {
        is_present(self.title.as_deref())
    }
}

impl From<RawExifInfo> for EmbeddedMetadata {
    fn from(raw: RawExifInfo) -> Self {
        EmbeddedMetadata {
            mime_type: raw.mime_type.as_ref().and_then(value_to_string).unwrap_or_default(),
            date_created: raw.date_created.as_ref().and_then(value_to_string),
            title: raw.title.as_ref().and_then(value_to_string),
            file_name: raw.file_name.as_ref().and_then(value_to_string),
        }
    }
}

fn is_present(field: Option<&str>) -> bool {
    field.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Helper to extract String from Value (handles both string and number)
fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads and writes embedded metadata of media files.
pub trait MetadataTool {
    fn read_metadata(&mut self, path: &Path) -> Result<EmbeddedMetadata>;

    fn write_metadata(&mut self, path: &Path, delta: &UpdateDelta) -> Result<()>;
}

/// `MetadataTool` backed by a long-running exiftool process.
///
/// The process is started on first use, so runs that never touch a media
/// file do not require exiftool to be installed.
#[derive(Default)]
pub struct ExifToolBackend {
    exiftool: Option<ExifTool>,
}

impl ExifToolBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut ExifTool> {
        if self.exiftool.is_none() {
            let exiftool = ExifTool::new().map_err(|e| PixwiseError::Exiftool(e.to_string()))?;
            self.exiftool = Some(exiftool);
        }
        self.exiftool
            .as_mut()
            .ok_or_else(|| PixwiseError::Exiftool("exiftool not running".to_string()))
    }
}

impl MetadataTool for ExifToolBackend {
    fn read_metadata(&mut self, path: &Path) -> Result<EmbeddedMetadata> {
        let raw: RawExifInfo = self.handle()?.read_metadata(path, &[]).map_err(|e| {
            PixwiseError::MetadataExtraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(raw.into())
    }

    fn write_metadata(&mut self, path: &Path, delta: &UpdateDelta) -> Result<()> {
        if delta.is_empty() {
            return Ok(());
        }

        let args = write_args(path, delta)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        self.handle()?
            .execute_raw(&args)
            .map_err(|e| PixwiseError::MetadataWrite {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// One `-Tag=value` argument per staged field, then the target file.
///
/// The stay-open protocol is line based, so no argument may span lines.
fn write_args(path: &Path, delta: &UpdateDelta) -> Result<Vec<String>> {
    let write_error = |reason: String| PixwiseError::MetadataWrite {
        path: path.to_path_buf(),
        reason,
    };

    let path_str = path
        .to_str()
        .ok_or_else(|| write_error("path is not valid UTF-8".to_string()))?;
    if has_line_break(path_str) {
        return Err(write_error("path contains a line break".to_string()));
    }

    let mut args = Vec::with_capacity(delta.len() + 2);
    for (tag, value) in delta.iter() {
        if has_line_break(tag) || has_line_break(value) {
            return Err(write_error(format!("{} value contains a line break", tag)));
        }
        args.push(format!("-{}={}", tag, value));
    }
    args.push("-overwrite_original".to_string());
    args.push(path_str.to_string());
    Ok(args)
}

/// Check if exiftool is available on the system.
pub fn exiftool_available() -> bool {
    std::process::Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
