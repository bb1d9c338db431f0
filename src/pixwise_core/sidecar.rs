use crate::pixwise_core::error::{PixwiseError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Extension of the JSON description files written by the photo export.
pub const SIDECAR_EXTENSION: &str = "json";

/// Key whose presence marks a file as a genuine export sidecar.
const EXPORT_MARKER_KEY: &str = "imageViews";

/// Date format exiftool expects for UTC-implicit timestamps.
pub const UTC_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// Capture metadata recorded by the export for one media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarRecord {
    pub path: PathBuf,
    /// Unix timestamp (seconds) from `photoTakenTime.timestamp`.
    pub taken_timestamp: i64,
    /// `taken_timestamp` rendered as `YYYY:MM:DD HH:MM:SS` in UTC.
    pub taken_time_utc: String,
    pub title: Option<String>,
}

impl SidecarRecord {
    pub fn taken_at(&self) -> Result<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.taken_timestamp)
            .map_err(|e| PixwiseError::malformed_sidecar(&self.path, e.to_string()))
    }

    /// Title, if the export recorded a non-empty one.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Check if a file is a sidecar based on its extension.
pub fn is_sidecar(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SIDECAR_EXTENSION))
        .unwrap_or(false)
}

/// Path of the media file a sidecar describes.
///
/// Example: "IMG_0001.png.json" -> "IMG_0001.png"
pub fn media_path_for(sidecar_path: &Path) -> PathBuf {
    sidecar_path.with_extension("")
}

/// Load a sidecar file.
///
/// Returns `Ok(None)` for JSON files that are not export sidecars.
pub fn load_sidecar(path: &Path) -> Result<Option<SidecarRecord>> {
    let contents = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&contents)
        .map_err(|e| PixwiseError::malformed_sidecar(path, e.to_string()))?;
    parse_sidecar(path, &data)
}

/// Build a `SidecarRecord` from already-parsed sidecar JSON.
pub fn parse_sidecar(path: &Path, data: &Value) -> Result<Option<SidecarRecord>> {
    if data.get(EXPORT_MARKER_KEY).is_none() {
        log::warn!(
            "JSON data for {} does not contain {} field. Likely not an export file. Skipping.",
            path.display(),
            EXPORT_MARKER_KEY
        );
        return Ok(None);
    }

    let raw_timestamp = data
        .get("photoTakenTime")
        .and_then(|t| t.get("timestamp"))
        .ok_or_else(|| PixwiseError::malformed_sidecar(path, "missing photoTakenTime.timestamp"))?;

    let taken_timestamp = value_to_timestamp(raw_timestamp).ok_or_else(|| {
        PixwiseError::malformed_sidecar(
            path,
            format!("photoTakenTime.timestamp is not an integer: {}", raw_timestamp),
        )
    })?;

    let taken_time_utc = format_utc(taken_timestamp)
        .ok_or_else(|| PixwiseError::malformed_sidecar(path, "timestamp out of range"))?;
    log::debug!("Taken time for {}: {} ({})", path.display(), taken_timestamp, taken_time_utc);

    let title = data.get("title").and_then(Value::as_str).map(str::to_string);

    Ok(Some(SidecarRecord {
        path: path.to_path_buf(),
        taken_timestamp,
        taken_time_utc,
        title,
    }))
}

/// Exports store the timestamp as a string, but accept plain numbers too.
fn value_to_timestamp(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn format_utc(timestamp: i64) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()?
        .format(UTC_DATE_FORMAT)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn export_json(timestamp: Value) -> Value {
        json!({
            "title": "IMG_0001.png",
            "imageViews": "3",
            "photoTakenTime": { "timestamp": timestamp, "formatted": "Jan 1, 2021" }
        })
    }

    #[test]
    fn test_is_sidecar() {
        assert!(is_sidecar(Path::new("IMG_0001.png.json")));
        assert!(is_sidecar(Path::new("IMG_0001.PNG.JSON")));
        assert!(!is_sidecar(Path::new("IMG_0001.png")));
        assert!(!is_sidecar(Path::new("json")));
    }

    #[test]
    fn test_media_path_for() {
        assert_eq!(
            media_path_for(Path::new("album/IMG_0001.png.json")),
            PathBuf::from("album/IMG_0001.png")
        );
        assert_eq!(media_path_for(Path::new("metadata.json")), PathBuf::from("metadata"));
    }

    #[test]
    fn test_parse_string_timestamp() {
        let record = parse_sidecar(Path::new("a.png.json"), &export_json(json!("1609459200")))
            .unwrap()
            .unwrap();
        assert_eq!(record.taken_timestamp, 1609459200);
        assert_eq!(record.taken_time_utc, "2021:01:01 00:00:00");
        assert_eq!(record.title(), Some("IMG_0001.png"));
    }

    #[test]
    fn test_parse_numeric_timestamp() {
        let record = parse_sidecar(Path::new("a.png.json"), &export_json(json!(1700000000)))
            .unwrap()
            .unwrap();
        assert_eq!(record.taken_time_utc, "2023:11:14 22:13:20");
    }

    #[test]
    fn test_missing_marker_is_not_an_export() {
        let data = json!({ "photoTakenTime": { "timestamp": "1609459200" } });
        assert!(parse_sidecar(Path::new("metadata.json"), &data).unwrap().is_none());
    }

    #[test]
    fn test_missing_timestamp_is_malformed() {
        let data = json!({ "imageViews": "1", "title": "x" });
        let err = parse_sidecar(Path::new("a.png.json"), &data).unwrap_err();
        assert!(matches!(err, PixwiseError::MalformedSidecar { .. }));
    }

    #[test]
    fn test_non_integer_timestamp_is_malformed() {
        for bad in [json!("yesterday"), json!(1.5), json!(null)] {
            let err = parse_sidecar(Path::new("a.png.json"), &export_json(bad)).unwrap_err();
            assert!(matches!(err, PixwiseError::MalformedSidecar { .. }));
        }
    }

    #[test]
    fn test_empty_title_is_ignored() {
        let mut data = export_json(json!("1609459200"));
        data["title"] = json!("  ");
        let record = parse_sidecar(Path::new("a.png.json"), &data).unwrap().unwrap();
        assert_eq!(record.title(), None);
    }
}
