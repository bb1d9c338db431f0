/// Media kinds with reconciliation rules, keyed by the MIME type exiftool reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    /// `video/mp4`
    Video,
    /// `image/png`
    PngImage,
    /// Any other MIME type. No rules apply.
    Unsupported(String),
}

impl MediaKind {
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "video/mp4" => MediaKind::Video,
            "image/png" => MediaKind::PngImage,
            other => MediaKind::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaKind::Video => "video/mp4",
            MediaKind::PngImage => "image/png",
            MediaKind::Unsupported(mime) => mime,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Video)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
