use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

const KB: u64 = 1024;

/// A MIME type string.
///
/// Two values are the same type exactly when their strings are equal. The
/// associated constants cover every type the sniffer can produce; anything
/// else enters through [`MimeType::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeType(Cow<'static, str>);

impl MimeType {
    pub const PDF: Self = Self::from_static("application/pdf");
    pub const JPEG: Self = Self::from_static("image/jpeg");
    pub const PNG: Self = Self::from_static("image/png");
    pub const GIF: Self = Self::from_static("image/gif");
    pub const WEBP: Self = Self::from_static("image/webp");
    pub const BMP: Self = Self::from_static("image/bmp");
    pub const ZIP: Self = Self::from_static("application/zip");
    pub const RAR: Self = Self::from_static("application/x-rar-compressed");
    pub const SEVEN_ZIP: Self = Self::from_static("application/x-7z-compressed");
    pub const DOC: Self = Self::from_static("application/msword");
    pub const XLS: Self = Self::from_static("application/vnd.ms-excel");
    pub const PPT: Self = Self::from_static("application/vnd.ms-powerpoint");
    pub const DOCX: Self = Self::from_static(
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    );
    pub const XLSX: Self =
        Self::from_static("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");
    pub const PPTX: Self = Self::from_static(
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    );
    pub const CSV: Self = Self::from_static("text/csv");
    pub const XML: Self = Self::from_static("text/xml");
    pub const JSON: Self = Self::from_static("application/json");
    pub const HTML: Self = Self::from_static("text/html");
    pub const PLAIN_TEXT: Self = Self::from_static("text/plain");
    pub const OCTET_STREAM: Self = Self::from_static("application/octet-stream");

    #[must_use]
    pub const fn from_static(mime: &'static str) -> Self {
        Self(Cow::Borrowed(mime))
    }

    pub fn new(mime: impl Into<String>) -> Self {
        Self(Cow::Owned(mime.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Looks up the type registered for a file extension (without the dot).
    /// Unknown extensions map to `application/octet-stream`.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        Self::declared_by_extension(extension).unwrap_or(Self::OCTET_STREAM)
    }

    /// Like [`MimeType::from_extension`] but returns `None` instead of the
    /// octet-stream fallback, so callers can tell "unknown" from "binary".
    #[must_use]
    pub fn declared_by_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        EXTENSION_TO_MIME
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, mime)| Self::from_static(mime))
    }

    /// Returns the dotted file extension for this type, `.bin` if unknown.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        MIME_TO_EXTENSION
            .iter()
            .find(|(mime, _)| *mime == self.as_str())
            .map(|(_, ext)| *ext)
            .unwrap_or(".bin")
    }

    #[must_use]
    pub fn category(&self) -> Category {
        let mime = self.as_str();
        if mime.starts_with("image/") {
            Category::Image
        } else if mime.starts_with("video/") {
            Category::Video
        } else if mime.starts_with("audio/") {
            Category::Audio
        } else if mime.starts_with("text/") {
            Category::Text
        } else if mime.contains("pdf") {
            Category::Pdf
        } else if mime.contains("zip") || mime.contains("archive") || mime.contains("compressed")
        {
            Category::Archive
        } else if mime.contains("excel") || mime.contains("spreadsheet") {
            Category::Spreadsheet
        } else if mime.contains("powerpoint") || mime.contains("presentation") {
            Category::Presentation
        } else if mime.contains("word") || mime.contains("document") {
            Category::Document
        } else {
            Category::Other
        }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.category() == Category::Image
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for MimeType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for MimeType {
    fn from(mime: &'static str) -> Self {
        Self::from_static(mime)
    }
}

impl From<String> for MimeType {
    fn from(mime: String) -> Self {
        Self::new(mime)
    }
}

impl PartialEq<str> for MimeType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for MimeType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Coarse grouping used for display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Image,
    Video,
    Audio,
    Text,
    Pdf,
    Archive,
    Document,
    Spreadsheet,
    Presentation,
    Other,
}

impl Category {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
            Self::Pdf => "PDF",
            Self::Archive => "Archive",
            Self::Document => "Document",
            Self::Spreadsheet => "Spreadsheet",
            Self::Presentation => "Presentation",
            Self::Other => "File",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const EXTENSION_TO_MIME: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("xml", "text/xml"),
    ("csv", "text/csv"),
    ("zip", "application/zip"),
    ("rar", "application/x-rar-compressed"),
    ("7z", "application/x-7z-compressed"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("flac", "audio/flac"),
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
];

const MIME_TO_EXTENSION: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/svg+xml", ".svg"),
    ("image/bmp", ".bmp"),
    ("image/x-icon", ".ico"),
    ("text/plain", ".txt"),
    ("text/html", ".html"),
    ("text/css", ".css"),
    ("text/javascript", ".js"),
    ("application/json", ".json"),
    ("text/xml", ".xml"),
    ("text/csv", ".csv"),
    ("application/pdf", ".pdf"),
    ("application/msword", ".doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".docx",
    ),
    ("application/vnd.ms-excel", ".xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".xlsx",
    ),
    ("application/vnd.ms-powerpoint", ".ppt"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".pptx",
    ),
    ("application/zip", ".zip"),
    ("application/x-rar-compressed", ".rar"),
    ("application/x-7z-compressed", ".7z"),
    ("application/x-tar", ".tar"),
    ("application/gzip", ".gz"),
    ("audio/mpeg", ".mp3"),
    ("audio/wav", ".wav"),
    ("audio/ogg", ".ogg"),
    ("audio/mp4", ".m4a"),
    ("audio/flac", ".flac"),
    ("video/mp4", ".mp4"),
    ("video/x-msvideo", ".avi"),
    ("video/quicktime", ".mov"),
    ("video/x-ms-wmv", ".wmv"),
    ("video/x-flv", ".flv"),
    ("video/webm", ".webm"),
    ("video/x-matroska", ".mkv"),
];

/// Formats a byte count with base-1024 units and at most two decimals.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KB as f64 && unit < UNITS.len() - 1 {
        value /= KB as f64;
        unit += 1;
    }

    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(MimeType::from_extension("PNG"), MimeType::PNG);
        assert_eq!(MimeType::from_extension(".Xlsx"), MimeType::XLSX);
        assert_eq!(MimeType::from_extension("nope"), MimeType::OCTET_STREAM);
        assert_eq!(MimeType::declared_by_extension("nope"), None);
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(MimeType::JPEG.extension(), ".jpg");
        assert_eq!(MimeType::new("image/jpg").extension(), ".jpg");
        assert_eq!(MimeType::PPTX.extension(), ".pptx");
        assert_eq!(MimeType::OCTET_STREAM.extension(), ".bin");
    }

    #[test]
    fn test_category() {
        assert_eq!(MimeType::PNG.category(), Category::Image);
        assert_eq!(MimeType::CSV.category(), Category::Text);
        assert_eq!(MimeType::PDF.category(), Category::Pdf);
        assert_eq!(MimeType::SEVEN_ZIP.category(), Category::Archive);
        assert_eq!(MimeType::DOCX.category(), Category::Document);
        assert_eq!(MimeType::XLS.category(), Category::Spreadsheet);
        assert_eq!(MimeType::XLSX.category(), Category::Spreadsheet);
        assert_eq!(MimeType::PPTX.category(), Category::Presentation);
        assert_eq!(MimeType::PPT.category(), Category::Presentation);
        assert_eq!(MimeType::OCTET_STREAM.category(), Category::Other);
    }

    #[test]
    fn test_owned_and_static_compare_equal() {
        assert_eq!(MimeType::new("text/csv"), MimeType::CSV);
        assert_eq!(MimeType::CSV, "text/csv");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 Bytes");
        assert_eq!(human_size(512), "512 Bytes");
        assert_eq!(human_size(1024), "1 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(human_size(1_000_000_000_000), "931.32 GB");
    }
}
