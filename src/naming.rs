use crate::error::{CodecError, Result};
use crate::history::Operation;
use crate::types::MimeType;
use chrono::{DateTime, Utc};

/// Text after the last dot, or `""` when there is none. A leading dot
/// (`.bashrc`) does not start an extension.
#[must_use]
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}

/// Name for a conversion result, e.g. `decoded-2024-05-01T09-30-00.png`.
#[must_use]
pub fn generate_file_name(mime: &MimeType, operation: Operation, now: DateTime<Utc>) -> String {
    format!(
        "{}d-{}{}",
        operation,
        now.format("%Y-%m-%dT%H-%M-%S"),
        mime.extension()
    )
}

/// Name given to bytes decoded from pasted base64.
#[must_use]
pub fn decoded_file_name(mime: &MimeType) -> String {
    format!("decoded-file{}", mime.extension())
}

/// Applies a user-chosen name while keeping the original extension.
pub fn rename_preserving_extension(original: &str, new_name: &str) -> Result<String> {
    if new_name.trim().is_empty() {
        return Err(CodecError::InvalidName("file name cannot be empty".to_string()));
    }

    let extension = file_extension(original);
    if extension.is_empty() {
        return Ok(new_name.to_string());
    }

    let suffix = format!(".{extension}");
    if new_name.ends_with(&suffix) {
        Ok(new_name.to_string())
    } else {
        Ok(format!("{new_name}{suffix}"))
    }
}
