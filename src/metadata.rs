//! Derived metadata for a decoded buffer
//!
//! Computed after classification and never fed back into it.

use crate::types::MimeType;
use memchr::memmem::Finder;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use tracing::debug;

static PAGE_MARKER: LazyLock<Finder<'static>> = LazyLock::new(|| Finder::new(b"/Page"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
}

impl Metadata {
    /// Hash for every file, dimensions for images, a page estimate for PDFs.
    pub fn derive(mime: &MimeType, data: &[u8]) -> Self {
        let mut metadata = Self {
            sha256: sha256_hex(data),
            ..Default::default()
        };

        if mime.is_image() {
            if let Some((width, height)) = image_dimensions(data) {
                metadata.width = Some(width);
                metadata.height = Some(height);
            } else {
                debug!(%mime, "image dimensions unavailable");
            }
        }

        if *mime == MimeType::PDF {
            metadata.page_count = estimate_pdf_pages(data);
        }

        metadata
    }
}

#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[must_use]
pub fn image_dimensions(data: &[u8]) -> Option<(usize, usize)> {
    imagesize::blob_size(data)
        .ok()
        .map(|size| (size.width, size.height))
}

/// Rough page count: occurrences of `/Page` followed by whitespace.
/// `/Pages` tree nodes are not counted.
#[must_use]
pub fn estimate_pdf_pages(data: &[u8]) -> Option<usize> {
    let count = PAGE_MARKER
        .find_iter(data)
        .filter(|&pos| {
            data.get(pos + b"/Page".len())
                .is_some_and(|&b| matches!(b, b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | b' ' | 0xA0))
        })
        .count();
    (count > 0).then_some(count)
}
