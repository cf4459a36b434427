//! Content-based file type detection
//!
//! [`classify`] runs a fixed cascade over the buffer and returns the first
//! hit: magic-byte signatures first (with container refinement for ZIP and
//! OLE), then the text heuristics, then a text-or-binary fallback. It never
//! fails and keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use b64sniff::sniff::classify;
//! use b64sniff::MimeType;
//!
//! assert_eq!(classify(b"%PDF-1.4"), MimeType::PDF);
//! assert_eq!(classify(b"name,age\nAlice,30\nBob,25\n"), MimeType::CSV);
//! assert_eq!(classify(&[]), MimeType::OCTET_STREAM);
//! ```

pub mod container;
pub mod decode;
pub mod text;

use crate::signatures::{SignatureKind, match_signature};
use crate::types::MimeType;
use tracing::debug;

pub use decode::{decode_latin1, decode_lossy, decode_strict};

/// A single step of the cascade.
pub type Classifier = fn(&[u8]) -> Option<MimeType>;

/// The cascade, in priority order.
pub const CASCADE: &[(&str, Classifier)] = &[
    ("signature", by_signature),
    ("csv", by_csv),
    ("xml", by_xml),
    ("json", by_json),
    ("html", by_html),
];

fn by_signature(data: &[u8]) -> Option<MimeType> {
    let entry = match_signature(data)?;
    debug!(signature = entry.name(), "signature matched");
    Some(match entry.kind() {
        SignatureKind::Direct(mime) => mime.clone(),
        SignatureKind::ZipContainer => container::refine_zip(data),
        SignatureKind::OleContainer => container::refine_ole(data),
    })
}

fn by_csv(data: &[u8]) -> Option<MimeType> {
    text::is_csv(data).then_some(MimeType::CSV)
}

fn by_xml(data: &[u8]) -> Option<MimeType> {
    text::is_xml(data).then_some(MimeType::XML)
}

fn by_json(data: &[u8]) -> Option<MimeType> {
    text::is_json(data).then_some(MimeType::JSON)
}

fn by_html(data: &[u8]) -> Option<MimeType> {
    text::is_html(data).then_some(MimeType::HTML)
}

fn fallback(data: &[u8]) -> MimeType {
    if !data.is_empty() && text::is_text(data) {
        MimeType::PLAIN_TEXT
    } else {
        MimeType::OCTET_STREAM
    }
}

/// Best-guess MIME type of `data`.
#[must_use]
pub fn classify(data: &[u8]) -> MimeType {
    for (step, classifier) in CASCADE {
        if let Some(mime) = classifier(data) {
            debug!(step, %mime, len = data.len(), "classified");
            return mime;
        }
    }

    let mime = fallback(data);
    debug!(step = "fallback", %mime, len = data.len(), "classified");
    mime
}

/// Returns the declared type when there is one, otherwise sniffs.
#[must_use]
pub fn resolve(declared: Option<&MimeType>, data: &[u8]) -> MimeType {
    match declared {
        Some(mime) => mime.clone(),
        None => classify(data),
    }
}
