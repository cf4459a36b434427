//! Magic-byte signatures
//!
//! The ordered table of leading byte sequences that identify binary formats.
//! Two entries (ZIP and OLE) only identify a container; the sniffer refines
//! those by looking inside.

use crate::types::MimeType;

/// A single term of a signature pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteMatch {
    Exact(u8),
    Any,
}

impl ByteMatch {
    #[inline]
    #[must_use]
    pub const fn accepts(&self, byte: u8) -> bool {
        match self {
            Self::Exact(expected) => *expected == byte,
            Self::Any => true,
        }
    }
}

macro_rules! byte_match {
    (_) => {
        ByteMatch::Any
    };
    ($b:literal) => {
        ByteMatch::Exact($b)
    };
}

/// Builds a `&'static [ByteMatch]` from hex literals, `_` standing for any byte.
macro_rules! pattern {
    ($($t:tt),* $(,)?) => {
        &[$(byte_match!($t)),*]
    };
}

/// A byte pattern anchored at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pattern: &'static [ByteMatch],
    offset: usize,
}

impl Signature {
    #[must_use]
    pub const fn new(pattern: &'static [ByteMatch]) -> Self {
        Self { pattern, offset: 0 }
    }

    #[must_use]
    pub const fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.pattern.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// A buffer too short to hold the pattern at its offset never matches.
    #[must_use]
    pub fn matches(&self, data: &[u8]) -> bool {
        let Some(window) = data.get(self.offset..self.offset + self.pattern.len()) else {
            return false;
        };
        self.pattern
            .iter()
            .zip(window)
            .all(|(term, &byte)| term.accepts(byte))
    }
}

/// What a table hit means before any container refinement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureKind {
    Direct(MimeType),
    ZipContainer,
    OleContainer,
}

/// One row of the table: every part must match.
#[derive(Debug, Clone)]
pub struct SignatureEntry {
    name: &'static str,
    parts: &'static [Signature],
    kind: SignatureKind,
}

impl SignatureEntry {
    #[must_use]
    pub const fn new(name: &'static str, parts: &'static [Signature], kind: SignatureKind) -> Self {
        Self { name, parts, kind }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> &SignatureKind {
        &self.kind
    }

    #[must_use]
    pub fn parts(&self) -> &'static [Signature] {
        self.parts
    }

    #[must_use]
    pub fn matches(&self, data: &[u8]) -> bool {
        self.parts.iter().all(|part| part.matches(data))
    }
}

const PDF: &[Signature] = &[Signature::new(pattern![0x25, 0x50, 0x44, 0x46])];
const JPEG: &[Signature] = &[Signature::new(pattern![0xFF, 0xD8, 0xFF])];
const PNG: &[Signature] = &[Signature::new(pattern![
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A
])];
const GIF: &[Signature] = &[Signature::new(pattern![0x47, 0x49, 0x46, 0x38])];
// RIFF....WEBP
const WEBP: &[Signature] = &[
    Signature::new(pattern![0x52, 0x49, 0x46, 0x46]),
    Signature::new(pattern![0x57, 0x45, 0x42, 0x50]).at(8),
];
const BMP: &[Signature] = &[Signature::new(pattern![0x42, 0x4D])];
const ZIP: &[Signature] = &[Signature::new(pattern![0x50, 0x4B, 0x03, 0x04])];
const RAR: &[Signature] = &[Signature::new(pattern![0x52, 0x61, 0x72, 0x21])];
const SEVEN_ZIP: &[Signature] = &[Signature::new(pattern![0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C])];
const OLE: &[Signature] = &[Signature::new(pattern![
    0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1
])];

/// Signatures in priority order. The first entry that matches wins.
pub static SIGNATURE_TABLE: [SignatureEntry; 10] = [
    SignatureEntry::new("PDF", PDF, SignatureKind::Direct(MimeType::PDF)),
    SignatureEntry::new("JPEG", JPEG, SignatureKind::Direct(MimeType::JPEG)),
    SignatureEntry::new("PNG", PNG, SignatureKind::Direct(MimeType::PNG)),
    SignatureEntry::new("GIF", GIF, SignatureKind::Direct(MimeType::GIF)),
    SignatureEntry::new("WebP", WEBP, SignatureKind::Direct(MimeType::WEBP)),
    SignatureEntry::new("BMP", BMP, SignatureKind::Direct(MimeType::BMP)),
    SignatureEntry::new("ZIP", ZIP, SignatureKind::ZipContainer),
    SignatureEntry::new("RAR", RAR, SignatureKind::Direct(MimeType::RAR)),
    SignatureEntry::new("7-Zip", SEVEN_ZIP, SignatureKind::Direct(MimeType::SEVEN_ZIP)),
    SignatureEntry::new("OLE", OLE, SignatureKind::OleContainer),
];

/// Returns the first table entry whose signature matches `data`.
#[must_use]
pub fn match_signature(data: &[u8]) -> Option<&'static SignatureEntry> {
    SIGNATURE_TABLE.iter().find(|entry| entry.matches(data))
}
