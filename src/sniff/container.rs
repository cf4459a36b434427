//! Container refinement
//!
//! ZIP and OLE signatures only say "this is a container". Office formats leave
//! recognizable ASCII path or stream names near the start of the file, so a
//! substring search over a short prefix is enough to tell them apart.

use super::decode::{decode_latin1, decode_lossy};
use crate::types::MimeType;
use aho_corasick::AhoCorasick;
use std::sync::LazyLock;
use tracing::debug;

/// Bytes of a ZIP archive inspected for Office Open XML paths.
pub const ZIP_PEEK_LEN: usize = 1000;
/// Bytes of an OLE compound file inspected for stream names.
pub const OLE_PEEK_LEN: usize = 2000;

type MarkerGroup = (&'static [&'static str], MimeType);

const ZIP_MARKERS: &[MarkerGroup] = &[
    (&["xl/", "xl\\", "workbook.xml", "sharedStrings"], MimeType::XLSX),
    (&["word/", "word\\", "document.xml"], MimeType::DOCX),
    (&["ppt/", "ppt\\", "presentation.xml"], MimeType::PPTX),
];

const OLE_MARKERS: &[MarkerGroup] = &[
    (&["Excel.Sheet", "Worksheet", "Workbook"], MimeType::XLS),
    (&["Word.Document", "MSWordDoc"], MimeType::DOC),
    (&["PowerPoint", "Presentation"], MimeType::PPT),
];

/// Multi-pattern index over a prioritized list of marker groups.
struct MarkerIndex {
    groups: &'static [MarkerGroup],
    matcher: Option<AhoCorasick>,
    /// Maps pattern index to the group it belongs to
    pattern_group: Vec<usize>,
}

impl MarkerIndex {
    fn build(groups: &'static [MarkerGroup]) -> Self {
        let mut patterns = Vec::new();
        let mut pattern_group = Vec::new();

        for (idx, (markers, _)) in groups.iter().enumerate() {
            for marker in *markers {
                patterns.push(*marker);
                pattern_group.push(idx);
            }
        }

        Self {
            groups,
            matcher: AhoCorasick::new(&patterns).ok(),
            pattern_group,
        }
    }

    /// Returns the type of the highest-priority group with any marker present.
    fn classify(&self, haystack: &str) -> Option<MimeType> {
        let group = match &self.matcher {
            Some(matcher) => matcher
                .find_overlapping_iter(haystack)
                .map(|mat| self.pattern_group[mat.pattern().as_usize()])
                .min(),
            None => self.classify_linear(haystack),
        }?;
        Some(self.groups[group].1.clone())
    }

    fn classify_linear(&self, haystack: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|(markers, _)| markers.iter().any(|m| haystack.contains(m)))
    }
}

static ZIP_INDEX: LazyLock<MarkerIndex> = LazyLock::new(|| MarkerIndex::build(ZIP_MARKERS));
static OLE_INDEX: LazyLock<MarkerIndex> = LazyLock::new(|| MarkerIndex::build(OLE_MARKERS));

/// Tells xlsx/docx/pptx apart from a plain ZIP archive.
pub fn refine_zip(data: &[u8]) -> MimeType {
    let text = decode_lossy(data, ZIP_PEEK_LEN);
    let mime = ZIP_INDEX.classify(&text).unwrap_or(MimeType::ZIP);
    debug!(%mime, "refined ZIP container");
    mime
}

/// Tells xls/doc/ppt apart. Without any marker the file is taken for a
/// legacy Word document.
pub fn refine_ole(data: &[u8]) -> MimeType {
    let text = decode_latin1(data, OLE_PEEK_LEN);
    let mime = OLE_INDEX.classify(&text).unwrap_or(MimeType::DOC);
    debug!(%mime, "refined OLE container");
    mime
}
