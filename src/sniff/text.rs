//! Structural heuristics for formats without a signature.
//!
//! Each predicate looks at a short decoded prefix and answers yes or no.
//! A prefix that does not decode is a "no".

use super::decode::{decode_lossy, decode_strict};
use regex::Regex;
use std::sync::LazyLock;

pub const CSV_MIN_LEN: usize = 10;
pub const CSV_PEEK_LEN: usize = 500;
pub const MARKUP_PEEK_LEN: usize = 100;
pub const HTML_PEEK_LEN: usize = 500;
pub const TEXT_PEEK_LEN: usize = 500;

/// Lines of the CSV sample that take part in the comma and width checks.
const CSV_SAMPLE_LINES: usize = 5;

// Header cells such as `Name`, `"Order ID"` or `total_amount`; word
// characters are ASCII only
static CSV_HEADER_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)^"?[A-Za-z0-9_\s]+"?$"#).ok());

static OPEN_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").ok());

fn field_count(line: &str) -> usize {
    line.split(',').count()
}

fn looks_like_header_field(field: &str) -> bool {
    CSV_HEADER_FIELD
        .as_ref()
        .is_some_and(|re| re.is_match(field.trim()))
}

/// Comma-separated values.
///
/// Permissive: a consistent column count across the first lines
/// or a header-looking first line is enough, as long as commas show up and
/// the first line has more than one field. Text that already has the shape
/// of a JSON document is left to [`is_json`].
pub fn is_csv(bytes: &[u8]) -> bool {
    if bytes.len() < CSV_MIN_LEN || is_json(bytes) {
        return false;
    }

    let text = decode_lossy(bytes, CSV_PEEK_LEN);
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return false;
    }

    let sample = &lines[..lines.len().min(CSV_SAMPLE_LINES)];
    let with_commas = sample.iter().filter(|line| line.contains(',')).count();
    if with_commas < lines.len().min(2) {
        return false;
    }

    let first_fields = field_count(lines[0]);

    let consistent = lines.len() == 1
        || sample[1..]
            .iter()
            .filter(|line| field_count(line).abs_diff(first_fields) <= 1)
            .count()
            >= (lines.len() - 1).min(2);

    let header_like = lines[0].split(',').any(looks_like_header_field);

    (consistent || header_like) && first_fields > 1
}

/// An XML declaration, or anything that looks like an opening tag.
pub fn is_xml(bytes: &[u8]) -> bool {
    let Some(text) = decode_strict(bytes, MARKUP_PEEK_LEN) else {
        return false;
    };
    let trimmed = text.trim();
    trimmed.starts_with("<?xml")
        || OPEN_TAG
            .as_ref()
            .is_some_and(|re| re.is_match(trimmed))
}

/// An object with a key separator or an array with an element separator.
pub fn is_json(bytes: &[u8]) -> bool {
    let Some(text) = decode_strict(bytes, MARKUP_PEEK_LEN) else {
        return false;
    };
    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.contains(':'))
        || (trimmed.starts_with('[') && trimmed.contains(','))
}

pub fn is_html(bytes: &[u8]) -> bool {
    let Some(text) = decode_strict(bytes, HTML_PEEK_LEN) else {
        return false;
    };
    let lower = text.to_lowercase();
    lower.contains("<html")
        || lower.contains("<!doctype html")
        || (lower.contains("<head") && lower.contains("<body"))
}

/// Whether the prefix is valid UTF-8 text.
pub fn is_text(bytes: &[u8]) -> bool {
    decode_strict(bytes, TEXT_PEEK_LEN).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_basic() {
        assert!(is_csv(b"name,age\nAlice,30\nBob,25\n"));
        assert!(is_csv(b"id,name,email\r\n1,Ann,a@x.io\r\n2,Bo,b@x.io\r\n"));
    }

    #[test]
    fn csv_too_short() {
        assert!(!is_csv(b"a,b\n1,2"));
    }

    #[test]
    fn csv_needs_commas_on_two_lines() {
        assert!(!is_csv(b"first,line\nsecond line\nthird line\n"));
    }

    #[test]
    fn csv_single_field_rejected() {
        assert!(!is_csv(b"just one column\nanother row\n"));
    }

    #[test]
    fn csv_header_rescues_ragged_rows() {
        let data = b"Name,Notes\nAnn,a,b,c,d\nBo,e,f,g,h\n";
        assert!(is_csv(data));
    }

    #[test]
    fn csv_ragged_without_header_rejected() {
        let data = b"1.5,2.5\n3,4,5,6,7\n8,9,10,11,12\n";
        assert!(!is_csv(data));
    }

    #[test]
    fn csv_header_must_be_ascii_words() {
        assert!(!is_csv("é,ü\n1,2,3,4,5\n6,7,8,9,10\n".as_bytes()));
        assert!(is_csv(b"e,u\n1,2,3,4,5\n6,7,8,9,10\n"));
    }

    #[test]
    fn csv_leaves_json_alone() {
        assert!(!is_csv(br#"{"a":1,"b":2}"#));
    }

    #[test]
    fn xml_declaration_and_tags() {
        assert!(is_xml(b"  <?xml version=\"1.0\"?><root/>"));
        assert!(is_xml(b"<note><to>Tove</to></note>"));
        assert!(!is_xml(b"a < b and c > d"));
        assert!(!is_xml(b"<\xFF>"));
    }

    #[test]
    fn json_shapes() {
        assert!(is_json(br#"{"a":1,"b":2}"#));
        assert!(is_json(b"  [1, 2, 3]"));
        assert!(!is_json(b"[1]"));
        assert!(!is_json(b"{}"));
    }

    #[test]
    fn html_markers() {
        assert!(is_html(b"<!DOCTYPE HTML><p>hi</p>"));
        assert!(is_html(b"<HEAD></HEAD><BODY></BODY>"));
        assert!(!is_html(b"<head>only</head>"));
    }

    #[test]
    fn json_window_cutting_a_character_is_not_json() {
        let mut data = br#"{"k":""#.to_vec();
        data.resize(99, b'x');
        data.extend_from_slice("é\"}".as_bytes());
        assert!(!is_json(&data));
        assert!(is_text(&data));
    }

    #[test]
    fn text_fallback() {
        assert!(is_text(b"hello world"));
        assert!(!is_text(&[0x00, 0xFF, 0xFE, 0x80]));
    }
}
