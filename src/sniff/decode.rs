//! Text views over a byte prefix.
//!
//! Container sniffing uses [`decode_lossy`] or [`decode_latin1`]; the text
//! heuristics use [`decode_strict`]. None of them panics or returns an error.

use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn window(bytes: &[u8], limit: usize) -> &[u8] {
    &bytes[..bytes.len().min(limit)]
}

fn skip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// UTF-8 decode of at most `limit` bytes, invalid sequences become U+FFFD.
pub fn decode_lossy(bytes: &[u8], limit: usize) -> Cow<'_, str> {
    String::from_utf8_lossy(skip_bom(window(bytes, limit)))
}

/// UTF-8 decode of at most `limit` bytes; `None` on any invalid sequence,
/// including a multi-byte character cut in half by `limit`.
pub fn decode_strict(bytes: &[u8], limit: usize) -> Option<&str> {
    let text = std::str::from_utf8(window(bytes, limit)).ok()?;
    Some(text.strip_prefix('\u{FEFF}').unwrap_or(text))
}

/// One character per byte (ISO-8859-1), for binary containers that embed
/// ASCII stream names.
pub fn decode_latin1(bytes: &[u8], limit: usize) -> String {
    window(bytes, limit).iter().map(|&b| char::from(b)).collect()
}
