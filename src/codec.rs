//! Base64 encoding and decoding
//!
//! Large buffers are processed in chunks so callers can show progress and
//! abandon the work between chunks. Decoding follows the forgiving rules of
//! browser `atob`: padding is optional and stray trailing bits are ignored,
//! but the character set is checked up front.

use crate::error::{CodecError, Result};
use crate::types::MimeType;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Default number of input bytes handled per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

static DATA_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^data:([^;]+);base64,(.+)$").ok());

/// Fractional progress sink, called with values in `(0, 1]`.
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// Shared flag used to abandon a running conversion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(CodecError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Base64 text as typed or pasted by a user, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Input {
    /// Type carried by a `data:` prefix, if any
    pub declared: Option<MimeType>,
    pub payload: String,
}

impl Base64Input {
    pub fn is_data_url(&self) -> bool {
        self.declared.is_some()
    }
}

/// Splits user input into an optional declared type and the base64 payload.
///
/// Input starting with `data:` must be a complete `data:<mime>;base64,<data>`
/// URL. Anything else is taken as a bare payload.
pub fn parse_input(input: &str) -> Result<Base64Input> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    if !trimmed.starts_with("data:") {
        return Ok(Base64Input {
            declared: None,
            payload: trimmed.to_string(),
        });
    }

    let caps = DATA_URL
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .ok_or(CodecError::InvalidDataUrl)?;

    Ok(Base64Input {
        declared: Some(MimeType::new(&caps[1])),
        payload: caps[2].to_string(),
    })
}

#[must_use]
pub fn to_data_url(mime: &MimeType, payload: &str) -> String {
    format!("data:{mime};base64,{payload}")
}

/// Checks the payload against `^[A-Za-z0-9+/]*={0,2}$`.
#[must_use]
pub fn is_valid_base64(payload: &str) -> bool {
    let body = payload.trim_end_matches('=');
    payload.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Chunked base64 codec.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    chunk_size: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Codec {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(3),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Encoded chunks must not carry padding, so the input is cut on whole
    /// 3-byte groups.
    fn encode_chunk_len(&self) -> usize {
        self.chunk_size - self.chunk_size % 3
    }

    /// Characters per decode chunk: whole 4-character quanta.
    fn decode_chunk_len(&self) -> usize {
        (self.chunk_size / 3).max(1).saturating_mul(4)
    }

    pub fn encode(
        &self,
        data: &[u8],
        progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<String> {
        let chunk_len = self.encode_chunk_len();
        let total = data.len().div_ceil(chunk_len);
        let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

        for (i, chunk) in data.chunks(chunk_len).enumerate() {
            if let Some(token) = cancel {
                token.check()?;
            }
            STANDARD.encode_string(chunk, &mut out);
            report(progress, i, total);
        }

        debug!(input = data.len(), output = out.len(), chunks = total, "encoded");
        Ok(out)
    }

    pub fn decode(
        &self,
        payload: &str,
        progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u8>> {
        if !is_valid_base64(payload) {
            return Err(CodecError::InvalidCharacters);
        }

        let chunk_len = self.decode_chunk_len();
        let bytes = payload.as_bytes();
        let total = bytes.len().div_ceil(chunk_len);
        let mut out = Vec::with_capacity(bytes.len() / 4 * 3 + 3);

        for (i, chunk) in bytes.chunks(chunk_len).enumerate() {
            if let Some(token) = cancel {
                token.check()?;
            }
            FORGIVING.decode_vec(chunk, &mut out)?;
            report(progress, i, total);
        }

        debug!(input = payload.len(), output = out.len(), chunks = total, "decoded");
        Ok(out)
    }
}

fn report(progress: Option<ProgressFn<'_>>, index: usize, total: usize) {
    if total <= 1 {
        return;
    }
    if let Some(cb) = progress {
        cb((index + 1) as f64 / total as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_known_vectors() {
        let codec = Codec::default();
        assert_eq!(codec.encode(b"", None, None).unwrap(), "");
        assert_eq!(codec.encode(b"f", None, None).unwrap(), "Zg==");
        assert_eq!(codec.encode(b"foobar", None, None).unwrap(), "Zm9vYmFy");
        assert_eq!(codec.decode("Zm9vYg==", None, None).unwrap(), b"foob");
    }

    #[test]
    fn test_padding_is_optional() {
        let codec = Codec::default();
        assert_eq!(codec.decode("Zm9vYg", None, None).unwrap(), b"foob");
    }

    #[test]
    fn test_invalid_length_fails() {
        let codec = Codec::default();
        assert!(matches!(
            codec.decode("Zm9vY", None, None),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn test_charset_validation() {
        assert!(is_valid_base64("QUJD+/=="));
        assert!(is_valid_base64(""));
        assert!(!is_valid_base64("QUJD==="));
        assert!(!is_valid_base64("QU JD"));
        assert!(!is_valid_base64("QU=JD"));
        assert!(matches!(
            Codec::default().decode("QU_D", None, None),
            Err(CodecError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_small_chunks_roundtrip_and_report_progress() {
        let codec = Codec::new(4);
        let data: Vec<u8> = (0..=255).collect();
        let seen = Mutex::new(Vec::new());
        let cb = |p: f64| seen.lock().unwrap().push(p);

        let encoded = codec.encode(&data, Some(&cb), None).unwrap();
        assert_eq!(encoded, STANDARD.encode(&data));
        let steps = seen.lock().unwrap().clone();
        assert_eq!(steps.len(), 86);
        assert_eq!(steps.last().copied(), Some(1.0));

        let decoded = codec.decode(&encoded, None, None).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_single_chunk_reports_nothing() {
        let seen = Mutex::new(0usize);
        let cb = |_: f64| *seen.lock().unwrap() += 1;
        Codec::default().encode(b"tiny", Some(&cb), None).unwrap();
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_cancelled_token_stops_work() {
        let token = CancelToken::new();
        token.cancel();
        let result = Codec::default().encode(b"abc", None, Some(&token));
        assert!(matches!(result, Err(CodecError::Cancelled)));
    }

    #[test]
    fn test_parse_input() {
        let raw = parse_input("  Zm9v \n").unwrap();
        assert_eq!(raw.payload, "Zm9v");
        assert!(!raw.is_data_url());

        let url = parse_input("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(url.declared, Some(MimeType::PNG));
        assert_eq!(url.payload, "iVBORw0KGgo=");

        assert!(matches!(parse_input("   "), Err(CodecError::EmptyInput)));
        assert!(matches!(
            parse_input("data:image/png,iVBOR"),
            Err(CodecError::InvalidDataUrl)
        ));
    }

    #[test]
    fn test_to_data_url() {
        assert_eq!(
            to_data_url(&MimeType::PDF, "JVBERg=="),
            "data:application/pdf;base64,JVBERg=="
        );
    }
}
