//! Conversion session
//!
//! Ties the codec, the sniffer and the history together. A session is
//! `Sync`; the history sits behind a mutex so several callers may convert
//! at once.

use crate::codec::{Base64Input, CancelToken, Codec, ProgressFn, parse_input, to_data_url};
use crate::config::Options;
use crate::error::Result;
use crate::history::{History, HistoryEntry, Operation};
use crate::metadata::Metadata;
use crate::naming::{decoded_file_name, rename_preserving_extension};
use crate::sniff;
use crate::types::{MimeType, human_size};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// A converted file: its bytes plus the data URL that represents them.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub name: String,
    pub mime: MimeType,
    pub size: u64,
    pub data_url: String,
    pub last_modified: DateTime<Utc>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl FileRecord {
    /// Base64 part of the data URL.
    pub fn payload(&self) -> &str {
        self.data_url
            .split_once(',')
            .map_or(self.data_url.as_str(), |(_, payload)| payload)
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::derive(&self.mime, &self.bytes)
    }

    pub fn size_human(&self) -> String {
        human_size(self.size)
    }

    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        self.name = rename_preserving_extension(&self.name, new_name)?;
        Ok(())
    }
}

pub struct Session {
    options: Options,
    codec: Codec,
    history: Mutex<History>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Session {
    pub fn new(options: Options) -> Self {
        Self {
            codec: options.codec(),
            history: Mutex::new(History::with_capacity(options.history_capacity)),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Encodes a file. A declared type is trusted; otherwise the bytes are
    /// sniffed.
    pub fn encode_file(
        &self,
        name: &str,
        bytes: Vec<u8>,
        declared: Option<MimeType>,
    ) -> Result<FileRecord> {
        self.encode_file_with(name, bytes, declared, None, None)
    }

    pub fn encode_file_with(
        &self,
        name: &str,
        bytes: Vec<u8>,
        declared: Option<MimeType>,
        progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<FileRecord> {
        let payload = self.codec.encode(&bytes, progress, cancel)?;
        let mime = sniff::resolve(declared.as_ref(), &bytes);
        Ok(self.finish_encode(name, bytes, mime, &payload))
    }

    /// Builds the record for bytes encoded elsewhere, such as on a worker.
    pub fn finish_encode(
        &self,
        name: &str,
        bytes: Vec<u8>,
        mime: MimeType,
        payload: &str,
    ) -> FileRecord {
        let record = FileRecord {
            name: name.to_string(),
            size: bytes.len() as u64,
            data_url: to_data_url(&mime, payload),
            last_modified: Utc::now(),
            mime,
            bytes,
        };
        self.record(Operation::Encode, &record);
        record
    }

    /// Decodes pasted base64 text or a data URL.
    pub fn decode_text(&self, text: &str) -> Result<FileRecord> {
        self.decode_text_with(text, None, None)
    }

    pub fn decode_text_with(
        &self,
        text: &str,
        progress: Option<ProgressFn<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<FileRecord> {
        let input = parse_input(text)?;
        let bytes = self.codec.decode(&input.payload, progress, cancel)?;
        let mime = sniff::resolve(input.declared.as_ref(), &bytes);
        Ok(self.finish_decode(&input, bytes, mime))
    }

    /// Builds the record for bytes decoded elsewhere. A data URL given as
    /// input is kept as is; a bare payload gets one built around it.
    pub fn finish_decode(&self, input: &Base64Input, bytes: Vec<u8>, mime: MimeType) -> FileRecord {
        let data_url = match &input.declared {
            Some(declared) => to_data_url(declared, &input.payload),
            None => to_data_url(&mime, &input.payload),
        };
        let record = FileRecord {
            name: decoded_file_name(&mime),
            size: bytes.len() as u64,
            data_url,
            last_modified: Utc::now(),
            mime,
            bytes,
        };
        self.record(Operation::Decode, &record);
        record
    }

    /// History snapshot, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    fn record(&self, operation: Operation, record: &FileRecord) {
        self.history.lock().record(
            operation,
            &record.name,
            &record.mime,
            record.size,
            record.last_modified,
        );
        info!(
            %operation,
            name = %record.name,
            mime = %record.mime,
            size = %record.size_human(),
            "conversion complete"
        );
    }
}
