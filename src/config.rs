use crate::codec::{Codec, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Runtime options. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub chunk_size: usize,
    pub history_capacity: usize,
    pub progress: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            progress: true,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options = Self::from_json(&text)?;
        debug!(path = %path.display(), ?options, "loaded options");
        Ok(options)
    }

    pub fn codec(&self) -> Codec {
        Codec::new(self.chunk_size)
    }
}
