pub mod codec;
pub mod config;
mod error;
pub mod history;
pub mod metadata;
pub mod naming;
pub mod session;
pub mod signatures;
pub mod sniff;
pub mod types;
pub mod worker;

pub use codec::{Base64Input, CancelToken, Codec, parse_input, to_data_url};
pub use config::Options;
pub use error::{CodecError, Result};
pub use history::{History, HistoryEntry, Operation};
pub use metadata::Metadata;
pub use session::{FileRecord, Session};
pub use sniff::classify;
pub use types::{Category, MimeType, human_size};
pub use worker::{Job, Outcome, Ticket, Worker, WorkerEvent};
