use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

const PROGRESS_SCALE: u64 = 1000;

#[derive(Parser)]
#[command(name = "b64sniff")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert files to and from base64 with content-based type detection", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// JSON options file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the type of one or more files
    Sniff {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Encode a file as a data URL
    Encode {
        file: PathBuf,

        /// Print the bare base64 payload instead of a data URL
        #[arg(long)]
        raw: bool,

        /// Use this type instead of the extension or content
        #[arg(short, long)]
        mime: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode base64 text or a data URL into a file
    Decode {
        /// File holding the base64 text, `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Only print the detected type
        #[arg(long)]
        mime: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show type, hash and size details for a file
    Info {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(message: &str, visible: bool) -> Result<Self> {
        if !visible {
            return Ok(Self {
                bar: ProgressBar::hidden(),
            });
        }

        let bar = ProgressBar::new(PROGRESS_SCALE);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% ({eta})")?
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        Ok(Self { bar })
    }

    pub fn for_encode(visible: bool) -> Result<Self> {
        Self::new("Encoding...", visible)
    }

    pub fn for_decode(visible: bool) -> Result<Self> {
        Self::new("Decoding...", visible)
    }

    pub fn update(&self, fraction: f64) {
        let position = (fraction.clamp(0.0, 1.0) * PROGRESS_SCALE as f64).round() as u64;
        self.bar.set_position(position);
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
