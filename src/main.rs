//! b64sniff - base64 file conversion with type detection

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use crossbeam_channel::RecvTimeoutError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, warn};

use b64sniff::metadata::Metadata;
use b64sniff::naming::file_extension;
use b64sniff::{
    CancelToken, CodecError, Job, MimeType, Options, Outcome, Session, Worker, WorkerEvent,
    classify, human_size, parse_input,
};
use cli::{Cli, Commands, ProgressReporter};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let options = match &cli.config {
        Some(path) => Options::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => Options::default(),
    };

    let interrupted = CancelToken::new();
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.cancel()).context("Failed to set Ctrl+C handler")?;

    match cli.command {
        Commands::Sniff { files, json } => run_sniff(&files, json),
        Commands::Encode {
            file,
            raw,
            mime,
            output,
        } => run_encode(&options, &interrupted, &file, raw, mime, output.as_deref()),
        Commands::Decode {
            input,
            mime,
            output,
        } => run_decode(&options, &interrupted, &input, mime, output),
        Commands::Info { file, json } => run_info(&file, json),
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_sniff(files: &[PathBuf], json: bool) -> Result<()> {
    let mut failed = 0usize;
    let mut results = Vec::new();

    for path in files {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable file");
                eprintln!("{} {}: {}", style("[!]").yellow(), path.display(), err);
                failed += 1;
                continue;
            }
        };

        let mime = classify(&data);
        if json {
            results.push(serde_json::json!({
                "path": path.display().to_string(),
                "mime": mime.as_str(),
                "category": mime.category().name(),
                "size": data.len(),
            }));
        } else {
            println!(
                "{}: {} ({}, {})",
                path.display(),
                style(&mime).green(),
                mime.category(),
                human_size(data.len() as u64)
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    if failed > 0 {
        bail!("{failed} file(s) could not be read");
    }
    Ok(())
}

fn run_encode(
    options: &Options,
    interrupted: &CancelToken,
    path: &Path,
    raw: bool,
    mime: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    let declared = mime
        .map(MimeType::new)
        .or_else(|| MimeType::declared_by_extension(file_extension(&name)));

    let session = Session::new(options.clone());
    let mut worker = Worker::spawn(session.codec()).context("Failed to start worker")?;
    let reporter = ProgressReporter::for_encode(options.progress)?;

    let outcome = run_job(&mut worker, Job::Encode(bytes.clone()), interrupted, &reporter)?;
    worker.shutdown();

    let payload = match outcome {
        Outcome::Encoded(payload) => payload,
        other => return Err(report_failure(other, &reporter)),
    };
    reporter.finish("Encoded");

    let mime = b64sniff::sniff::resolve(declared.as_ref(), &bytes);
    let record = session.finish_encode(&name, bytes, mime, &payload);
    let text = if raw { record.payload() } else { record.data_url.as_str() };

    match output {
        Some(out) => {
            std::fs::write(out, text)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            eprintln!(
                "{} {} ({}, {}) -> {}",
                style("Encoded").green().bold(),
                record.name,
                record.mime,
                record.size_human(),
                out.display()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn run_decode(
    options: &Options,
    interrupted: &CancelToken,
    input: &str,
    mime_only: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let text = read_input(input)?;
    let parsed = parse_input(&text)?;

    let session = Session::new(options.clone());
    let mut worker = Worker::spawn(session.codec()).context("Failed to start worker")?;
    let reporter = ProgressReporter::for_decode(options.progress && !mime_only)?;

    let job = Job::Decode {
        payload: parsed.payload.clone(),
        declared: parsed.declared.clone(),
    };
    let outcome = run_job(&mut worker, job, interrupted, &reporter)?;
    worker.shutdown();

    let (bytes, mime) = match outcome {
        Outcome::Decoded { bytes, mime } => (bytes, mime),
        other => return Err(report_failure(other, &reporter)),
    };
    reporter.finish("Decoded");

    let record = session.finish_decode(&parsed, bytes, mime);
    if mime_only {
        println!("{}", record.mime);
        return Ok(());
    }

    let out = output.unwrap_or_else(|| PathBuf::from(&record.name));
    std::fs::write(&out, &record.bytes)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    eprintln!(
        "{} {} ({}, {})",
        style("Saved").green().bold(),
        out.display(),
        record.mime,
        record.size_human()
    );
    Ok(())
}

fn run_info(path: &Path, json: bool) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mime = classify(&data);
    let metadata = Metadata::derive(&mime, &data);

    if json {
        let report = serde_json::json!({
            "path": path.display().to_string(),
            "mime": mime.as_str(),
            "category": mime.category().name(),
            "extension": mime.extension(),
            "size": data.len(),
            "metadata": metadata,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style(path.display()).cyan().bold());
    println!("Type:      {}", style(&mime).green());
    println!("Category:  {}", mime.category());
    println!("Extension: {}", mime.extension());
    println!("Size:      {}", human_size(data.len() as u64));
    println!("SHA-256:   {}", metadata.sha256);
    if let (Some(width), Some(height)) = (metadata.width, metadata.height) {
        println!("Size (px): {width}x{height}");
    }
    if let Some(pages) = metadata.page_count {
        println!("Pages:     ~{pages}");
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

/// Drives a job to completion, restarting the worker on Ctrl+C.
fn run_job(
    worker: &mut Worker,
    job: Job,
    interrupted: &CancelToken,
    reporter: &ProgressReporter,
) -> Result<Outcome> {
    let ticket = worker.submit(job)?;
    loop {
        if interrupted.is_cancelled() {
            worker.cancel()?;
            return Ok(Outcome::Cancelled);
        }
        match ticket.events().recv_timeout(POLL_INTERVAL) {
            Ok(WorkerEvent::Progress(fraction)) => reporter.update(fraction),
            Ok(WorkerEvent::Done(outcome)) => return Ok(outcome),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(CodecError::WorkerGone.into()),
        }
    }
}

fn report_failure(outcome: Outcome, reporter: &ProgressReporter) -> anyhow::Error {
    match outcome {
        Outcome::Cancelled => {
            reporter.abandon("Cancelled");
            CodecError::Cancelled.into()
        }
        Outcome::Failed(message) => {
            reporter.abandon("Failed");
            anyhow::anyhow!(message)
        }
        other => anyhow::anyhow!("unexpected worker outcome: {other:?}"),
    }
}
