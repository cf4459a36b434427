//! Background conversion worker
//!
//! Encode and decode jobs run on a dedicated thread so a front end stays
//! responsive while large buffers are processed. Each job gets its own event
//! channel: zero or more [`WorkerEvent::Progress`] updates followed by exactly
//! one [`WorkerEvent::Done`].
//!
//! Cancelling does not wait for the job to unwind. The running job's token is
//! tripped, the thread is abandoned, and a fresh thread takes its place.

use crate::codec::{CancelToken, Codec, ProgressFn};
use crate::error::{CodecError, Result};
use crate::sniff;
use crate::types::MimeType;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum Job {
    Encode(Vec<u8>),
    /// `declared` skips sniffing when the caller already knows the type
    Decode {
        payload: String,
        declared: Option<MimeType>,
    },
}

/// Terminal state of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Encoded(String),
    Decoded { bytes: Vec<u8>, mime: MimeType },
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Progress(f64),
    Done(Outcome),
}

struct Envelope {
    job: Job,
    token: CancelToken,
    events: Sender<WorkerEvent>,
}

/// Handle on a submitted job.
pub struct Ticket {
    events: Receiver<WorkerEvent>,
    token: CancelToken,
}

impl Ticket {
    /// Token that cancels this job when tripped, usable from any thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Blocks until the job finishes, forwarding progress updates.
    pub fn wait(self, mut on_progress: impl FnMut(f64)) -> Outcome {
        for event in self.events.iter() {
            match event {
                WorkerEvent::Progress(p) => on_progress(p),
                WorkerEvent::Done(outcome) => return outcome,
            }
        }
        Outcome::Failed(CodecError::WorkerGone.to_string())
    }
}

pub struct Worker {
    codec: Codec,
    jobs: Sender<Envelope>,
    handle: Option<JoinHandle<()>>,
    current: Option<CancelToken>,
}

impl Worker {
    pub fn spawn(codec: Codec) -> Result<Self> {
        let (jobs, inbox) = unbounded::<Envelope>();
        let handle = thread::Builder::new()
            .name("b64sniff-worker".to_string())
            .spawn(move || run(codec, inbox))?;

        debug!("worker started");
        Ok(Self {
            codec,
            jobs,
            handle: Some(handle),
            current: None,
        })
    }

    pub fn submit(&mut self, job: Job) -> Result<Ticket> {
        let (events, rx) = unbounded();
        let token = CancelToken::new();

        self.jobs
            .send(Envelope {
                job,
                token: token.clone(),
                events,
            })
            .map_err(|_| CodecError::WorkerGone)?;

        self.current = Some(token.clone());
        Ok(Ticket { events: rx, token })
    }

    /// Abandons the running job and replaces the worker thread.
    pub fn cancel(&mut self) -> Result<()> {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
        let fresh = Self::spawn(self.codec)?;
        // The old thread drains out on its own once its inbox disconnects.
        drop(std::mem::replace(self, fresh));
        info!("operation cancelled, worker restarted");
        Ok(())
    }

    /// Stops accepting jobs and waits for the thread to finish.
    pub fn shutdown(mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let (closed, _) = unbounded();
        drop(std::mem::replace(&mut self.jobs, closed));
        if handle.join().is_err() {
            warn!("worker thread panicked");
        }
    }
}

fn run(codec: Codec, inbox: Receiver<Envelope>) {
    for Envelope { job, token, events } in inbox.iter() {
        let sink = events.clone();
        let progress = move |p: f64| {
            let _ = sink.send(WorkerEvent::Progress(p));
        };
        let outcome = execute(&codec, job, &progress, &token);
        let _ = events.send(WorkerEvent::Done(outcome));
    }
    debug!("worker stopped");
}

fn execute(codec: &Codec, job: Job, progress: ProgressFn<'_>, token: &CancelToken) -> Outcome {
    let result = match job {
        Job::Encode(data) => codec
            .encode(&data, Some(progress), Some(token))
            .map(Outcome::Encoded),
        Job::Decode { payload, declared } => codec
            .decode(&payload, Some(progress), Some(token))
            .map(|bytes| {
                let mime = sniff::resolve(declared.as_ref(), &bytes);
                Outcome::Decoded { bytes, mime }
            }),
    };

    match result {
        Ok(outcome) => outcome,
        Err(CodecError::Cancelled) => Outcome::Cancelled,
        Err(err) => {
            warn!(error = %err, "job failed");
            Outcome::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_job_completes() {
        let mut worker = Worker::spawn(Codec::default()).unwrap();
        let ticket = worker.submit(Job::Encode(b"hello".to_vec())).unwrap();
        assert_eq!(ticket.wait(|_| {}), Outcome::Encoded("aGVsbG8=".to_string()));
        worker.shutdown();
    }

    #[test]
    fn decode_job_sniffs_when_undeclared() {
        let mut worker = Worker::spawn(Codec::default()).unwrap();
        let ticket = worker
            .submit(Job::Decode {
                payload: "JVBERi0xLjQ=".to_string(),
                declared: None,
            })
            .unwrap();
        match ticket.wait(|_| {}) {
            Outcome::Decoded { bytes, mime } => {
                assert_eq!(bytes, b"%PDF-1.4");
                assert_eq!(mime, MimeType::PDF);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn decode_job_reports_failure() {
        let mut worker = Worker::spawn(Codec::default()).unwrap();
        let ticket = worker
            .submit(Job::Decode {
                payload: "not base64!".to_string(),
                declared: None,
            })
            .unwrap();
        assert_eq!(
            ticket.wait(|_| {}),
            Outcome::Failed("Invalid base64 characters detected".to_string())
        );
    }

    #[test]
    fn progress_precedes_completion() {
        let mut worker = Worker::spawn(Codec::new(3)).unwrap();
        let ticket = worker.submit(Job::Encode(vec![7u8; 30])).unwrap();
        let mut updates = Vec::new();
        let outcome = ticket.wait(|p| updates.push(p));
        assert!(matches!(outcome, Outcome::Encoded(_)));
        assert_eq!(updates.len(), 10);
        assert!(updates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn cancelled_token_yields_cancelled_outcome() {
        let mut worker = Worker::spawn(Codec::default()).unwrap();
        let ticket = worker.submit(Job::Encode(vec![0u8; 10])).unwrap();
        ticket.cancel_token().cancel();
        let outcome = ticket.wait(|_| {});
        // The job may have finished before the token was tripped.
        assert!(matches!(outcome, Outcome::Cancelled | Outcome::Encoded(_)));
    }

    #[test]
    fn worker_is_usable_after_cancel() {
        let mut worker = Worker::spawn(Codec::default()).unwrap();
        let _abandoned = worker.submit(Job::Encode(vec![1u8; 1024])).unwrap();
        worker.cancel().unwrap();
        let ticket = worker.submit(Job::Encode(b"ok".to_vec())).unwrap();
        assert_eq!(ticket.wait(|_| {}), Outcome::Encoded("b2s=".to_string()));
        worker.shutdown();
    }
}
