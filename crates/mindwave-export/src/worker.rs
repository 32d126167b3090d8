//! Message-driven export worker.
//!
//! A host posts [`ExportRequest`]s and reads back [`WorkerMessage`]s: zero or
//! more `Progress` messages, then exactly one `Complete` or `Error` per
//! request. Requests are processed one at a time on a dedicated thread.

use crate::pipeline::{run_export, ExportResult};
use crate::progress::ExportProgress;
use crate::types::AudioChunk;
use crate::{ExportError, ExportFormat, ExportOptions, Result};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::thread::JoinHandle;

/// Export request as posted by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "export", rename_all = "camelCase")]
pub struct ExportRequest {
    /// `(left, right)` pairs in capture order
    pub chunks: Vec<(Vec<f32>, Vec<f32>)>,
    /// One of `wav-16`, `wav-24`, `mp3-192`, `mp3-320`
    pub format: String,
    pub loop_count: u32,
    pub sample_rate: u32,
}

/// Message posted back to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    Progress {
        step: String,
        detail: String,
        percent: u8,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        buffer: Vec<u8>,
        mime_type: String,
        ext: String,
        /// Seconds of audio
        duration: f64,
        /// Seconds spent exporting, two decimals
        processing_time: String,
    },
    Error {
        message: String,
    },
}

impl From<ExportProgress> for WorkerMessage {
    fn from(p: ExportProgress) -> Self {
        WorkerMessage::Progress {
            step: p.step.label().to_string(),
            detail: p.detail,
            percent: p.percent,
        }
    }
}

impl From<ExportResult> for WorkerMessage {
    fn from(result: ExportResult) -> Self {
        WorkerMessage::Complete {
            processing_time: result.processing_time_display(),
            mime_type: result.mime_type.to_string(),
            ext: result.extension.to_string(),
            duration: result.duration_seconds,
            buffer: result.payload,
        }
    }
}

impl WorkerMessage {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerMessage::Progress { .. })
    }
}

fn prepare(request: ExportRequest) -> Result<(Vec<AudioChunk>, ExportFormat, u32, u32)> {
    let format: ExportFormat = request.format.parse()?;
    let chunks = request
        .chunks
        .into_iter()
        .enumerate()
        .map(|(index, (left, right))| {
            AudioChunk::stereo(left, right).map_err(|e| match e {
                ExportError::InvalidData(reason) => {
                    ExportError::InvalidData(format!("chunk {index}: {reason}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((chunks, format, request.loop_count, request.sample_rate))
}

/// Run one request, posting its messages through `emit`.
pub fn handle_request(request: ExportRequest, options: &ExportOptions, emit: impl Fn(WorkerMessage)) {
    let outcome = prepare(request).and_then(|(chunks, format, loop_count, sample_rate)| {
        run_export(chunks, format, loop_count, sample_rate, options, |p| {
            emit(WorkerMessage::from(p))
        })
    });

    match outcome {
        Ok(result) => emit(WorkerMessage::from(result)),
        Err(e) => {
            log::error!("export failed: {e}");
            emit(WorkerMessage::Error {
                message: e.to_string(),
            });
        }
    }
}

/// Dedicated export thread fed through a request channel.
///
/// Dropping the worker (or calling [`terminate()`](Self::terminate)) closes
/// the request queue and waits for the in-flight export, if any.
pub struct ExportWorker {
    requests: Option<Sender<ExportRequest>>,
    messages: Receiver<WorkerMessage>,
    thread: Option<JoinHandle<()>>,
}

impl ExportWorker {
    pub fn spawn() -> Result<Self> {
        Self::with_options(ExportOptions::default())
    }

    pub fn with_options(options: ExportOptions) -> Result<Self> {
        options.validate()?;
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<ExportRequest>();
        // Unbounded so terminal messages are never dropped.
        let (message_tx, message_rx) = crossbeam_channel::unbounded();

        let thread = std::thread::Builder::new()
            .name("mindwave-export-worker".into())
            .spawn(move || {
                for request in request_rx.iter() {
                    handle_request(request, &options, |message| {
                        let _ = message_tx.send(message);
                    });
                }
                log::debug!("export worker shutting down");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            messages: message_rx,
            thread: Some(thread),
        })
    }

    pub fn submit(&self, request: ExportRequest) -> Result<()> {
        self.requests
            .as_ref()
            .ok_or_else(|| ExportError::Render("export worker has shut down".into()))?
            .send(request)
            .map_err(|_| ExportError::Render("export worker has shut down".into()))
    }

    pub fn messages(&self) -> &Receiver<WorkerMessage> {
        &self.messages
    }

    pub fn try_recv(&self) -> Option<WorkerMessage> {
        self.messages.try_recv().ok()
    }

    /// Block until the terminal message of the current request arrives.
    pub fn recv_terminal(&self) -> Result<WorkerMessage> {
        loop {
            let message = self
                .messages
                .recv()
                .map_err(|_| ExportError::Render("export worker disconnected".into()))?;
            if message.is_terminal() {
                return Ok(message);
            }
        }
    }

    pub fn terminate(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("export worker thread panicked");
            }
        }
    }
}

impl Drop for ExportWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
