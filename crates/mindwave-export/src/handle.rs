//! Handle for loop exports running on their own thread.

use crate::pipeline::ExportResult;
use crate::progress::ExportProgress;
use crate::{ExportError, Result};
use crossbeam_channel::Receiver;
use std::thread::JoinHandle;

/// Where a background loop export stands.
#[derive(Debug)]
pub enum ExportStatus {
    /// Latest milestone reported by the pipeline
    Running(ExportProgress),
    /// Export completed successfully; collect the payload with [`ExportHandle::wait()`].
    Complete,
    /// The pipeline stopped; no payload was produced
    Failed(String),
    /// Nothing reported yet
    Pending,
}

/// Handle to an export started with `start()`.
///
/// Created by [`ExportBuilder::start()`](crate::ExportBuilder::start). Poll
/// with [`progress()`](Self::progress) or block with [`wait()`](Self::wait).
/// Dropping the handle abandons the result; the export itself runs to
/// completion on its thread.
pub struct ExportHandle {
    progress_rx: Receiver<ExportProgress>,
    thread: Option<JoinHandle<Result<ExportResult>>>,
    outcome: Option<Result<ExportResult>>,
    last_progress: Option<ExportProgress>,
}

impl ExportHandle {
    pub(crate) fn new(
        progress_rx: Receiver<ExportProgress>,
        thread: JoinHandle<Result<ExportResult>>,
    ) -> Self {
        Self {
            progress_rx,
            thread: Some(thread),
            outcome: None,
            last_progress: None,
        }
    }

    /// Non-blocking poll. Queued progress events are drained and only the
    /// newest is kept; once the thread has exited the outcome wins.
    pub fn progress(&mut self) -> ExportStatus {
        while let Ok(p) = self.progress_rx.try_recv() {
            self.last_progress = Some(p);
        }

        if self.thread.as_ref().is_some_and(|t| t.is_finished()) {
            self.join();
        }

        match &self.outcome {
            Some(Ok(_)) => ExportStatus::Complete,
            Some(Err(e)) => ExportStatus::Failed(e.to_string()),
            None => match &self.last_progress {
                Some(p) => ExportStatus::Running(p.clone()),
                None => ExportStatus::Pending,
            },
        }
    }

    /// Join the export thread and take the encoded result.
    pub fn wait(mut self) -> Result<ExportResult> {
        self.join();
        self.outcome
            .take()
            .unwrap_or_else(|| Err(ExportError::Render("export result already taken".into())))
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
            || self
                .thread
                .as_ref()
                .map(|t| t.is_finished())
                .unwrap_or(true)
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.outcome = Some(match thread.join() {
                Ok(result) => result,
                Err(_) => Err(ExportError::Render("Export thread panicked".into())),
            });
        }
    }
}

impl std::fmt::Debug for ExportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportHandle")
            .field("done", &self.is_done())
            .field("last_progress", &self.last_progress)
            .finish()
    }
}
