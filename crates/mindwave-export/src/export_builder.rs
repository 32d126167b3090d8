use crate::handle::ExportHandle;
use crate::pipeline::{render_master, run_export, ExportResult};
use crate::progress::ExportProgress;
use crate::types::{AssembledMaster, AudioChunk};
use crate::{ExportFormat, ExportOptions, Result};
use std::path::Path;

/// Builder for exporting a captured loop.
///
/// # Example
/// ```ignore
/// let result = ExportBuilder::new(chunks, 44100)
///     .format(ExportFormat::Wav24)
///     .loop_count(8)
///     .encode()?;
/// ```
#[derive(Debug)]
pub struct ExportBuilder {
    chunks: Vec<AudioChunk>,
    sample_rate: u32,
    loop_count: u32,
    format: ExportFormat,
    options: ExportOptions,
}

impl ExportBuilder {
    pub fn new(chunks: Vec<AudioChunk>, sample_rate: u32) -> Self {
        Self {
            chunks,
            sample_rate,
            loop_count: 1,
            format: ExportFormat::default(),
            options: ExportOptions::default(),
        }
    }

    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = loop_count;
        self
    }

    pub fn options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the seam crossfade window (seconds).
    pub fn crossfade_seconds(mut self, seconds: f64) -> Self {
        self.options.crossfade_seconds = seconds;
        self
    }

    /// Assemble and shape the loop without encoding it.
    pub fn render(self) -> Result<AssembledMaster> {
        render_master(
            &self.chunks,
            self.loop_count,
            self.sample_rate,
            &self.options,
            &|_| {},
        )
    }

    pub fn encode(self) -> Result<ExportResult> {
        self.encode_with_progress(|_| {})
    }

    pub fn encode_with_progress(self, on_progress: impl Fn(ExportProgress)) -> Result<ExportResult> {
        run_export(
            self.chunks,
            self.format,
            self.loop_count,
            self.sample_rate,
            &self.options,
            on_progress,
        )
    }

    /// Encode and write the payload to `path`.
    pub fn to_file(self, path: impl AsRef<Path>) -> Result<ExportResult> {
        let result = self.encode()?;
        crate::write_export(path, &result)?;
        Ok(result)
    }

    /// Start a non-blocking background export, returning a handle to poll progress.
    ///
    /// The export runs on a dedicated thread. Poll [`ExportHandle::progress()`]
    /// each frame to get status updates, or call [`ExportHandle::wait()`] to block.
    ///
    /// ```ignore
    /// let mut handle = ExportBuilder::new(chunks, 48000).loop_count(4).start()?;
    ///
    /// loop {
    ///     match handle.progress() {
    ///         ExportStatus::Running(p) => println!("{} {}%", p.step.label(), p.percent),
    ///         ExportStatus::Complete => break,
    ///         ExportStatus::Failed(e) => { eprintln!("{}", e); break; }
    ///         ExportStatus::Pending => {}
    ///     }
    /// }
    /// let result = handle.wait()?;
    /// ```
    pub fn start(self) -> Result<ExportHandle> {
        self.options.validate()?;
        let (tx, rx) = crossbeam_channel::bounded(self.options.progress_channel_capacity);

        let thread = std::thread::Builder::new()
            .name("mindwave-export".into())
            .spawn(move || {
                self.encode_with_progress(|p| {
                    let _ = tx.try_send(p); // drop if full, the poller only needs the latest
                })
            })?;

        Ok(ExportHandle::new(rx, thread))
    }
}
