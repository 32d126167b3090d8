//! # MindWave
//!
//! Umbrella crate for MindWave session tooling.
//!
//! A session captures one loop of live stereo audio and exports it as a long
//! seamless WAV file. The heavy lifting lives in subsystem crates, re-exported
//! here behind cargo features:
//! - **export** (default): loop assembly, crossfades, edge fades and PCM WAV
//!   encoding ([`mindwave_export`])
//!
//! ## Quick Start
//!
//! ```ignore
//! use mindwave::prelude::*;
//!
//! let mut session = MindWaveSession::builder().sample_rate(44100).build()?;
//!
//! session.record()?;
//! for block in incoming_blocks {
//!     session.capture(&block.left, &block.right)?;
//! }
//! session.stop_recording()?;
//!
//! let mut handle = session.export()?
//!     .format(ExportFormat::Wav24)
//!     .loop_count(20)
//!     .start()?;
//!
//! while let ExportStatus::Running(p) | ExportStatus::Pending = handle.progress() {
//!     // update the UI
//! }
//! let result = handle.wait()?;
//! mindwave::export::write_export("session", &result)?;
//! ```

pub mod error;

pub use error::{Error, Result};

// Export
#[cfg(feature = "export")]
pub use mindwave_export as export;

#[cfg(feature = "export")]
pub use mindwave_export::{
    AudioChunk, ExportBuilder, ExportFormat, ExportHandle, ExportOptions, ExportResult,
    ExportStatus,
};

#[cfg(feature = "export")]
mod builder;
#[cfg(feature = "export")]
mod session;

#[cfg(feature = "export")]
pub use builder::MindWaveSessionBuilder;
#[cfg(feature = "export")]
pub use session::MindWaveSession;

/// Convenience prelude for common imports
pub mod prelude {
    // Session
    #[cfg(feature = "export")]
    pub use crate::{MindWaveSession, MindWaveSessionBuilder};

    // Export
    #[cfg(feature = "export")]
    pub use crate::export::{
        AudioChunk, BitDepth, ExportBuilder, ExportFormat, ExportHandle, ExportOptions,
        ExportProgress, ExportResult, ExportStatus, ExportWorker, WorkerMessage,
    };
}
