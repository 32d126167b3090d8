//! Centralized error type for the mindwave umbrella crate.
//!
//! Wraps subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "export")]
    #[error("Export: {0}")]
    Export(#[from] mindwave_export::ExportError),

    #[error("Session: {0}")]
    Session(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
