//! Sample-domain stages of the export pipeline.

mod assemble;
mod envelope;

pub use assemble::{assemble, assembled_len, overlap_len};
pub(crate) use assemble::validate_request;
pub use envelope::{apply_edge_fades, edge_fade_len};
