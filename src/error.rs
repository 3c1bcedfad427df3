//! The one fallible boundary in this core: loading a ROM image at machine construction.
//!
//! Everything past construction is infallible by design (§7 of the design doc): unmapped reads
//! return a sentinel, illegal opcodes no-op, unsupported MBC writes are dropped. All of that is
//! logged through the `log` facade rather than surfaced as an error.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error("failed to load ROM from `{path}`: {source}")]
    RomLoad {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("ROM image is too small to contain a header ({len} bytes)")]
    RomTooSmall { len: usize },
}
