//! Content-to-block synthesis.
//!
//! Converts free-form text (including markdown-style tables and fenced code)
//! into an ordered sequence of structured [Block] records obeying a strict
//! per-block size limit. Pure logic, no I/O: the wire mapping to the remote
//! document service lives in `engram-providers`.

pub mod block;
pub mod chunk;
pub mod error;
pub mod synth;
pub mod table;

pub use block::{Block, BlockKind, DEFAULT_CODE_LANGUAGE, TableBlock};
pub use chunk::chunk;
pub use error::ContentError;
pub use synth::{page_blocks, section_blocks};
pub use table::{ParsedTable, parse_table};
