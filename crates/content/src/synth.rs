//! Block synthesis: free-form text in, ordered block records out.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockKind, TableBlock};
use crate::chunk::chunk;
use crate::error::ContentError;
use crate::table::parse_table;

/// Opening fence, optionally tagged with a language: ```` ```rust ````.
static FENCE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```(?:[\w\+\-]+)?\n?").unwrap_or_else(|e| panic!("invalid fence pattern: {e}"))
});

/// Closing fence at end of input.
static FENCE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n?```$").unwrap_or_else(|e| panic!("invalid fence pattern: {e}")));

/// Strip one leading and one trailing code fence, if present.
///
/// The opening fence may carry a language tag; it is discarded in favour of
/// the caller-supplied language.
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    let without_open = FENCE_OPEN_RE.replace(trimmed, "");
    FENCE_CLOSE_RE.replace(&without_open, "").into_owned()
}

/// Produce the block sequence for appending a titled section to a page.
///
/// A heading block carrying `title` always comes first, followed by the body
/// rendered per `kind`:
///
/// - text kinds chunk the body to `max_len` characters and emit one block
///   per chunk;
/// - `code` strips surrounding fences first and tags every chunk with
///   `language`;
/// - `table` delegates to the table parser and emits exactly one table
///   block, never chunked.
///
/// Unknown kinds are rejected by [BlockKind]'s parser before this function
/// is reached, so chunking never happens for them.
pub fn section_blocks(
    title: &str, body: &str, kind: BlockKind, language: &str, max_len: usize,
) -> Result<Vec<Block>, ContentError> {
    let mut blocks = vec![Block::Heading { text: title.to_string() }];

    match kind {
        BlockKind::Code => {
            let cleaned = strip_code_fences(body);
            for piece in chunk(&cleaned, max_len) {
                blocks.push(Block::Code { text: piece, language: language.to_string() });
            }
        }
        BlockKind::Table => {
            let parsed = parse_table(body)?;
            blocks.push(Block::Table(TableBlock {
                width: parsed.width,
                has_header: parsed.has_header,
                rows: parsed.rows,
            }));
        }
        BlockKind::Paragraph => {
            for piece in chunk(body, max_len) {
                blocks.push(Block::Paragraph { text: piece });
            }
        }
        BlockKind::BulletedListItem => {
            for piece in chunk(body, max_len) {
                blocks.push(Block::Bulleted { text: piece });
            }
        }
    }

    Ok(blocks)
}

/// Produce the block sequence for a fresh top-level page.
///
/// No heading is emitted; the body alone is chunked into paragraphs. An
/// empty body yields an empty sequence.
pub fn page_blocks(body: &str, max_len: usize) -> Vec<Block> {
    chunk(body, max_len)
        .into_iter()
        .map(|piece| Block::Paragraph { text: piece })
        .collect()
}
