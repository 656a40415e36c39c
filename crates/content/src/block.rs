//! The structured block model submitted to the document service.

use std::fmt;
use std::str::FromStr;

use crate::error::ContentError;

/// Language tag applied to code blocks when the caller supplies none.
pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

/// The caller-selectable block kinds for section writes.
///
/// Headings are not in this set: the synthesizer emits them itself for
/// section titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// Plain text paragraph (default)
    #[default]
    Paragraph,
    /// Bulleted list item
    BulletedListItem,
    /// Fenced code with a language tag
    Code,
    /// Pipe-delimited table
    Table,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::Code => "code",
            BlockKind::Table => "table",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paragraph" => Ok(BlockKind::Paragraph),
            "bulleted_list_item" => Ok(BlockKind::BulletedListItem),
            "code" => Ok(BlockKind::Code),
            "table" => Ok(BlockKind::Table),
            other => Err(ContentError::InvalidKind(other.to_string())),
        }
    }
}

/// A table payload: a rectangular grid plus header flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Column count, fixed by the first data row
    pub width: usize,
    /// Whether the first row is a column header
    pub has_header: bool,
    /// Cell grid, each row padded to `width`
    pub rows: Vec<Vec<String>>,
}

/// A single content unit ready for submission to the document service.
///
/// Blocks are constructed fresh per write invocation, submitted, then
/// discarded; they carry no identity and are never read back. Every text
/// payload is at or below the configured per-block character budget, except
/// tables, which are emitted as a single unchunked unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading (rendered as a second-level heading remotely)
    Heading { text: String },
    /// Plain paragraph text
    Paragraph { text: String },
    /// Bulleted list item
    Bulleted { text: String },
    /// Code with a language tag
    Code { text: String, language: String },
    /// Table grid
    Table(TableBlock),
}
