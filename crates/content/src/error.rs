use thiserror::Error;

/// Errors produced while turning free-form text into blocks.
///
/// Both variants are terminal, non-retryable outcomes for the call that
/// produced them; the tool layer renders them as user-facing text (prefixed
/// with `Error: `) and makes no remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The requested block kind is not in the caller-selectable set
    #[error("Invalid type '{0}'. Must be 'paragraph', 'bulleted_list_item', 'code', or 'table'.")]
    InvalidKind(String),

    /// Table text yielded no data rows
    #[error("Could not parse table content.")]
    UnparseableTable,
}
