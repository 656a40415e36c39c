//! Markdown-style pipe-table parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ContentError;

/// A line consisting only of pipes, dashes, colons and whitespace is a
/// header-separator marker, e.g. `|---|:---:|`.
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?[\s\-:|]+\|?\s*$").unwrap_or_else(|e| panic!("invalid separator pattern: {e}"))
});

/// A rectangular grid of trimmed cells parsed from pipe-delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Data rows, each padded to `width` cells
    pub rows: Vec<Vec<String>>,
    /// Cell count of the first data row; rows are never truncated to it
    pub width: usize,
    /// Whether a separator appeared as the second line (first row is a header)
    pub has_header: bool,
}

/// Parse markdown-style pipe-delimited text into a rectangular grid.
///
/// Separator lines are dropped wherever they appear; only a separator on the
/// second line marks the first row as a header. A leading or trailing empty
/// cell produced by an enclosing pipe is stripped, every cell is trimmed,
/// and lines left with zero cells are skipped. Rows shorter than the first
/// data row are right-padded with empty cells.
///
/// Fails when no data rows remain.
pub fn parse_table(text: &str) -> Result<ParsedTable, ContentError> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut has_header = false;

    for (i, line) in text.trim().split('\n').enumerate() {
        if SEPARATOR_RE.is_match(line) {
            if i == 1 {
                has_header = true;
            }
            continue;
        }

        let trimmed = line.trim();
        let mut cells: Vec<String> = line.split('|').map(|cell| cell.trim().to_string()).collect();
        if trimmed.starts_with('|') && !cells.is_empty() {
            cells.remove(0);
        }
        if trimmed.ends_with('|') && !cells.is_empty() {
            cells.pop();
        }

        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        return Err(ContentError::UnparseableTable);
    }

    let width = rows[0].len();
    for row in &mut rows {
        while row.len() < width {
            row.push(String::new());
        }
    }

    Ok(ParsedTable { rows, width, has_header })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_table_with_separator() {
        let parsed = parse_table("a|b\n--|--\n1|2").unwrap();
        assert!(parsed.has_header);
        assert_eq!(parsed.width, 2);
        assert_eq!(
            parsed.rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ]
        );
    }

    #[test]
    fn test_pipe_enclosed_table() {
        let parsed = parse_table("| Name | Age |\n|------|-----|\n| Ada  | 36  |").unwrap();
        assert!(parsed.has_header);
        assert_eq!(
            parsed.rows,
            vec![
                vec!["Name".to_string(), "Age".to_string()],
                vec!["Ada".to_string(), "36".to_string()],
            ]
        );
    }

    #[test]
    fn test_separator_elsewhere_does_not_mark_header() {
        let parsed = parse_table("a|b\n1|2\n--|--\n3|4").unwrap();
        assert!(!parsed.has_header);
        assert_eq!(parsed.rows.len(), 3);
    }

    #[test]
    fn test_no_separator_no_header() {
        let parsed = parse_table("a|b\n1|2").unwrap();
        assert!(!parsed.has_header);
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn test_short_rows_padded_to_first_row_width() {
        let parsed = parse_table("a|b|c\n1|2").unwrap();
        assert_eq!(parsed.width, 3);
        assert_eq!(
            parsed.rows[1],
            vec!["1".to_string(), "2".to_string(), String::new()]
        );
    }

    #[test]
    fn test_long_rows_never_truncated() {
        let parsed = parse_table("a|b\n1|2|3").unwrap();
        assert_eq!(parsed.width, 2);
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_only_separators_fails() {
        assert_eq!(
            parse_table("|---|---|\n| --- |"),
            Err(ContentError::UnparseableTable)
        );
    }

    #[test]
    fn test_cells_are_trimmed() {
        let parsed = parse_table("  left |  right  ").unwrap();
        assert_eq!(parsed.rows, vec![vec!["left".to_string(), "right".to_string()]]);
    }
}
