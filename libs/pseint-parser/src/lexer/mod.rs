//! # PSeInt Line Normalizer
//!
//! PSeInt is line oriented, so there is no token stream: the lexer turns the
//! raw source into logical lines, each tagged with the 1-based number of the
//! physical line it came from.
//!
//! ## Rules
//!
//! - `//` starts a comment that runs to the end of the physical line
//!   (except inside a string literal)
//! - `;` separates statements; several statements may share one line
//! - lines are trimmed and empty ones are dropped
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::lexer::normalize_lines;
//!
//! let lines = normalize_lines("Algoritmo A\n\n  x <- 1; // uno\nFinAlgoritmo");
//! assert_eq!(lines.len(), 3);
//! assert_eq!(lines[1].number, 3);
//! assert_eq!(lines[1].text, "x <- 1");
//! ```

mod cursor;
mod keywords;

pub use cursor::LineScanner;
pub use keywords::{
    compact, find_keyword, find_keywords, find_last_keyword, fold, folded, is_identifier,
    is_word_char, match_phrase_at, split_at_keyword, split_at_last_keyword, strip_keyword,
};

use serde::{Deserialize, Serialize};

// =============================================================================
// SOURCE LINE
// =============================================================================

/// One logical line of source with its original line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    /// 1-based physical line number.
    pub number: usize,
    /// Trimmed text, without comment or statement separator.
    pub text: String,
}

impl SourceLine {
    /// Create a new source line.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

// =============================================================================
// NORMALIZER
// =============================================================================

/// Split source text into logical lines.
///
/// ## Parameters
///
/// - `source`: Raw program text, any line ending
///
/// ## Returns
///
/// Ordered non-empty lines tagged with their physical line number.
pub fn normalize_lines(source: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let code = strip_comment(raw);
        for piece in split_statements(code) {
            let piece = piece.trim();
            if !piece.is_empty() {
                lines.push(SourceLine::new(index + 1, piece));
            }
        }
    }
    lines
}

/// Remove a trailing `//` comment that is not inside a string literal.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut previous_slash = false;
    for (byte, c) in line.char_indices() {
        if c == '"' {
            in_string = !in_string;
            previous_slash = false;
            continue;
        }
        if in_string {
            continue;
        }
        if c == '/' && previous_slash {
            return &line[..byte - 1];
        }
        previous_slash = c == '/';
    }
    line
}

/// Split on `;` outside string literals and parentheses.
fn split_statements(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut in_string = false;
    let mut depth = 0i64;
    let mut start = 0;
    for (byte, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' if !in_string => depth += 1,
            ')' | ']' if !in_string => depth -= 1,
            ';' if !in_string && depth <= 0 => {
                pieces.push(&line[start..byte]);
                start = byte + 1;
            }
            _ => {}
        }
    }
    pieces.push(&line[start..]);
    pieces
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_and_comments_are_dropped() {
        let lines = normalize_lines("\n// solo comentario\n   \nEscribir 1;\n");
        assert_eq!(lines, vec![SourceLine::new(4, "Escribir 1")]);
    }

    #[test]
    fn test_comment_inside_string_is_kept() {
        let lines = normalize_lines("Escribir \"http://x\"; // fin");
        assert_eq!(lines[0].text, "Escribir \"http://x\"");
    }

    #[test]
    fn test_semicolons_split_statements() {
        let lines = normalize_lines("a <- 1; b <- 2;\nEscribir \"x;y\"");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a <- 1", "b <- 2", "Escribir \"x;y\""]);
        assert_eq!(lines[1].number, 1);
        assert_eq!(lines[2].number, 2);
    }

    #[test]
    fn test_windows_line_endings() {
        let lines = normalize_lines("Algoritmo A\r\nFinAlgoritmo\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Algoritmo A");
    }
}
