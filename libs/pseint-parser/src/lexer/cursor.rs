//! # Line Scanner
//!
//! Character-level view over a single logical line.
//! Tracks which characters sit outside string literals, parentheses and
//! array brackets so operator and separator searches can ignore nested text.
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::lexer::LineScanner;
//!
//! let scanner = LineScanner::new("a + f(b, c)");
//! assert_eq!(scanner.split_top_level(','), vec!["a + f(b, c)".to_string()]);
//! ```

// =============================================================================
// LINE SCANNER
// =============================================================================

/// Nesting-aware scanner over the characters of one line.
///
/// `top_level[i]` is true when the character at `i` is outside any string
/// literal and at parenthesis/bracket depth zero. Opening and closing
/// delimiters of a depth-zero group count as top level themselves.
#[derive(Debug, Clone)]
pub struct LineScanner {
    /// Characters of the line.
    chars: Vec<char>,
    /// Top-level flag per character.
    top_level: Vec<bool>,
    /// Whether quotes and delimiters are balanced.
    balanced: bool,
}

impl LineScanner {
    /// Create a scanner for `text`.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut top_level = Vec::with_capacity(chars.len());
        let mut in_string = false;
        let mut depth: i64 = 0;
        let mut balanced = true;

        for &c in &chars {
            if in_string {
                top_level.push(false);
                if c == '"' {
                    in_string = false;
                }
                continue;
            }
            match c {
                '"' => {
                    top_level.push(false);
                    in_string = true;
                }
                '(' | '[' => {
                    top_level.push(depth == 0);
                    depth += 1;
                }
                ')' | ']' => {
                    depth -= 1;
                    if depth < 0 {
                        balanced = false;
                        depth = 0;
                    }
                    top_level.push(depth == 0);
                }
                _ => top_level.push(depth == 0),
            }
        }

        if in_string || depth != 0 {
            balanced = false;
        }

        Self {
            chars,
            top_level,
            balanced,
        }
    }

    /// Number of characters in the line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the line has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Characters of the line.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Character at `index`, if any.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// True when quotes, parentheses and brackets all close.
    pub fn is_balanced(&self) -> bool {
        self.balanced
    }

    /// True when the character at `index` is outside any nesting.
    pub fn is_top_level(&self, index: usize) -> bool {
        self.top_level.get(index).copied().unwrap_or(false)
    }

    /// Text between two character indices.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        if start >= end {
            return String::new();
        }
        self.chars[start..end].iter().collect()
    }

    /// First top-level occurrence of `needle`, as a character index.
    pub fn find_top_level(&self, needle: &str) -> Option<usize> {
        let pattern: Vec<char> = needle.chars().collect();
        if pattern.is_empty() || pattern.len() > self.chars.len() {
            return None;
        }
        (0..=self.chars.len() - pattern.len()).find(|&i| {
            self.is_top_level(i) && self.chars[i..i + pattern.len()] == pattern[..]
        })
    }

    /// Split on every top-level `separator`.
    ///
    /// Pieces are trimmed; an empty line yields a single empty piece.
    pub fn split_top_level(&self, separator: char) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for (i, &c) in self.chars.iter().enumerate() {
            if c == separator && self.is_top_level(i) {
                pieces.push(self.slice(start, i).trim().to_string());
                start = i + 1;
            }
        }
        pieces.push(self.slice(start, self.chars.len()).trim().to_string());
        pieces
    }

    /// Index of the delimiter closing the group opened at `open`.
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        let (opening, closing) = match self.chars.get(open)? {
            '(' => ('(', ')'),
            '[' => ('[', ']'),
            _ => return None,
        };
        let mut depth = 0usize;
        let mut in_string = false;
        for (i, &c) in self.chars.iter().enumerate().skip(open) {
            if in_string {
                if c == '"' {
                    in_string = false;
                }
                continue;
            }
            if c == '"' {
                in_string = true;
            } else if c == opening {
                depth += 1;
            } else if c == closing {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_inside_strings_are_nested() {
        let scanner = LineScanner::new("\"a+b\" + c");
        assert!(!scanner.is_top_level(2));
        assert!(scanner.is_top_level(6));
    }

    #[test]
    fn test_brackets_hide_contents() {
        let scanner = LineScanner::new("m[i+1, j] - 2");
        assert_eq!(scanner.find_top_level("+"), None);
        assert_eq!(scanner.find_top_level("-"), Some(10));
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        let scanner = LineScanner::new("a, f(b, c), \"x,y\", m[1,2]");
        assert_eq!(
            scanner.split_top_level(','),
            vec!["a", "f(b, c)", "\"x,y\"", "m[1,2]"]
        );
    }

    #[test]
    fn test_matching_close() {
        let scanner = LineScanner::new("(a + (b)) * c");
        assert_eq!(scanner.matching_close(0), Some(8));
        assert_eq!(scanner.matching_close(5), Some(7));
    }

    #[test]
    fn test_unbalanced_detection() {
        assert!(!LineScanner::new("(a + b").is_balanced());
        assert!(!LineScanner::new("\"open").is_balanced());
        assert!(!LineScanner::new("a)").is_balanced());
        assert!(LineScanner::new("a[(1)]").is_balanced());
    }
}
