//! # Operator Scanning
//!
//! Binary operators are found without a token stream: each precedence level
//! scans the expression text right to left for its last top-level operator.
//! Splitting at the last operator of the weakest level first yields
//! left-associative trees (`a - b - c` becomes `(a - b) - c`).
//!
//! ## Operator Precedence
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `O` | Left |
//! | 2 | `Y` | Left |
//! | 3 | `>= <= == != <> > < =` | Left |
//! | 4 | `+ -` | Left |
//! | 5 | `* / % MOD` | Left |
//!
//! `Y` and `O` only match in upper case and on word boundaries so that
//! variables named `y` or `o` keep working.

use crate::ast::BinaryOperator;
use crate::lexer::{is_word_char, LineScanner};

// =============================================================================
// PRECEDENCE
// =============================================================================

/// Binary precedence levels, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    /// Logical or: `O`
    Or,
    /// Logical and: `Y`
    And,
    /// Comparison: `>= <= == != > <`
    Comparison,
    /// Addition/subtraction: `+ -`
    Term,
    /// Multiplication/division: `* / %`
    Factor,
}

/// All levels, in the order they are tried.
pub(super) const LEVELS: [Precedence; 5] = [
    Precedence::Or,
    Precedence::And,
    Precedence::Comparison,
    Precedence::Term,
    Precedence::Factor,
];

/// How an operator spelling is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spelling {
    /// Punctuation, matched exactly.
    Symbol(&'static str),
    /// Word matched exactly (case-sensitive) on word boundaries.
    Word(&'static str),
    /// Word matched case-insensitively on word boundaries.
    WordAnyCase(&'static str),
}

impl Spelling {
    fn text(&self) -> &'static str {
        match self {
            Self::Symbol(s) | Self::Word(s) | Self::WordAnyCase(s) => s,
        }
    }
}

impl Precedence {
    /// Spellings at this level, longest first so `>=` wins over `>`.
    fn operators(&self) -> &'static [(Spelling, BinaryOperator)] {
        match self {
            Self::Or => &[(Spelling::Word("O"), BinaryOperator::Or)],
            Self::And => &[(Spelling::Word("Y"), BinaryOperator::And)],
            Self::Comparison => &[
                (Spelling::Symbol(">="), BinaryOperator::GreaterEqual),
                (Spelling::Symbol("<="), BinaryOperator::LessEqual),
                (Spelling::Symbol("=="), BinaryOperator::Equal),
                (Spelling::Symbol("!="), BinaryOperator::NotEqual),
                (Spelling::Symbol("<>"), BinaryOperator::NotEqual),
                (Spelling::Symbol(">"), BinaryOperator::Greater),
                (Spelling::Symbol("<"), BinaryOperator::Less),
                (Spelling::Symbol("="), BinaryOperator::Equal),
            ],
            Self::Term => &[
                (Spelling::Symbol("+"), BinaryOperator::Add),
                (Spelling::Symbol("-"), BinaryOperator::Subtract),
            ],
            Self::Factor => &[
                (Spelling::Symbol("*"), BinaryOperator::Multiply),
                (Spelling::Symbol("/"), BinaryOperator::Divide),
                (Spelling::Symbol("%"), BinaryOperator::Modulo),
                (Spelling::WordAnyCase("mod"), BinaryOperator::Modulo),
            ],
        }
    }
}

// =============================================================================
// MATCHES
// =============================================================================

/// A binary operator found in expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OperatorMatch {
    /// Character index where the operator starts.
    pub start: usize,
    /// Character length of the operator spelling.
    pub len: usize,
    pub operator: BinaryOperator,
}

/// Find the last top-level operator of `level` in the scanned text.
pub(super) fn find_last_operator(scanner: &LineScanner, level: Precedence) -> Option<OperatorMatch> {
    (0..scanner.len()).rev().find_map(|index| {
        if !scanner.is_top_level(index) {
            return None;
        }
        level.operators().iter().find_map(|(spelling, operator)| {
            spelling_at(scanner, index, *spelling).map(|len| OperatorMatch {
                start: index,
                len,
                operator: *operator,
            })
        })
    })
}

/// Length of `spelling` if it is a valid binary operator at `index`.
fn spelling_at(scanner: &LineScanner, index: usize, spelling: Spelling) -> Option<usize> {
    let chars = scanner.chars();
    let text: Vec<char> = spelling.text().chars().collect();
    let end = index + text.len();
    if end > chars.len() {
        return None;
    }
    let window = &chars[index..end];

    match spelling {
        Spelling::Symbol(symbol) => {
            if window != &text[..] {
                return None;
            }
            if symbol.len() == 1 && is_tail_of_compound(chars, index) {
                return None;
            }
            if matches!(symbol, "<" | ">" | "=") && matches!(chars.get(end), Some('=')) {
                return None;
            }
            if symbol == "<" && matches!(chars.get(end), Some('>') | Some('-')) {
                return None;
            }
            if matches!(symbol, "+" | "-") && is_unary_position(chars, index) {
                return None;
            }
            Some(text.len())
        }
        Spelling::Word(_) => {
            (window == &text[..] && on_word_boundaries(chars, index, end)).then_some(text.len())
        }
        Spelling::WordAnyCase(_) => {
            let same = window
                .iter()
                .zip(&text)
                .all(|(got, want)| got.to_ascii_lowercase() == *want);
            (same && on_word_boundaries(chars, index, end)).then_some(text.len())
        }
    }
}

/// True when the single-character operator at `index` is the second half of
/// a two-character comparison such as `>=` or `<>`.
fn is_tail_of_compound(chars: &[char], index: usize) -> bool {
    let current = chars[index];
    let previous = index.checked_sub(1).and_then(|i| chars.get(i)).copied();
    match (previous, current) {
        (Some('<' | '>' | '=' | '!'), '=') => true,
        (Some('<'), '>') => true,
        (Some('<'), '-') => true,
        _ => false,
    }
}

fn on_word_boundaries(chars: &[char], start: usize, end: usize) -> bool {
    let before = start
        .checked_sub(1)
        .and_then(|i| chars.get(i))
        .map_or(true, |c| !is_word_char(*c));
    let after = chars.get(end).map_or(true, |c| !is_word_char(*c));
    before && after
}

/// True when a `+`/`-` at `index` is a sign rather than a binary operator:
/// nothing precedes it, or the previous token is itself an operator.
fn is_unary_position(chars: &[char], index: usize) -> bool {
    let mut i = index;
    while i > 0 && chars[i - 1].is_whitespace() {
        i -= 1;
    }
    if i == 0 {
        return true;
    }
    let previous = chars[i - 1];
    if "+-*/%<>=!(,[".contains(previous) {
        return true;
    }
    if is_word_char(previous) {
        let mut start = i - 1;
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let word: String = chars[start..i].iter().collect();
        return matches!(word.as_str(), "Y" | "O")
            || matches!(word.to_ascii_lowercase().as_str(), "mod" | "no");
    }
    false
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str, level: Precedence) -> Option<(usize, BinaryOperator)> {
        find_last_operator(&LineScanner::new(text), level).map(|m| (m.start, m.operator))
    }

    #[test]
    fn test_last_operator_wins() {
        assert_eq!(find("a - b - c", Precedence::Term), Some((6, BinaryOperator::Subtract)));
    }

    #[test]
    fn test_compound_comparisons() {
        assert_eq!(find("a >= b", Precedence::Comparison), Some((2, BinaryOperator::GreaterEqual)));
        assert_eq!(find("a <> b", Precedence::Comparison), Some((2, BinaryOperator::NotEqual)));
        assert_eq!(find("a == b", Precedence::Comparison), Some((2, BinaryOperator::Equal)));
        assert_eq!(find("a = b", Precedence::Comparison), Some((2, BinaryOperator::Equal)));
    }

    #[test]
    fn test_unary_signs_are_skipped() {
        assert_eq!(find("-a", Precedence::Term), None);
        assert_eq!(find("2 * -3", Precedence::Term), None);
        assert_eq!(find("a - -1", Precedence::Term), Some((2, BinaryOperator::Subtract)));
    }

    #[test]
    fn test_word_operators_need_boundaries() {
        assert_eq!(find("OY Y YO", Precedence::And), Some((3, BinaryOperator::And)));
        assert_eq!(find("x y z", Precedence::And), None);
        assert_eq!(find("a MOD b", Precedence::Factor), Some((2, BinaryOperator::Modulo)));
        assert_eq!(find("modulo * 2", Precedence::Factor), Some((7, BinaryOperator::Multiply)));
    }

    #[test]
    fn test_nested_operators_are_ignored() {
        assert_eq!(find("f(a + b)", Precedence::Term), None);
        assert_eq!(find("v[i + 1]", Precedence::Term), None);
        assert_eq!(find("\"a + b\"", Precedence::Term), None);
    }
}
