//! # Keywords
//!
//! Case- and accent-insensitive keyword matching over raw line text.
//!
//! PSeInt keywords are written in Spanish and students mix `Según`/`Segun`
//! and `FinSi`/`Fin Si` freely, so every comparison goes through [`fold`].
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::lexer::strip_keyword;
//!
//! assert_eq!(strip_keyword("Según x Hacer", "segun"), Some("x Hacer"));
//! assert_eq!(strip_keyword("Segundo <- 1", "segun"), None);
//! ```

use super::LineScanner;

// =============================================================================
// CHARACTER CLASSES
// =============================================================================

/// Lowercase a character and drop Spanish diacritics.
pub fn fold(c: char) -> char {
    match c {
        'á' | 'Á' => 'a',
        'é' | 'É' => 'e',
        'í' | 'Í' => 'i',
        'ó' | 'Ó' => 'o',
        'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Folded copy of `text`.
pub fn folded(text: &str) -> String {
    text.chars().map(fold).collect()
}

/// Folded copy of `text` with all whitespace removed.
///
/// Used for terminators, where `Fin Si` and `FinSi` are the same word.
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(fold)
        .collect()
}

/// Characters that can appear inside an identifier.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `text` is a valid identifier.
///
/// ## Example
///
/// ```rust
/// use pseint_parser::lexer::is_identifier;
///
/// assert!(is_identifier("contador_2"));
/// assert!(is_identifier("año"));
/// assert!(!is_identifier("2x"));
/// ```
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars.all(is_word_char),
        _ => false,
    }
}

// =============================================================================
// PHRASE MATCHING
// =============================================================================

/// Match a keyword phrase starting at byte `start` of `text`.
///
/// `phrase` is written folded with single spaces between words; the text may
/// use any amount of whitespace between them. The match must end on a word
/// boundary.
///
/// ## Returns
///
/// Byte offset just past the phrase.
pub fn match_phrase_at(text: &str, start: usize, phrase: &str) -> Option<usize> {
    let mut pos = start;
    for (word_index, word) in phrase.split(' ').enumerate() {
        if word_index > 0 {
            let rest = text.get(pos..)?;
            let skipped = rest.len() - rest.trim_start().len();
            if skipped == 0 {
                return None;
            }
            pos += skipped;
        }
        for want in word.chars() {
            let got = text.get(pos..)?.chars().next()?;
            if fold(got) != want {
                return None;
            }
            pos += got.len_utf8();
        }
    }
    match text.get(pos..)?.chars().next() {
        Some(c) if is_word_char(c) => None,
        _ => Some(pos),
    }
}

/// If `text` starts with `phrase`, return what follows it, trimmed.
pub fn strip_keyword<'a>(text: &'a str, phrase: &str) -> Option<&'a str> {
    let text = text.trim_start();
    match_phrase_at(text, 0, phrase).map(|end| text[end..].trim())
}

/// Top-level occurrences of `phrase` in `text` as `(start, end)` byte ranges.
///
/// Occurrences inside string literals, parentheses or brackets, and those
/// not preceded by a word boundary, are skipped.
pub fn find_keywords(text: &str, phrase: &str) -> Vec<(usize, usize)> {
    let scanner = LineScanner::new(text);
    let mut found = Vec::new();
    let mut previous: Option<char> = None;
    for (char_index, (byte, c)) in text.char_indices().enumerate() {
        let boundary = previous.map_or(true, |p| !is_word_char(p));
        previous = Some(c);
        if !boundary || !scanner.is_top_level(char_index) {
            continue;
        }
        if let Some(end) = match_phrase_at(text, byte, phrase) {
            found.push((byte, end));
        }
    }
    found
}

/// First top-level occurrence of `phrase`.
pub fn find_keyword(text: &str, phrase: &str) -> Option<(usize, usize)> {
    find_keywords(text, phrase).into_iter().next()
}

/// Last top-level occurrence of `phrase`.
pub fn find_last_keyword(text: &str, phrase: &str) -> Option<(usize, usize)> {
    find_keywords(text, phrase).into_iter().last()
}

/// Split `text` around the last top-level `phrase`.
///
/// ## Returns
///
/// `(before, after)` both trimmed, or None when the phrase is absent.
pub fn split_at_last_keyword<'a>(text: &'a str, phrase: &str) -> Option<(&'a str, &'a str)> {
    find_last_keyword(text, phrase).map(|(start, end)| (text[..start].trim(), text[end..].trim()))
}

/// Split `text` around the first top-level `phrase`.
pub fn split_at_keyword<'a>(text: &'a str, phrase: &str) -> Option<(&'a str, &'a str)> {
    find_keyword(text, phrase).map(|(start, end)| (text[..start].trim(), text[end..].trim()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents() {
        assert_eq!(folded("Según LÓGICO Carácter"), "segun logico caracter");
    }

    #[test]
    fn test_compact_joins_words() {
        assert_eq!(compact("Fin Si"), "finsi");
        assert_eq!(compact("FinSegún"), "finsegun");
    }

    #[test]
    fn test_strip_keyword_multiword() {
        assert_eq!(strip_keyword("De  Otro Modo:", "de otro modo"), Some(":"));
        assert_eq!(strip_keyword("Hasta Que x > 3", "hasta que"), Some("x > 3"));
        assert_eq!(strip_keyword("HastaQue x", "hasta que"), None);
    }

    #[test]
    fn test_strip_keyword_requires_boundary() {
        assert_eq!(strip_keyword("Leer x", "leer"), Some("x"));
        assert_eq!(strip_keyword("Leerx", "leer"), None);
        assert_eq!(strip_keyword("Leer(x)", "leer"), Some("(x)"));
    }

    #[test]
    fn test_find_keyword_skips_strings_and_words() {
        let text = "Si \"Entonces\" = x_entonces Entonces";
        let (start, _) = find_last_keyword(text, "entonces").unwrap();
        assert_eq!(&text[start..], "Entonces");
        assert_eq!(find_keywords(text, "entonces").len(), 1);
    }

    #[test]
    fn test_split_at_keyword() {
        assert_eq!(
            split_at_keyword("i <- 1 Hasta n Con Paso 2 Hacer", "hasta"),
            Some(("i <- 1", "n Con Paso 2 Hacer"))
        );
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_tmp"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("v[1]"));
    }
}
