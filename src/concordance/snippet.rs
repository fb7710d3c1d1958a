//! Context snippets around a matched word
//!
//! Positions and window sizes are in characters, not bytes.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\b\w+\b").unwrap();
}

const ELLIPSIS: &str = "...";

/// Excerpt of `text` around the first occurrence of `lemma`.
///
/// Lookup order: the lemma as a case-insensitive substring; then the first
/// word token whose lemma (via `lemma_of`) equals `lemma`; then the leading
/// `2 * window` characters of the verse.
pub fn extract_snippet<F>(text: &str, lemma: &str, window: usize, lemma_of: F) -> String
where
    F: Fn(&str) -> String,
{
    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold).collect();

    let target: Vec<char> = lemma.chars().map(fold).collect();
    let found = find_chars(&folded, &target)
        .map(|idx| (idx, target.len()))
        .or_else(|| {
            let token = WORD.find_iter(text).find(|m| lemma_of(m.as_str()) == lemma)?;
            let surface: Vec<char> = token.as_str().chars().map(fold).collect();
            find_chars(&folded, &surface).map(|idx| (idx, surface.len()))
        });

    match found {
        Some((idx, len)) => {
            let start = idx.saturating_sub(window);
            let end = (idx + len + window).min(chars.len());

            let mut snippet = String::new();
            if start > 0 {
                snippet.push_str(ELLIPSIS);
            }
            snippet.extend(&chars[start..end]);
            if end < chars.len() {
                snippet.push_str(ELLIPSIS);
            }
            snippet
        }
        None => {
            let limit = window * 2;
            if chars.len() > limit {
                let mut snippet: String = chars[..limit].iter().collect();
                snippet.push_str(ELLIPSIS);
                snippet
            } else {
                text.to_string()
            }
        }
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
