//! ROUGE tokenization
//!
//! Lowercase, keep only `[a-z0-9]` runs, stem tokens longer than three
//! characters.

use super::porter;

/// Tokens shorter than this are never stemmed
const MIN_STEM_LEN: usize = 4;

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Split `text` into ROUGE tokens, optionally stemming them
pub fn tokenize(text: &str, use_stemmer: bool) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .map(|token| {
            if use_stemmer && token.len() >= MIN_STEM_LEN {
                porter::stem(token)
            } else {
                token.to_string()
            }
        })
        .filter(|token| !token.is_empty() && token.chars().all(is_token_char))
        .collect()
}
