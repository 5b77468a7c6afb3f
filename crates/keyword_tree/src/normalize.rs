//! Candidate normalization shared by tree construction and lookup.
//!
//! Both sides must agree character for character, so there is exactly one
//! implementation: split on Unicode whitespace, rejoin with single ASCII
//! spaces, and lowercase each character on its own. Per-character lowercasing
//! ignores context-sensitive rules such as the final sigma, which keeps
//! [`normalized_chars`] allocation-free and identical to [`normalize`].

/// Lazily yields the normalized characters of `text`.
///
/// ```
/// use keyword_tree::normalized_chars;
///
/// let chars: String = normalized_chars("  Rabbits \t INC ").collect();
/// assert_eq!(chars, "rabbits inc");
/// ```
pub fn normalized_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.split_whitespace()
        .enumerate()
        .flat_map(|(i, word)| (i > 0).then_some(' ').into_iter().chain(word.chars()))
        .flat_map(char::to_lowercase)
}

/// Collects [`normalized_chars`] into an owned string.
pub fn normalize(text: &str) -> String {
    normalized_chars(text).collect()
}
