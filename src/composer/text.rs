use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string for comparison: canonical decomposition with combining
/// marks removed, lowercased, inner whitespace collapsed to single spaces.
pub fn search_key(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Two person names refer to the same person.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = search_key(a);
    !a.is_empty() && a == search_key(b)
}
