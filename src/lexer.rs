//! Whitespace tokenization of command segments.

/// Split a command segment into its argument tokens.
///
/// Tokens are separated by spaces and tabs; runs of separators collapse, so
/// an empty or whitespace-only segment yields no tokens at all.
pub fn split_into_tokens(segment: &str) -> Vec<String> {
    segment.split_whitespace().map(str::to_owned).collect()
}
