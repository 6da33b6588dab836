//! Text sanitization for harvested posts
//!
//! Each post must map to exactly one output line in the exported file, so
//! embedded line breaks are stripped and curly double quotes are replaced
//! with a tilde.

/// Sanitize one post body for single-line export.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{201C}' | '\u{201D}' => Some('~'),
            '\r' | '\n' => None,
            other => Some(other),
        })
        .collect()
}
