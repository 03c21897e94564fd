//! Text transforms applied around a provider call

/// Delimiter separating bullet points in a reply
pub const BULLET_DELIMITER: &str = "* ";

/// Split a reply into bullet lines
///
/// Segments between `"* "` delimiters are trimmed and empty ones are
/// dropped. A reply with no delimiter still becomes a one-line sequence.
///
/// # Examples
///
/// ```
/// use chatkeep::conversation::split_reply;
///
/// assert_eq!(
///     split_reply("* First point* Second point"),
///     vec!["First point", "Second point"]
/// );
/// assert_eq!(split_reply("Plain answer"), vec!["Plain answer"]);
/// ```
pub fn split_reply(reply: &str) -> Vec<String> {
    reply
        .split(BULLET_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Session name taken from the first `word_count` words of `text`
///
/// # Examples
///
/// ```
/// use chatkeep::conversation::derive_session_name;
///
/// assert_eq!(
///     derive_session_name("Hello world foo bar baz qux extra", 6),
///     "Hello world foo bar baz qux"
/// );
/// ```
pub fn derive_session_name(text: &str, word_count: usize) -> String {
    text.split_whitespace()
        .take(word_count)
        .collect::<Vec<_>>()
        .join(" ")
}
