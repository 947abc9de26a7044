//! Markdown code-fence stripping
//!
//! Generators are told to return bare JSON but often wrap it in a
//! ```` ```json ```` block anyway.

const FENCE: &str = "```";

/// Return the body of the first fenced block, or the trimmed input when there is none
///
/// An opening fence without a closing one (a truncated response) yields
/// everything after the opening line.
pub fn strip_code_fence(raw: &str) -> &str {
    let Some(start) = raw.find(FENCE) else {
        return raw.trim();
    };

    let after_fence = &raw[start + FENCE.len()..];
    // skip the info string (`json`, `JSON`, ...) up to the end of the line
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    match body.find(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}
