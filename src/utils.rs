/// Maximum accepted length, in characters, for the raw `url` field.
const MAX_URL_INPUT_CHARS: usize = 2048;

/// Trim the raw `url` input and strip control characters before validation.
pub fn sanitize_url_input(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_URL_INPUT_CHARS)
        .collect()
}
