/// Status reported when no valid HTTP status could be determined.
///
/// Callers should treat it exactly like a network failure.
pub const SENTINEL_STATUS: i16 = -1;

/// Parses the numeric code out of a status line such as `HTTP/1.1 200 OK`.
///
/// The code is the token between the first space and the next space (or the
/// end of the line). A line without a space, an empty token or a token that
/// is not a plain decimal number yields [`SENTINEL_STATUS`].
pub fn extract_status_code(status_line: &str) -> i16 {
    let line = status_line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let Some((_, rest)) = line.split_once(' ') else {
        return SENTINEL_STATUS;
    };
    let token = rest.split(' ').next().unwrap_or("");
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return SENTINEL_STATUS;
    }
    token.parse().unwrap_or(SENTINEL_STATUS)
}

/// Codes that need no diagnostic output: 200, 201, 202 and 204.
pub fn is_quiet(status_code: i16) -> bool {
    matches!(status_code, 200 | 201 | 202 | 204)
}
