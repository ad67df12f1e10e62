//! Reason phrase extraction from an HTTP status line.

/// Reason phrase of `status_line` (e.g. "Not Found" from "HTTP/1.1 404 Not Found").
///
/// HTTP/2 status lines carry no phrase; then the canonical phrase for `code`
/// is used, or "HTTP <code>" for codes without one.
pub fn reason_phrase(status_line: Option<&str>, code: u32) -> String {
    let from_line = status_line
        .and_then(|line| line.splitn(3, ' ').nth(2))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match from_line {
        Some(reason) => reason.to_string(),
        None => canonical_reason(code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", code)),
    }
}

fn canonical_reason(code: u32) -> Option<&'static str> {
    let reason = match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    };
    Some(reason)
}
