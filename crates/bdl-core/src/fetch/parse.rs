//! Parse HTTP response header lines into ResponseHead.

/// Status line and headers of the final response that matter to a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHead {
    /// HTTP status code (e.g. 200, 206, 404).
    pub status: u32,
    /// Declared body length, if `Content-Length` is present and valid.
    pub content_length: Option<u64>,
}

/// Parses one header block (status line first). Lines from earlier blocks
/// (redirects) must already have been discarded by the caller.
///
/// Returns `None` when no status line is present.
pub fn parse_head(lines: &[String]) -> Option<ResponseHead> {
    let mut status = None;
    let mut content_length = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse::<u32>().ok());
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    status.map(|status| ResponseHead {
        status,
        content_length,
    })
}
