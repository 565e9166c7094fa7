//! Fallback filename: the last non-empty segment of the URL path.

/// Last path segment of `url`, still percent-encoded as it appears in the URL.
///
/// `None` for unparsable URLs, URLs without a hierarchical path, a bare root,
/// or a final `.`/`..` segment.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .rev()
        .find(|seg| !seg.is_empty())
        .filter(|seg| !matches!(*seg, "." | ".."))
        .map(str::to_string)
}
