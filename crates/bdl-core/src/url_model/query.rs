//! Filename extraction from the `filename=` query component.

/// Returns the percent-decoded value of the last `filename` query parameter.
///
/// Returns `None` if the URL cannot be parsed or has no such parameter.
pub fn filename_from_query(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .filter(|(k, _)| k == "filename")
        .last()
        .map(|(_, v)| v.into_owned())
}
