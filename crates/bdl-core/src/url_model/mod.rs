//! URL modeling and filename derivation.
//!
//! Batch URLs carry their suggested filename in a `filename=` query
//! component; the decoded value becomes the local file name. URLs without one
//! fall back to the last path segment.

mod path;
mod query;
mod sanitize;

pub use path::filename_from_url_path;
pub use query::filename_from_query;
pub use sanitize::sanitize_filename;

/// Default filename when neither the query nor the path yields anything usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename for saving a download.
///
/// # Examples
///
/// - `derive_filename("https://host/dl?id=7&filename=My%20Report.pdf")` → `"My Report.pdf"`
/// - `derive_filename("https://example.com/archive.zip")` → `"archive.zip"`
pub fn derive_filename(url: &str) -> String {
    let candidate = filename_from_query(url)
        .filter(|s| !s.is_empty())
        .or_else(|| filename_from_url_path(url));

    let raw = match candidate {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_filename_from_query_parameter() {
        assert_eq!(
            derive_filename("https://cdn.example.com/get?id=12&filename=Season%201.mkv"),
            "Season 1.mkv"
        );
        assert_eq!(
            derive_filename("https://cdn.example.com/get?filename=a.zip&token=xyz"),
            "a.zip"
        );
    }

    #[test]
    fn derive_filename_query_overrides_path() {
        assert_eq!(
            derive_filename("https://example.com/archive.zip?filename=real-name.tar.gz"),
            "real-name.tar.gz"
        );
    }

    #[test]
    fn derive_filename_from_url_path() {
        assert_eq!(
            derive_filename("https://cdn.example.com/path/to/debian-12.iso"),
            "debian-12.iso"
        );
    }

    #[test]
    fn derive_filename_empty_fallback() {
        assert_eq!(derive_filename("https://example.com/"), "download.bin");
        assert_eq!(derive_filename("https://example.com/?filename="), "download.bin");
        assert_eq!(derive_filename("not a url"), "download.bin");
    }

    #[test]
    fn derive_filename_rejects_traversal() {
        assert_eq!(
            derive_filename("https://example.com/x?filename=..%2F..%2Fetc%2Fpasswd"),
            "_.._etc_passwd"
        );
        assert_eq!(derive_filename("https://example.com/x?filename=.."), "download.bin");
    }
}
