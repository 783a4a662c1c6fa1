use regex::Regex;
use std::sync::LazyLock;

static RE_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid filename pattern"));
static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid separator pattern"));

/// Make a company name safe to use as a file name stem.
///
/// Drops everything but word characters, whitespace and hyphens, then
/// collapses each run of whitespace and hyphens into one underscore.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = RE_UNSAFE.replace_all(name, "");
    let collapsed = RE_SEPARATORS.replace_all(cleaned.trim(), "_");
    if collapsed.is_empty() {
        "untitled".to_string()
    } else {
        collapsed.into_owned()
    }
}

/// Prefix `http://` when a URL has no scheme.
pub fn add_http_if_missing(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Acme Corp."), "Acme_Corp");
        assert_eq!(sanitize_filename("  Foo -- Bar & Baz "), "Foo_Bar_Baz");
        assert_eq!(sanitize_filename("north_star"), "north_star");
        assert_eq!(sanitize_filename("!!!"), "untitled");
        assert_eq!(sanitize_filename(""), "untitled");
    }

    #[test]
    fn test_add_http_if_missing() {
        assert_eq!(add_http_if_missing("acme.com"), "http://acme.com");
        assert_eq!(add_http_if_missing(" https://acme.com "), "https://acme.com");
        assert_eq!(add_http_if_missing("http://acme.com/a"), "http://acme.com/a");
    }
}
