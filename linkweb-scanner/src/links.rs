//! Turning raw `href` values into absolute link targets.

use url::Url;

/// Schemes and prefixes that never point at another page.
const SKIPPED_PREFIXES: [&str; 4] = ["javascript:", "mailto:", "tel:", "#"];

/// Whether an `href` value is worth resolving at all.
pub fn is_followable(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty() && !SKIPPED_PREFIXES.iter().any(|prefix| href.starts_with(prefix))
}

/// Resolve `href` against the page it was found on.
///
/// Returns `None` for non-navigational hrefs and for anything that does not
/// join into a valid URL. Fragments are dropped so `page#a` and `page#b`
/// count as the same target.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    if !is_followable(href) {
        return None;
    }

    let mut resolved = base.join(href.trim()).ok()?;
    resolved.set_fragment(None);

    Some(resolved.to_string())
}

/// Resolve every href found on `page_url`, preserving duplicates and order.
pub fn resolve_all<'a, I>(page_url: &str, hrefs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    hrefs
        .into_iter()
        .filter_map(|href| resolve_url(&base, href))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/docs/index.html").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve_url(&base(), "guide.html"),
            Some("http://example.com/docs/guide.html".to_string())
        );
    }

    #[test]
    fn test_resolve_root_relative_path() {
        assert_eq!(
            resolve_url(&base(), "/about"),
            Some("http://example.com/about".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_other_host() {
        assert_eq!(
            resolve_url(&base(), "https://other.org/x"),
            Some("https://other.org/x".to_string())
        );
    }

    #[test]
    fn test_resolve_drops_fragment() {
        assert_eq!(
            resolve_url(&base(), "/about#team"),
            Some("http://example.com/about".to_string())
        );
    }

    #[test]
    fn test_skips_non_navigational_hrefs() {
        for href in ["javascript:void(0)", "mailto:a@b.c", "tel:123", "#top", "", "   "] {
            assert_eq!(resolve_url(&base(), href), None, "href {:?}", href);
        }
    }

    #[test]
    fn test_resolve_all_keeps_duplicates() {
        let links = resolve_all(
            "http://example.com/",
            ["/a", "/a", "mailto:x@y.z", "/b"],
        );
        assert_eq!(
            links,
            vec![
                "http://example.com/a",
                "http://example.com/a",
                "http://example.com/b"
            ]
        );
    }

    #[test]
    fn test_resolve_all_invalid_base() {
        assert!(resolve_all("not a url", ["/a"]).is_empty());
    }
}
