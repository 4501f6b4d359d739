//! Canonical form for URLs so equivalent links dedupe to one graph node.

/// Strip every leading and trailing `/` from `raw`.
///
/// Nothing else is touched: case, query strings, fragments and dot segments
/// are kept as-is. `normalize(normalize(s)) == normalize(s)` for any input.
pub fn normalize(raw: &str) -> String {
    raw.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(normalize("http://a.com/p1/"), "http://a.com/p1");
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize("http://a.com/"), "http://a.com");
    }

    #[test]
    fn test_normalize_repeated_slashes() {
        assert_eq!(normalize("//a.com/x///"), "a.com/x");
    }

    #[test]
    fn test_normalize_keeps_whitespace_case_and_query() {
        assert_eq!(normalize(" http://A.com/Path?q=1#frag "), " http://A.com/Path?q=1#frag ");
        assert_eq!(normalize("http://a.com/./x/../y"), "http://a.com/./x/../y");
    }

    #[test]
    fn test_normalize_only_slashes() {
        assert_eq!(normalize("///"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "http://a.com/",
            "/relative/path/",
            "////",
            "http://a.com/p?x=/",
            "no-slashes",
            "http://a.com//double//",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {:?}", sample);
        }
    }
}
