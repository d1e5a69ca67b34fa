/// Join `base` and `path` with exactly one `/` between them.
///
/// At most one trailing slash is removed from `base` and at most one leading
/// slash from `path`; every other slash is left alone.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        assert_eq!(
            join_url("https://example.com/", "/api/foo"),
            "https://example.com/api/foo"
        );
        assert_eq!(
            join_url("https://example.com", "api/foo"),
            "https://example.com/api/foo"
        );
        assert_eq!(
            join_url("https://example.com/", "api/foo"),
            "https://example.com/api/foo"
        );
    }

    #[test]
    fn keeps_internal_and_trailing_path_slashes() {
        assert_eq!(
            join_url("https://www.commcarehq.org/", "/a/demo/receiver/"),
            "https://www.commcarehq.org/a/demo/receiver/"
        );
        assert_eq!(join_url("http://h/x//y", "p//q"), "http://h/x//y/p//q");
    }

    #[test]
    fn strips_only_one_slash_each_side() {
        assert_eq!(join_url("http://h//", "//p"), "http://h///p");
    }

    #[test]
    fn repeated_application_is_stable() {
        let once = join_url("http://h/", "/p");
        assert_eq!(join_url("http://h/", "/p"), once);
        let twice = join_url(&once, "");
        assert_eq!(twice, "http://h/p/");
        assert_eq!(join_url(&twice, ""), twice);
    }

    #[test]
    fn never_doubles_the_join_point() {
        let bases = ["http://h", "http://h/", "http://h/a", "http://h/a/"];
        let paths = ["p", "/p", "p/", "/p/q"];
        for base in bases {
            for path in paths {
                let joined = join_url(base, path);
                let trimmed_base = base.strip_suffix('/').unwrap_or(base);
                assert!(joined.starts_with(trimmed_base));
                assert_eq!(joined.as_bytes()[trimmed_base.len()], b'/');
                assert_ne!(joined.as_bytes()[trimmed_base.len() + 1], b'/');
            }
        }
    }
}
