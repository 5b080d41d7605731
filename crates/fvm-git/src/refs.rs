const TAG_PREFIX: &str = "refs/tags/";
const PEELED_SUFFIX: &str = "^{}";

/// Tag names from `git ls-remote --tags` output, in remote order.
///
/// Peeled entries of annotated tags and repeated names are dropped.
#[must_use]
pub fn parse_remote_tags(output: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for line in output.lines() {
        let Some(reference) = line.split_whitespace().nth(1) else {
            continue;
        };
        let Some(tag) = reference.strip_prefix(TAG_PREFIX) else {
            continue;
        };
        if tag.is_empty() || tag.ends_with(PEELED_SUFFIX) {
            continue;
        }
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// First non-empty line of a ref query, or `None` when git printed nothing.
///
/// `rev-parse --abbrev-ref HEAD` prints the literal `HEAD` when detached;
/// callers treat that as "no branch".
#[must_use]
pub fn parse_checked_out_ref(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{parse_checked_out_ref, parse_remote_tags};

    #[test]
    fn remote_tags_keep_order_and_drop_peeled_entries() {
        let output = "\
9b2d32b605630f28625709ebd9d78ab3016b2bf6\trefs/tags/v1.0.0
44b7e7d3f42f050a79712daab253af06e9daf530\trefs/tags/v1.0.0^{}
f9bb4289e9fd861d70ae78bcc3a042ef1b35cc9d\trefs/tags/v1.2.0
0123456789abcdef0123456789abcdef01234567\trefs/heads/stable
f9bb4289e9fd861d70ae78bcc3a042ef1b35cc9d\trefs/tags/v1.2.0
";

        assert_eq!(parse_remote_tags(output), vec!["v1.0.0", "v1.2.0"]);
    }

    #[test]
    fn malformed_lines_are_ignored() {
        let output = "garbage\n\nabc refs/tags/\nabc refs/tags/v0.0.6\n";

        assert_eq!(parse_remote_tags(output), vec!["v0.0.6"]);
    }

    #[test]
    fn checked_out_ref_takes_first_line() {
        assert_eq!(parse_checked_out_ref("stable\n"), Some("stable".to_string()));
        assert_eq!(
            parse_checked_out_ref("v1.2.0\nv1.2.0-rc\n"),
            Some("v1.2.0".to_string())
        );
        assert_eq!(parse_checked_out_ref("\n"), None);
    }
}
