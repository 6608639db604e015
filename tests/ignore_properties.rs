// tests/ignore_properties.rs

use proptest::prelude::*;

use hotrun::watch::IgnoreRule;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}(\\.[a-z]{1,3})?"
}

fn parents() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z0-9_]{1,6}", 0..5)
}

proptest! {
    // A slash-free literal ignores that name at any depth, and anything
    // beneath it.
    #[test]
    fn literal_segment_matches_at_any_depth(
        name in segment(),
        dirs in parents(),
        below in parents(),
    ) {
        let rule = IgnoreRule::try_parse(&name).unwrap();

        let mut parts = dirs.clone();
        parts.push(name.clone());
        parts.extend(below);
        let path = parts.join("/");

        prop_assert!(rule.matches(&path), "{name:?} should ignore {path:?}");
    }

    // Parents are upper-case so none of them can equal `name`.
    #[test]
    fn literal_segment_needs_a_whole_segment(
        name in segment(),
        dirs in proptest::collection::vec("[A-Z]{1,6}", 0..5),
    ) {
        let rule = IgnoreRule::try_parse(&name).unwrap();

        let mut parts = dirs;
        parts.push(format!("x{name}"));
        let path = parts.join("/");

        prop_assert!(!rule.matches(&path));
    }

    #[test]
    fn negated_rules_never_match(name in segment(), dirs in parents()) {
        let rule = IgnoreRule::parse(&format!("!{name}"));

        let mut parts = dirs;
        parts.push(name);
        let path = parts.join("/");

        prop_assert!(rule.is_negated());
        prop_assert!(!rule.matches(&path));
    }
}
