// src/watch/patterns.rs

//! Gitignore-style reload-ignore rules.
//!
//! Each rule is translated into a single regular expression once, at startup,
//! by running its body through the ordered transformations in [`steps`]. The
//! compiled expression is then evaluated against root-relative paths such as
//! `"internal/service/user.go"`.
//!
//! Supported subset:
//! - `name` matches `name` at any depth, and anything beneath it.
//! - `dir/` matches only things *beneath* `dir`, never `dir` itself.
//! - `/name` is rooted at the watch root.
//! - `*` matches within one path segment, `**` across segments.
//! - `dir/*.ext` is rooted implicitly.
//! - `!name` never matches. It does **not** re-include paths excluded by an
//!   earlier rule.

use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::errors::{HotrunError, Result};

/// Ordered, pure string transformations from rule body to regex source.
///
/// Every step takes the output of the previous one. They are exposed so each
/// can be exercised on its own.
pub mod steps {
    use std::sync::LazyLock;

    use regex::Regex;

    /// Stands in for a `*` produced by a double-star expansion so the
    /// single-star step leaves it alone.
    pub const MAGIC_STAR: &str = "#$~";

    static WILDCARD_EXTENSION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([^/+])/.*\*\.").expect("static regex is valid"));

    /// A leading `#` or `!` left after negation handling is an escape and is
    /// dropped.
    pub fn strip_escape(pattern: String) -> String {
        match pattern.strip_prefix(['#', '!']) {
            Some(rest) => rest.to_string(),
            None => pattern,
        }
    }

    /// `foo/*.blah` is rooted: prefix `/` unless already present.
    pub fn anchor_wildcard_extension(pattern: String) -> String {
        if WILDCARD_EXTENSION.is_match(&pattern) && !pattern.starts_with('/') {
            format!("/{pattern}")
        } else {
            pattern
        }
    }

    pub fn escape_dots(pattern: String) -> String {
        pattern.replace('.', r"\.")
    }

    pub fn expand_double_star(pattern: String) -> String {
        let pattern = match pattern.strip_prefix("/**/") {
            Some(rest) => format!("**/{rest}"),
            None => pattern,
        };
        pattern
            .replace("/**/", "(/|/.+/)")
            .replace("**/", &format!("(|.{MAGIC_STAR}/)"))
            .replace("/**", &format!("(|/.{MAGIC_STAR})"))
    }

    pub fn expand_single_star(pattern: String) -> String {
        pattern
            .replace(r"\*", &format!(r"\{MAGIC_STAR}"))
            .replace('*', "([^/]*)")
    }

    pub fn escape_question_mark(pattern: String) -> String {
        pattern.replace('?', r"\?")
    }

    pub fn restore_magic_star(pattern: String) -> String {
        pattern.replace(MAGIC_STAR, "*")
    }

    /// `dir/` allows "nothing or anything beneath"; a plain rule allows
    /// "nothing or a separator plus anything".
    pub fn add_suffix(pattern: String) -> String {
        if pattern.ends_with('/') {
            format!("{pattern}(|.*)$")
        } else {
            format!("{pattern}(|/.*)$")
        }
    }

    /// Rooted expressions match from the start of the path; the rest may
    /// match at any depth.
    pub fn add_prefix(pattern: String) -> String {
        match pattern.strip_prefix('/') {
            Some(rest) => format!("^(|/){rest}"),
            None => format!("^(|.*/){pattern}"),
        }
    }

    /// The full pipeline, in order.
    pub const PIPELINE: &[fn(String) -> String] = &[
        strip_escape,
        anchor_wildcard_extension,
        escape_dots,
        expand_double_star,
        expand_single_star,
        escape_question_mark,
        restore_magic_star,
        add_suffix,
        add_prefix,
    ];

    pub fn translate(body: &str) -> String {
        PIPELINE
            .iter()
            .fold(body.to_string(), |acc, step| step(acc))
    }
}

/// One parsed reload-ignore rule.
#[derive(Clone)]
pub struct IgnoreRule {
    raw: String,
    negated: bool,
    anchored: bool,
    matcher: Option<Regex>,
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRule")
            .field("raw", &self.raw)
            .field("negated", &self.negated)
            .field("anchored", &self.anchored)
            .field("expr", &self.matcher.as_ref().map(Regex::as_str))
            .finish()
    }
}

impl IgnoreRule {
    /// Parse a rule, logging and disabling it if it does not compile.
    pub fn parse(raw: &str) -> Self {
        match Self::try_parse(raw) {
            Ok(rule) => rule,
            Err(err) => {
                warn!(rule = %raw, error = %err, "invalid reload-ignore rule; it will never match");
                Self {
                    raw: raw.to_string(),
                    negated: raw.starts_with('!'),
                    anchored: false,
                    matcher: None,
                }
            }
        }
    }

    /// Strict variant of [`IgnoreRule::parse`].
    pub fn try_parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self {
                raw: String::new(),
                negated: false,
                anchored: false,
                matcher: None,
            });
        }

        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let expr = steps::translate(body);
        let anchored = expr.starts_with("^(|/)");
        let matcher = Regex::new(&expr).map_err(|e| {
            HotrunError::ConfigError(format!("reload-ignore rule {raw:?} -> {expr:?}: {e}"))
        })?;

        Ok(Self {
            raw: raw.to_string(),
            negated,
            anchored,
            matcher: Some(matcher),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// True if `path` (root-relative, `/`-separated) is ignored by this rule.
    pub fn matches(&self, path: &str) -> bool {
        if self.negated {
            return false;
        }
        match &self.matcher {
            Some(re) => re.is_match(&path.replace('\\', "/")),
            None => false,
        }
    }
}

/// The ordered rule list from configuration.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        Self {
            rules: raw.iter().map(|r| IgnoreRule::parse(r.as_ref())).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter()
    }

    /// Returns the first rule that ignores `path`, if any.
    pub fn first_match(&self, path: &str) -> Option<&IgnoreRule> {
        self.rules.iter().find(|r| r.matches(path))
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }
}
