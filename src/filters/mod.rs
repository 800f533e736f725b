//! The filter rule set: per-file inclusion decisions.
//!
//! Each rule pairs a glob pattern over the template tree with a boolean
//! expression. Patterns and expressions are compiled once at manifest
//! load; rules are stored sorted most-specific-first so overlapping
//! patterns resolve deterministically (an exact-file rule beats the
//! directory-subtree rule covering it). A file no rule matches is
//! unconditionally included.

use glob::Pattern;

use crate::answers::Answers;
use crate::error::{Result, ScaffoldError};
use crate::expr::Expr;

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    // `*` must stay within one path segment; only `**` spans segments.
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One compiled rule with its load-time specificity score.
#[derive(Debug, Clone)]
pub struct FilterRule {
    pattern_text: String,
    pattern: Pattern,
    expr: Expr,
    /// Path segments containing no wildcard.
    literal_segments: usize,
    /// Path segments containing `*`, `?`, or `[`.
    wildcard_segments: usize,
}

impl FilterRule {
    fn compile(pattern_text: &str, expr: Expr) -> Result<FilterRule> {
        let pattern = Pattern::new(pattern_text).map_err(|e| {
            ScaffoldError::Configuration(format!(
                "filter rule `{}`: invalid pattern: {}",
                pattern_text, e
            ))
        })?;

        let segments: Vec<&str> = pattern_text.split('/').collect();
        let wildcard_segments = segments
            .iter()
            .filter(|s| s.chars().any(|c| matches!(c, '*' | '?' | '[')))
            .count();

        Ok(FilterRule {
            pattern_text: pattern_text.to_string(),
            pattern,
            expr,
            literal_segments: segments.len() - wildcard_segments,
            wildcard_segments,
        })
    }

    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }
}

/// All rules for one template, pre-sorted by specificity.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    rules: Vec<FilterRule>,
}

impl FilterSet {
    /// Compile (pattern, expression) pairs and sort them: more literal
    /// segments first, then fewer wildcard segments, then pattern text.
    /// The scoring happens once here; `should_include` only scans.
    pub fn compile(raw: impl IntoIterator<Item = (String, Expr)>) -> Result<FilterSet> {
        let mut rules = raw
            .into_iter()
            .map(|(pattern, expr)| FilterRule::compile(&pattern, expr))
            .collect::<Result<Vec<_>>>()?;

        rules.sort_by(|a, b| {
            b.literal_segments
                .cmp(&a.literal_segments)
                .then(a.wildcard_segments.cmp(&b.wildcard_segments))
                .then(a.pattern_text.cmp(&b.pattern_text))
        });

        Ok(FilterSet { rules })
    }

    /// Decide inclusion for a root-relative, `/`-separated file path.
    ///
    /// The first (most specific) matching rule's expression decides; no
    /// matching rule means the file is always included.
    pub fn should_include(&self, path: &str, answers: &Answers) -> bool {
        match self.rules.iter().find(|rule| rule.matches(path)) {
            Some(rule) => rule.expr.evaluate(answers),
            None => true,
        }
    }

    /// The rule that would decide `path`, if any. Used for logging.
    pub fn matching_rule(&self, path: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(rules: &[(&str, &str)]) -> FilterSet {
        FilterSet::compile(
            rules
                .iter()
                .map(|(p, e)| (p.to_string(), Expr::parse(e).unwrap())),
        )
        .unwrap()
    }

    fn answers(pairs: &[(&str, bool)]) -> Answers {
        let mut a = Answers::new();
        for (name, value) in pairs {
            a.insert(*name, *value);
        }
        a
    }

    #[test]
    fn test_unmatched_path_is_included() {
        let filters = set(&[("test/**/*", "unit")]);
        let a = answers(&[("unit", false)]);
        assert!(filters.should_include("src/main.js", &a));
    }

    #[test]
    fn test_matching_rule_expression_decides() {
        let filters = set(&[(".eslintrc.js", "eslint")]);
        assert!(filters.should_include(".eslintrc.js", &answers(&[("eslint", true)])));
        assert!(!filters.should_include(".eslintrc.js", &answers(&[("eslint", false)])));
    }

    #[test]
    fn test_star_stays_within_one_segment() {
        let filters = set(&[("test/*", "unit")]);
        let a = answers(&[("unit", false)]);
        // one segment below test/ is governed by the rule
        assert!(!filters.should_include("test/index.js", &a));
        // deeper paths are not matched by a single `*`
        assert!(filters.should_include("test/unit/index.js", &a));
    }

    #[test]
    fn test_double_star_spans_zero_or_more_segments() {
        let filters = set(&[("test/e2e/**/*", "e2e")]);
        let a = answers(&[("e2e", false)]);
        assert!(!filters.should_include("test/e2e/index.js", &a));
        assert!(!filters.should_include("test/e2e/specs/Launch.spec.js", &a));
        assert!(filters.should_include("test/unit/index.js", &a));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let filters = set(&[("settings/**", "settings")]);
        let a = answers(&[("settings", false)]);
        assert!(!filters.should_include("settings/default.json", &a));
        assert!(filters.should_include("Settings/default.json", &a));
    }

    #[test]
    fn test_more_specific_pattern_wins() {
        // the subtree rule alone would include the file; the exact-file
        // rule must take precedence and exclude it
        let filters = set(&[
            ("test/**/*", "e2e || unit"),
            ("test/unit/specs/settings.spec.js", "unit && settings"),
        ]);
        let a = answers(&[("unit", true), ("e2e", false), ("settings", false)]);
        assert!(!filters.should_include("test/unit/specs/settings.spec.js", &a));
        // siblings still fall through to the subtree rule
        assert!(filters.should_include("test/unit/specs/Launch.spec.js", &a));
    }

    #[test]
    fn test_specificity_independent_of_declaration_order() {
        let forward = set(&[
            ("test/**/*", "e2e || unit"),
            ("test/unit/specs/settings.spec.js", "unit && settings"),
        ]);
        let reversed = set(&[
            ("test/unit/specs/settings.spec.js", "unit && settings"),
            ("test/**/*", "e2e || unit"),
        ]);
        let a = answers(&[("unit", true), ("e2e", false), ("settings", false)]);
        let path = "test/unit/specs/settings.spec.js";
        assert_eq!(
            forward.should_include(path, &a),
            reversed.should_include(path, &a)
        );
    }

    #[test]
    fn test_should_include_is_deterministic() {
        let filters = set(&[("src/**/*", "eslint"), ("src/lib/*", "unit")]);
        let a = answers(&[("eslint", true), ("unit", false)]);
        let first = filters.should_include("src/lib/util.js", &a);
        for _ in 0..10 {
            assert_eq!(filters.should_include("src/lib/util.js", &a), first);
        }
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let result = FilterSet::compile(vec![(
            "src/[invalid".to_string(),
            Expr::parse("unit").unwrap(),
        )]);
        let err = result.unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration(_)));
        assert!(err.to_string().contains("src/[invalid"));
    }
}
