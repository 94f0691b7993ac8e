//! Path-pattern matching for document eligibility.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{ConfigError, ConfigResult};

/// Compiled set of path selectors.
///
/// Selectors are glob patterns; a literal path is the degenerate glob that
/// matches only itself. An empty set matches no document at all, so a stage
/// configured without resources indexes nothing.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl SelectorSet {
    /// Compile patterns into a selector set.
    pub fn compile(patterns: &[String]) -> ConfigResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidSelector {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidSelector {
            pattern: patterns.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// Whether any selector matches the given document path.
    pub fn matches(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    /// Whether the set holds no selectors.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The source patterns, in declaration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(patterns: &[&str]) -> SelectorSet {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        SelectorSet::compile(&patterns).unwrap()
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = compile(&[]);
        assert!(set.is_empty());
        assert!(!set.matches("/index.html"));
    }

    #[test]
    fn test_literal_path() {
        let set = compile(&["/about"]);
        assert!(set.matches("/about"));
        assert!(!set.matches("/about/team"));
    }

    #[test]
    fn test_glob_pattern() {
        let set = compile(&["/posts/**"]);
        assert!(set.matches("/posts/hello"));
        assert!(set.matches("/posts/2026/hello"));
        assert!(!set.matches("/pages/hello"));
    }

    #[test]
    fn test_invalid_pattern() {
        let patterns = vec!["/posts/[".to_string()];
        let err = SelectorSet::compile(&patterns).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { .. }));
    }
}
