//! Type-name selection.

use crate::error::PatternError;
use regex::Regex;

/// Inclusion and optional exclusion regex over type names.
///
/// Both are unanchored searches: `Interface` matches `BookInterfaceV2`.
#[derive(Debug, Clone)]
pub struct SymbolFilter {
    include: Regex,
    exclude: Option<Regex>,
}

impl SymbolFilter {
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self, PatternError> {
        let include =
            Regex::new(include).map_err(|e| PatternError::new("match", include, e.to_string()))?;
        let exclude = exclude
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| PatternError::new("exclude", pattern, e.to_string()))
            })
            .transpose()?;

        Ok(Self { include, exclude })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.include.is_match(name)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.is_match(name))
    }

    /// The matching names, in their original order.
    pub fn apply(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| self.matches(name))
            .cloned()
            .collect()
    }
}
