//! # Filtering
//!
//! Line filtering module.
//!
//! Responsibilities:
//! - Compile filter rules once at startup, failing fast on bad patterns
//! - Decide per line whether it qualifies for publishing
//!
//! Evaluation is pure: no I/O, no interior mutability, identical inputs
//! always produce identical results.

use contracts::{RelayConfig, RelayError};
use regex::bytes::Regex;
use tracing::debug;

/// Marker that negates a substring rule when it appears as its first byte.
const NEGATION_MARKER: u8 = b'!';

/// Compiled line filter
///
/// Both rules are optional; an absent rule always passes. When both are
/// present a line must satisfy each of them to qualify (logical AND).
#[derive(Debug, Clone, Default)]
pub struct LineFilter {
    regex: Option<Regex>,
    contains: Option<String>,
}

impl LineFilter {
    /// Compile a filter from optional raw rules
    ///
    /// An empty substring rule is treated the same as no rule.
    ///
    /// # Errors
    /// Returns [`RelayError::FilterPattern`] when the regex does not compile.
    pub fn new(pattern: Option<&str>, contains: Option<&str>) -> Result<Self, RelayError> {
        let regex = pattern
            .map(|p| Regex::new(p).map_err(|e| RelayError::filter_pattern(p, e.to_string())))
            .transpose()?;

        let contains = contains
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string());

        debug!(
            regex = regex.is_some(),
            contains = contains.is_some(),
            "Line filter compiled"
        );

        Ok(Self { regex, contains })
    }

    /// Compile the filter described by a [`RelayConfig`]
    pub fn from_config(cfg: &RelayConfig) -> Result<Self, RelayError> {
        Self::new(cfg.regex.as_deref(), cfg.contains.as_deref())
    }

    /// Decide whether `line` qualifies for publishing
    pub fn evaluate(&self, line: &[u8]) -> bool {
        self.regex_ok(line) && self.contains_ok(line)
    }

    fn regex_ok(&self, line: &[u8]) -> bool {
        match &self.regex {
            Some(re) => re.is_match(line),
            None => true,
        }
    }

    fn contains_ok(&self, line: &[u8]) -> bool {
        let Some(rule) = &self.contains else {
            return true;
        };

        let mut pattern = rule.as_bytes();
        let mut negate = false;
        if pattern[0] == NEGATION_MARKER {
            // A bare marker with nothing after it always passes.
            if pattern.len() == 1 {
                return true;
            }
            negate = true;
            pattern = &pattern[1..];
        }

        let contains = contains_subslice(line, pattern);
        if negate {
            !contains
        } else {
            contains
        }
    }
}

/// Byte-level substring search; `needle` is known to be non-empty here.
fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
