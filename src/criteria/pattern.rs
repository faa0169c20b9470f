//! User-supplied "contains" patterns.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// A validated regular expression searched for inside free text.
///
/// Compiled once at construction with multi-line and dot-matches-newline
/// enabled, so `^`/`$` anchor at line boundaries and `.` spans lines.
/// [`Regex`] is `Send + Sync`; one instance serves every concurrent match.
#[derive(Clone)]
pub struct ContainsPattern {
    regex: Regex,
}

impl ContainsPattern {
    /// Compile `pattern`, naming the option it came from in the error.
    pub fn new(field: &'static str, pattern: &str) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                field,
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    /// Compile an optional pattern; `None` stays `None`.
    pub fn optional(field: &'static str, pattern: Option<&str>) -> Result<Option<Self>, ConfigError> {
        pattern.map(|p| Self::new(field, p)).transpose()
    }

    /// True if the pattern matches anywhere in `text`. Absent text is `""`.
    pub fn is_found_in(&self, text: Option<&str>) -> bool {
        self.regex.is_match(text.unwrap_or(""))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for ContainsPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContainsPattern").field(&self.as_str()).finish()
    }
}
