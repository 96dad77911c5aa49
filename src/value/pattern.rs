use std::fmt;

use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::error::FilterError;

/// A wildcard pattern for `like` / `nlike`.
///
/// - `*` matches any run of characters (including none)
/// - `_` matches exactly one character
/// - `\` makes the next character literal
///
/// Matching is anchored at both ends and case-insensitive. The regular
/// expression is compiled on first use and cached; the cache is a pure
/// function of the raw text.
///
/// # Examples
///
/// ```
/// use pointer_filter::Pattern;
/// use serde_json::json;
///
/// let pattern = Pattern::new("foo*bar");
/// assert!(pattern.matches(&json!("foo/bar")));
/// assert!(pattern.matches(&json!("FOObar")));
/// assert!(!pattern.matches(&json!("oof/rab")));
/// assert_eq!(pattern.to_regex_string(), "^foo.*bar$");
/// ```
#[derive(Clone)]
pub struct Pattern {
    raw: String,
    compiled: OnceCell<Regex>,
}

impl Pattern {
    pub fn new(raw: impl Into<String>) -> Self {
        Pattern {
            raw: raw.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The pattern as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Translates the wildcard syntax into an anchored regular expression.
    pub fn to_regex_string(&self) -> String {
        let mut out = String::with_capacity(self.raw.len() + 8);
        out.push('^');

        let mut escaped = false;
        for ch in self.raw.chars() {
            if escaped {
                out.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '*' => out.push_str(".*"),
                '_' => out.push('.'),
                other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        // A dangling escape stands for a literal backslash.
        if escaped {
            out.push_str(r"\\");
        }

        out.push('$');
        out
    }

    /// Returns the compiled expression, building it on first call.
    pub fn to_regex(&self) -> Result<&Regex, FilterError> {
        self.compiled.get_or_try_init(|| {
            let source = self.to_regex_string();
            tracing::debug!(pattern = %self.raw, regex = %source, "compiling wildcard pattern");
            RegexBuilder::new(&source)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .map_err(FilterError::from)
        })
    }

    /// Whether `value` is a string matching this pattern. Non-strings never match.
    pub fn matches(&self, value: &Value) -> bool {
        let Value::String(text) = value else {
            return false;
        };
        match self.to_regex() {
            Ok(regex) => regex.is_match(text),
            Err(err) => {
                tracing::warn!(pattern = %self.raw, error = %err, "pattern does not compile");
                false
            }
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("raw", &self.raw)
            .field("compiled", &self.compiled.get().is_some())
            .finish()
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Pattern::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Pattern::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_char_wildcard() {
        let pattern = Pattern::new("ba_*");
        assert!(pattern.matches(&json!("ba2z")));
        assert!(pattern.matches(&json!("bar")));
        assert!(!pattern.matches(&json!("ba")));
    }

    #[test]
    fn test_escapes() {
        let pattern = Pattern::new(r"100\%\_\*");
        assert_eq!(pattern.to_regex_string(), r"^100%_\*$");
        assert!(pattern.matches(&json!("100%_*")));
        assert!(!pattern.matches(&json!("100%x*")));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let pattern = Pattern::new("a.b(c)+");
        assert!(pattern.matches(&json!("A.B(C)+")));
        assert!(!pattern.matches(&json!("axb(c)+")));
    }

    #[test]
    fn test_compiled_form_is_memoized() {
        let pattern = Pattern::new("x*");
        let first = pattern.to_regex().unwrap() as *const Regex;
        let second = pattern.to_regex().unwrap() as *const Regex;
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_string_never_matches() {
        let pattern = Pattern::new("*");
        assert!(pattern.matches(&json!("")));
        assert!(!pattern.matches(&json!(1)));
        assert!(!pattern.matches(&json!(null)));
    }
}
