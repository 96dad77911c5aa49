use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FilterError;

/// A parsed JSON Pointer (RFC 6901) addressing a location inside a record.
///
/// The segments are stored unescaped; the escaped pointer form is kept next to
/// them so resolution can hand it straight to [`serde_json::Value::pointer`].
///
/// # Examples
///
/// ```
/// use pointer_filter::Target;
///
/// let target = Target::parse("/a~1b/0").unwrap();
/// assert_eq!(target.segments(), ["a/b", "0"]);
/// assert_eq!(target.as_pointer(), "/a~1b/0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    segments: Vec<String>,
    pointer: String,
}

impl Target {
    /// Parses an escaped pointer. The empty string addresses the whole record;
    /// anything else must start with `/`.
    pub fn parse(pointer: &str) -> Result<Self, FilterError> {
        if pointer.is_empty() {
            return Ok(Target::from_segments(Vec::<String>::new()));
        }

        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(FilterError::InvalidTarget {
                pointer: pointer.to_string(),
                reason: "a pointer must start with `/`",
            });
        };

        let segments = rest
            .split('/')
            .map(|raw| unescape_segment(raw).ok_or_else(|| FilterError::InvalidTarget {
                pointer: pointer.to_string(),
                reason: "`~` must be followed by `0` or `1`",
            }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Target::from_segments(segments))
    }

    /// Builds a target from unescaped segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let pointer = segments.iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment.replace('~', "~0").replace('/', "~1"));
            acc
        });
        Target { segments, pointer }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The escaped RFC 6901 form, e.g. `/a~1b/0`.
    pub fn as_pointer(&self) -> &str {
        &self.pointer
    }

    /// Resolves this target in a JSON record; `None` is the absent sentinel.
    pub fn resolve<'a>(&self, record: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        record.pointer(&self.pointer)
    }
}

fn unescape_segment(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

impl FromStr for Target {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer)
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pointer)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        Target::parse(&pointer).map_err(serde::de::Error::custom)
    }
}
