//! Schema-less value tree returned by the Smoozik parser
//!
//! Every reply payload is converted into a [`ResponseValue`]: either a text
//! scalar, an ordered list, or an ordered map. Lookups never panic: missing
//! entries index to an empty scalar, which makes chained access such as
//! `reply["tracks"][0]["track"]["name"]` safe on partial data.

use indexmap::IndexMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Indentation unit of [`ResponseValue::pretty`]
const INDENT: &str = "    ";

static EMPTY: ResponseValue = ResponseValue::Scalar(String::new());

/// Parsed reply node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValue {
    Scalar(String),
    Sequence(Vec<ResponseValue>),
    Mapping(IndexMap<String, ResponseValue>),
}

impl Default for ResponseValue {
    fn default() -> Self {
        ResponseValue::Mapping(IndexMap::new())
    }
}

impl ResponseValue {
    /// Empty mapping, the value of an element with neither text nor children
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn scalar(text: impl Into<String>) -> Self {
        ResponseValue::Scalar(text.into())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ResponseValue::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, ResponseValue::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ResponseValue::Mapping(_))
    }

    /// True for an empty scalar, list or map
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseValue::Scalar(s) => s.is_empty(),
            ResponseValue::Sequence(items) => items.is_empty(),
            ResponseValue::Mapping(map) => map.is_empty(),
        }
    }

    /// Number of children (0 for scalars)
    pub fn len(&self) -> usize {
        match self {
            ResponseValue::Scalar(_) => 0,
            ResponseValue::Sequence(items) => items.len(),
            ResponseValue::Mapping(map) => map.len(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResponseValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text, or an empty string for any other node
    pub fn text(&self) -> &str {
        self.as_str().unwrap_or_default()
    }

    pub fn as_sequence(&self) -> Option<&[ResponseValue]> {
        match self {
            ResponseValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, ResponseValue>> {
        match self {
            ResponseValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Parses a scalar into `T` (typically a number)
    pub fn parse_as<T: FromStr>(&self) -> Option<T> {
        self.as_str().and_then(|s| s.trim().parse().ok())
    }

    /// Map entry by key
    pub fn get(&self, key: &str) -> Option<&ResponseValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// List entry by position
    pub fn at(&self, index: usize) -> Option<&ResponseValue> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Follows a `/`-separated path; numeric segments index lists.
    ///
    /// ```
    /// use pmosmoozik::ResponseValue;
    /// let v = pmosmoozik::parser::parse_xml_document(
    ///     b"<tracks><track><name>a</name></track><track><name>b</name></track></tracks>",
    ///     Default::default(),
    /// ).unwrap();
    /// assert_eq!(v.pointer("1/track/name").and_then(ResponseValue::as_str), Some("b"));
    /// ```
    pub fn pointer(&self, path: &str) -> Option<&ResponseValue> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node {
                ResponseValue::Sequence(items) => {
                    segment.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                ResponseValue::Mapping(map) => map.get(segment),
                ResponseValue::Scalar(_) => None,
            })
    }

    /// Diagnostic rendering with nested braces and 4-space indentation
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        match self {
            ResponseValue::Scalar(text) if !text.is_empty() => {
                out.push_str(text);
                out.push('\n');
            }
            ResponseValue::Sequence(items) if !items.is_empty() => {
                out.push_str("{\n");
                for item in items {
                    out.push_str(&indent);
                    out.push_str(INDENT);
                    item.write_pretty(out, depth + 1);
                }
                out.push_str(&indent);
                out.push_str("}\n");
            }
            ResponseValue::Mapping(map) if !map.is_empty() => {
                out.push_str("{\n");
                for (key, value) in map {
                    out.push_str(&indent);
                    out.push_str(INDENT);
                    out.push_str(key);
                    out.push_str(" : ");
                    value.write_pretty(out, depth + 1);
                }
                out.push_str(&indent);
                out.push_str("}\n");
            }
            _ => out.push('\n'),
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl Index<&str> for ResponseValue {
    type Output = ResponseValue;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&EMPTY)
    }
}

impl Index<usize> for ResponseValue {
    type Output = ResponseValue;

    fn index(&self, index: usize) -> &Self::Output {
        self.at(index).unwrap_or(&EMPTY)
    }
}

impl From<&str> for ResponseValue {
    fn from(text: &str) -> Self {
        ResponseValue::Scalar(text.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(text: String) -> Self {
        ResponseValue::Scalar(text)
    }
}

impl From<Vec<ResponseValue>> for ResponseValue {
    fn from(items: Vec<ResponseValue>) -> Self {
        ResponseValue::Sequence(items)
    }
}

impl From<IndexMap<String, ResponseValue>> for ResponseValue {
    fn from(map: IndexMap<String, ResponseValue>) -> Self {
        ResponseValue::Mapping(map)
    }
}

impl<K: Into<String>> FromIterator<(K, ResponseValue)> for ResponseValue {
    fn from_iter<I: IntoIterator<Item = (K, ResponseValue)>>(iter: I) -> Self {
        ResponseValue::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
