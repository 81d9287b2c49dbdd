//! YAML document loading.
//!
//! Documents are parsed with `serde_yaml` and converted into a [`Node`] tree.
//! No schema is applied at this stage; the validators in [`crate::protocol`]
//! and [`crate::settings`] read the tree through the shape accessors below.

use crate::error::DocumentError;
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// A parsed YAML value.
///
/// Mappings keep their document order. Numbers keep their textual form so
/// that nodes can be compared and hashed structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

impl Node {
    /// Reads and parses the YAML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_yaml::from_str(&content).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded document");
        Ok(Self::from(value))
    }

    /// Parses YAML text that did not come from a file.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<Value>(text).map(Self::from)
    }

    /// Returns the name of this node's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the entries of a mapping, or a shape error naming `context`.
    pub fn expect_mapping(&self, context: &str) -> Result<&[(Node, Node)], DocumentError> {
        self.as_mapping().ok_or_else(|| self.shape_error(context, "a mapping"))
    }

    fn shape_error(&self, context: &str, expected: &'static str) -> DocumentError {
        DocumentError::Shape {
            context: context.to_string(),
            expected,
            found: self.kind(),
        }
    }

    /// Looks up a string key in a mapping. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the display label of a non-null scalar.
    pub fn label(&self) -> Option<String> {
        match self {
            Node::Bool(b) => Some(b.to_string()),
            Node::Number(n) => Some(n.clone()),
            Node::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n.to_string()),
            Value::String(s) => Node::String(s),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Node::from(k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// Renders the node in YAML flow style, e.g. `{from: A, to: B, event: go}`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Number(n) => f.write_str(n),
            Node::String(s) if needs_quotes(s) => write!(f, "{:?}", s),
            Node::String(s) => f.write_str(s),
            Node::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || s.contains(|c: char| matches!(c, ':' | ',' | '[' | ']' | '{' | '}' | '#' | '"' | '\n'))
        || matches!(s, "null" | "~" | "true" | "false")
        || looks_numeric(s)
}

fn looks_numeric(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') && s.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mapping_preserves_order() {
        let node = Node::parse("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<_> = node
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_get_and_contains_key() {
        let node = Node::parse("states: [a, b]\nprotocol_name: p\n").unwrap();
        assert!(node.contains_key("states"));
        assert!(!node.contains_key("transitions"));
        assert_eq!(node.get("protocol_name"), Some(&Node::String("p".into())));

        // Lookups on non-mappings find nothing.
        assert!(Node::String("states".into()).get("states").is_none());
    }

    #[test]
    fn test_numbers_and_strings_are_distinct() {
        let node = Node::parse("[1, \"1\"]").unwrap();
        let items = node.as_sequence().unwrap();
        assert_eq!(items[0], Node::Number("1".into()));
        assert_eq!(items[1], Node::String("1".into()));
        assert_ne!(items[0], items[1]);
        assert_eq!(items[0].label(), items[1].label());
    }

    #[test]
    fn test_expect_shape_error() {
        let node = Node::parse("- a\n- b\n").unwrap();
        let err = node.expect_mapping("protocol document").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected a mapping for protocol document, found sequence"
        );
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let node = Node::parse("state: !custom idle").unwrap();
        assert_eq!(node.get("state"), Some(&Node::String("idle".into())));
    }

    #[test]
    fn test_flow_style_display() {
        let node = Node::parse("from: A\nto: B\nevent: ''\nweight: 2\n").unwrap();
        assert_eq!(node.to_string(), r#"{from: A, to: B, event: "", weight: 2}"#);

        let node = Node::parse("[idle, 'a: b', null, true]").unwrap();
        assert_eq!(node.to_string(), r#"[idle, "a: b", null, true]"#);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "protocol_name: handshake").unwrap();

        let node = Node::load(file.path()).unwrap();
        assert_eq!(node.get("protocol_name").and_then(Node::as_str), Some("handshake"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Node::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "states: [a, b").unwrap();

        let err = Node::load(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
