//! Error types for value literals and document decoding.

use std::fmt;
use thiserror::Error;

/// A length, text-size, color or shape literal outside its grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error(
        "invalid length `{literal}`: expected `15.dp`, `15.5.dp`, `15.px`, `15.5.px`, `15` or `Unspecified`"
    )]
    InvalidLength { literal: String },

    #[error(
        "invalid text size `{literal}`: expected `15.sp`, `15.5.sp`, `15.px`, `15` or `Unspecified`"
    )]
    InvalidTextSize { literal: String },

    #[error(
        "unknown color `{literal}`: expected white, black, red, green, blue or a `#` hex value"
    )]
    UnknownColor { literal: String },

    #[error("invalid hex color `{literal}`: expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidHexColor { literal: String },

    #[error("unknown shape `{literal}`: expected rectangle, circle or a corner radius length")]
    UnknownShape { literal: String },
}

// ─── Node path ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a node inside the source document, e.g.
/// `root.child[1].modifier[0].padding`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    /// The document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Child path for a map key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Self(segments)
    }

    /// Child path for a list position.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<document>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// ─── Decode errors ───────────────────────────────────────────────────────

/// What went wrong at a particular node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeErrorKind {
    #[error("expected a map, found {found}")]
    ExpectedMap { found: &'static str },

    #[error("expected a list, found {found}")]
    ExpectedList { found: &'static str },

    #[error("expected a scalar, found {found}")]
    ExpectedScalar { found: &'static str },

    #[error("expected a scalar or a map, found {found}")]
    ExpectedScalarOrMap { found: &'static str },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown modifier: keys={keys:?}")]
    UnknownModifier { keys: Vec<String> },

    #[error("{family} node has neither a variant tag nor a `type` key")]
    MissingVariant { family: &'static str },

    #[error("unknown {family} variant `{name}`")]
    UnknownVariant { family: &'static str, name: String },

    #[error("unknown {family} `{value}`, expected one of {expected:?}")]
    UnknownEnumValue {
        family: &'static str,
        value: String,
        expected: &'static [&'static str],
    },

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid boolean `{0}`")]
    InvalidBoolean(String),

    #[error("tag must not be empty")]
    EmptyTag,

    #[error(transparent)]
    Value(#[from] ValueParseError),
}

/// Failure to turn a source document into a [`Page`](crate::model::Page).
///
/// Decoding is all-or-nothing: one error aborts the whole document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("{path}: {kind}")]
    Node {
        path: NodePath,
        kind: DecodeErrorKind,
    },
}

impl DecodeError {
    pub fn at(path: &NodePath, kind: impl Into<DecodeErrorKind>) -> Self {
        Self::Node {
            path: path.clone(),
            kind: kind.into(),
        }
    }

    /// Where the error occurred, if it concerns a specific node.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::Syntax(_) => None,
            Self::Node { path, .. } => Some(path),
        }
    }

    pub fn kind(&self) -> Option<&DecodeErrorKind> {
        match self {
            Self::Syntax(_) => None,
            Self::Node { kind, .. } => Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_display() {
        let path = NodePath::root()
            .key("root")
            .key("child")
            .index(1)
            .key("modifier")
            .index(0)
            .key("padding");
        assert_eq!(path.to_string(), "root.child[1].modifier[0].padding");
        assert_eq!(NodePath::root().to_string(), "<document>");
    }

    #[test]
    fn node_error_mentions_path_and_literal() {
        let path = NodePath::root().key("root").key("modifier").index(0);
        let err = DecodeError::at(
            &path,
            ValueParseError::InvalidLength {
                literal: "abc".into(),
            },
        );
        let message = err.to_string();
        assert!(message.starts_with("root.modifier[0]: invalid length `abc`"));
        assert_eq!(err.path(), Some(&path));
    }
}
