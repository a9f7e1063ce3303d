//! # Field Paths
//!
//! Structural location of a node inside a document tree. Paths are built
//! bottom-up: the innermost failure creates an error at the root path and
//! every enclosing frame prepends its own segment while the error unwinds.
//! Nothing is rendered to text until the error reaches the caller.

use std::fmt;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a node, outermost segment first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Prepend an enclosing segment.
    pub fn push_front(&mut self, segment: impl Into<PathSegment>) {
        self.segments.insert(0, segment.into());
    }

    /// Append a nested segment.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_placeholder() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn segments_are_prepended_while_unwinding() {
        let mut path = FieldPath::root();
        path.push_front("en-us");
        path.push_front("value");
        path.push_front("description");
        assert_eq!(path.to_string(), "description.value.en-us");
    }

    #[test]
    fn indices_render_bracketed() {
        let path: FieldPath = [
            PathSegment::Index(2),
            PathSegment::from("checklist"),
            PathSegment::Index(1),
            PathSegment::from("value"),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.to_string(), "[2].checklist[1].value");
    }

    #[test]
    fn push_appends() {
        let mut path = FieldPath::root();
        path.push("price");
        path.push(0usize);
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.to_string(), "price[0]");
    }
}
