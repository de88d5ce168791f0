//! JSON values and response paths.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json_bytes::ByteString;
use serde_json_bytes::Map;
pub use serde_json_bytes::Value;

/// A JSON object.
pub type Object = Map<ByteString, Value>;

/// One segment of a [`Path`]: a response key or a list index.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// A list index.
    Index(usize),

    /// A response key (field name or alias).
    Key(String),
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Index(index) => write!(f, "{index}"),
            PathElement::Key(key) => f.write_str(key),
        }
    }
}

impl From<usize> for PathElement {
    fn from(index: usize) -> Self {
        PathElement::Index(index)
    }
}

impl From<&str> for PathElement {
    fn from(key: &str) -> Self {
        PathElement::Key(key.to_string())
    }
}

impl From<String> for PathElement {
    fn from(key: String) -> Self {
        PathElement::Key(key)
    }
}

/// A flat, ordered path into the response, e.g. `["feed", 0, "id"]`.
///
/// Serialized as a JSON array of strings and integers.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(pub Vec<PathElement>);

impl Path {
    pub fn empty() -> Path {
        Path(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    /// Returns the path without its last element, or `None` for the empty path.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// True if `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }
}

/// Parses a slash separated path. Segments made only of digits become list indexes.
impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path(
            s.split('/')
                .filter(|segment| !segment.is_empty())
                .map(|segment| match segment.parse::<usize>() {
                    Ok(index) => PathElement::Index(index),
                    Err(_) => PathElement::Key(segment.to_string()),
                })
                .collect(),
        )
    }
}

impl<T> From<Vec<T>> for Path
where
    T: Into<PathElement>,
{
    fn from(elements: Vec<T>) -> Self {
        Path(elements.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, element) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

/// The position of a value in the response tree while it is being executed.
///
/// This is an immutable singly-linked list: extending a path allocates one node that points
/// at its parent, so every descendant shares its ancestors' nodes. Convert it with
/// [`ResponsePath::to_path`] when a flat [`Path`] is needed.
#[derive(Clone, Default)]
pub struct ResponsePath(Option<Arc<ResponsePathNode>>);

struct ResponsePathNode {
    prev: ResponsePath,
    element: PathElement,
    depth: usize,
}

impl ResponsePath {
    /// The path of the operation's root value.
    pub fn root() -> ResponsePath {
        ResponsePath(None)
    }

    /// Returns a new path extending `self` with one segment.
    pub fn push(&self, element: impl Into<PathElement>) -> ResponsePath {
        ResponsePath(Some(Arc::new(ResponsePathNode {
            prev: self.clone(),
            element: element.into(),
            depth: self.len() + 1,
        })))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map(|node| node.depth).unwrap_or(0)
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.0.as_ref().map(|node| &node.element)
    }

    pub fn parent(&self) -> Option<&ResponsePath> {
        self.0.as_ref().map(|node| &node.prev)
    }

    /// Flattens the linked list, root first.
    pub fn to_path(&self) -> Path {
        let mut elements = Vec::with_capacity(self.len());
        let mut current = self;
        while let Some(node) = &current.0 {
            elements.push(node.element.clone());
            current = &node.prev;
        }
        elements.reverse();
        Path(elements)
    }
}

impl fmt::Debug for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResponsePath({})", self.to_path())
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_path().fmt(f)
    }
}

impl PartialEq for ResponsePath {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.depth == b.depth && a.element == b.element && a.prev == b.prev)
            }
            _ => false,
        }
    }
}

impl Eq for ResponsePath {}

impl From<&ResponsePath> for Path {
    fn from(path: &ResponsePath) -> Self {
        path.to_path()
    }
}

/// Extension methods for building response data out of path-addressed fragments.
pub trait ValueExt {
    /// Stores `value` at `path`, creating intermediate objects and arrays as needed.
    ///
    /// Array positions that do not exist yet are padded with `null`. A `null` already present
    /// at an intermediate position is replaced by the container the path requires.
    fn insert_at_path(&mut self, path: &Path, value: Value);

    /// Returns the value at `path`, if present.
    fn get_at_path(&self, path: &Path) -> Option<&Value>;
}

impl ValueExt for Value {
    fn insert_at_path(&mut self, path: &Path, value: Value) {
        let mut current = self;
        for element in path.iter() {
            current = match element {
                PathElement::Key(key) => {
                    if !current.is_object() {
                        *current = Value::Object(Object::new());
                    }
                    match current {
                        Value::Object(object) => object
                            .entry(ByteString::from(key.as_str()))
                            .or_insert(Value::Null),
                        _ => unreachable!("replaced by an object above"),
                    }
                }
                PathElement::Index(index) => {
                    if !current.is_array() {
                        *current = Value::Array(Vec::new());
                    }
                    match current {
                        Value::Array(array) => {
                            if array.len() <= *index {
                                array.resize(*index + 1, Value::Null);
                            }
                            &mut array[*index]
                        }
                        _ => unreachable!("replaced by an array above"),
                    }
                }
            };
        }
        *current = value;
    }

    fn get_at_path(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for element in path.iter() {
            current = match (element, current) {
                (PathElement::Key(key), Value::Object(object)) => object.get(key.as_str())?,
                (PathElement::Index(index), Value::Array(array)) => array.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}
