//! The settings tree.
//!
//! Settings live in an ordered tree of [`Node`]s. Leaves hold plain JSON
//! values, deferred leaves hold computations evaluated on every fetch, and
//! branches hold nested trees. Leaves never hold JSON objects: converting an
//! object always produces a branch, so deep lookups work the same whether a
//! sub-tree was set key by key or in one go.

use crate::{ConfigError, KeyPath};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Zero-argument computation stored as a lazily evaluated setting.
type Computation = dyn Fn() -> Result<Node, ConfigError> + Send + Sync;

/// A value computed at fetch time.
///
/// The computation may itself return another deferred value; fetching keeps
/// evaluating until a concrete node comes out. Results are never cached.
#[derive(Clone)]
pub struct Deferred(Arc<Computation>);

impl Deferred {
    /// Wrap an infallible computation.
    pub fn new<F, T>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Node>,
    {
        Self(Arc::new(move || Ok(compute().into())))
    }

    /// Wrap a computation that may fail.
    pub fn fallible<F>(compute: F) -> Self
    where
        F: Fn() -> Result<Node, ConfigError> + Send + Sync + 'static,
    {
        Self(Arc::new(compute))
    }

    /// Run the computation once.
    pub fn call(&self) -> Result<Node, ConfigError> {
        (self.0)()
    }

    /// Run the computation until the result is no longer deferred.
    pub fn resolve(&self) -> Result<Node, ConfigError> {
        let mut node = self.call()?;
        while let Node::Deferred(next) = node {
            node = next.call()?;
        }
        Ok(node)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// A single entry in the settings tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Concrete value (never a JSON object).
    Leaf(Value),
    /// Computation evaluated on fetch.
    Deferred(Deferred),
    /// Nested settings.
    Branch(Tree),
}

impl Node {
    /// Whether this node counts as "no value" for lookups.
    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Leaf(Value::Null))
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Node::Branch(_))
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Tree> {
        match self {
            Node::Branch(tree) => Some(tree),
            _ => None,
        }
    }

    /// Convert into plain JSON, evaluating deferred values.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        match self {
            Node::Leaf(value) => Ok(value.clone()),
            Node::Branch(tree) => tree.to_value(),
            Node::Deferred(deferred) => deferred.resolve()?.to_value(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Leaf(a), Node::Leaf(b)) => a == b,
            (Node::Branch(a), Node::Branch(b)) => a == b,
            (Node::Deferred(a), Node::Deferred(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Branch(Tree::from(map)),
            other => Node::Leaf(other),
        }
    }
}

impl From<Deferred> for Node {
    fn from(deferred: Deferred) -> Self {
        Node::Deferred(deferred)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Branch(tree)
    }
}

macro_rules! leaf_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::from(Value::from(value))
                }
            }
        )*
    };
}

leaf_from!(
    &str,
    String,
    bool,
    i32,
    i64,
    u32,
    u64,
    f64,
    Vec<Value>,
    Vec<String>,
    Vec<&str>,
    Vec<i64>,
);

/// Ordered mapping from key segment to node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    entries: IndexMap<String, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a JSON value; `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from(map)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Insert a node, replacing any existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.entries.insert(key.into(), node)
    }

    /// Remove an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Convert into a JSON object, evaluating deferred values.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        let mut map = Map::new();
        for (key, node) in &self.entries {
            map.insert(key.clone(), node.to_value()?);
        }
        Ok(Value::Object(map))
    }
}

impl From<Map<String, Value>> for Tree {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(key, value)| (key, Node::from(value)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Node)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, node) in iter {
            tree.insert(key, node);
        }
        tree
    }
}

/// Store `node` at `path`, creating intermediate branches as needed.
///
/// An intermediate leaf is replaced by a branch; its value is lost.
pub fn deep_set(root: &mut Tree, path: &KeyPath, node: Node) -> Node {
    set_in(root, path.segments(), node.clone());
    node
}

fn set_in(tree: &mut Tree, segments: &[String], node: Node) {
    let Some((key, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        tree.insert(key.clone(), node);
        return;
    }
    match tree.get_mut(key) {
        Some(Node::Branch(child)) => set_in(child, rest, node),
        _ => {
            let mut child = Tree::new();
            set_in(&mut child, rest, node);
            tree.insert(key.clone(), Node::Branch(child));
        }
    }
}

/// Look up the node at `path`; `None` when any segment is missing.
pub fn deep_get<'a>(root: &'a Tree, path: &KeyPath) -> Option<&'a Node> {
    let (first, rest) = path.segments().split_first()?;
    let mut node = root.get(first)?;
    for segment in rest {
        node = node.as_branch()?.get(segment)?;
    }
    Some(node)
}

/// Merge `other` into `base`; nested branches merge, anything else is replaced.
pub fn deep_merge(base: &mut Tree, other: &Tree) {
    for (key, node) in other.iter() {
        if let (Some(Node::Branch(existing)), Node::Branch(incoming)) = (base.get_mut(key), node) {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key, node.clone());
    }
}

/// Delete the node at `segments`.
///
/// Descends while the next segment holds a branch. The first non-branch
/// value met along the way is removed from its parent and returned, even if
/// segments remain. A missing key invokes `on_missing` with the absent
/// segment instead.
pub fn deep_delete<F>(tree: &mut Tree, segments: &[String], on_missing: F) -> Option<Node>
where
    F: FnOnce(&str) -> Option<Node>,
{
    let (key, rest) = segments.split_first()?;
    if !rest.is_empty() {
        if let Some(Node::Branch(child)) = tree.get_mut(key) {
            return deep_delete(child, rest, on_missing);
        }
    }
    let present = tree.get(key).is_some_and(|node| !node.is_absent());
    if present {
        tree.remove(key)
    } else {
        on_missing(key)
    }
}
