//! Tree nodes.
//!
//! A document is a single root [`Node`]. Each node has:
//! - a raw byte key, unique among its siblings
//! - either an ordered list of children (an internal node)
//! - or a leaf value
//!
//! `{"root":{"a":"1"}}` is `Node { key: "root", children: [Node { key: "a", value: Some("1") }] }`.

use std::borrow::Cow;

use crate::Value;

/// A node in a jsontree document.
///
/// Children keep insertion order. Keys are stored exactly as they appear on
/// the wire, escape markers included, and compared byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<V> {
    /// The raw key.
    pub key: Vec<u8>,
    /// Leaf payload; `None` on internal nodes.
    pub value: Option<V>,
    /// Child nodes in insertion order.
    pub children: Vec<Node<V>>,
}

impl<V> Node<V> {
    /// Create a node with neither children nor a value.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Node {
            key: key.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node.
    pub fn leaf(key: impl Into<Vec<u8>>, value: V) -> Self {
        Node {
            key: key.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// Create an internal node from its children.
    pub fn branch(key: impl Into<Vec<u8>>, children: impl IntoIterator<Item = Node<V>>) -> Self {
        Node {
            key: key.into(),
            value: None,
            children: children.into_iter().collect(),
        }
    }

    /// The key, lossily decoded for display.
    pub fn key_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    /// Whether this node carries a value and no children.
    pub fn is_leaf(&self) -> bool {
        self.value.is_some() && self.children.is_empty()
    }

    /// Whether this node has neither children nor a value.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Get a direct child by key.
    pub fn child(&self, key: &[u8]) -> Option<&Node<V>> {
        self.children.iter().find(|child| child.key == key)
    }

    /// Get a direct child by key, mutably.
    pub fn child_mut(&mut self, key: &[u8]) -> Option<&mut Node<V>> {
        self.children.iter_mut().find(|child| child.key == key)
    }

    /// Get a direct child by key, appending an empty one if there is none.
    pub fn child_or_insert(&mut self, key: &[u8]) -> &mut Node<V> {
        let index = match self.children.iter().position(|child| child.key == key) {
            Some(index) => index,
            None => {
                self.children.push(Node::new(key));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Append a child without checking for an existing sibling with the same key.
    pub fn push_child(&mut self, child: Node<V>) {
        self.children.push(child);
    }

    /// Set the leaf value, returning the previous one.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }

    /// Find a descendant by path, relative to this node.
    ///
    /// The first key is matched against this node's children. Returns `None`
    /// for an empty path or when any key is missing; never creates nodes.
    pub fn lookup<K: AsRef<[u8]>>(&self, path: &[K]) -> Option<&Node<V>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.child(first.as_ref())?;
        for key in rest {
            node = node.child(key.as_ref())?;
        }
        Some(node)
    }

    /// Find a descendant by path, mutably.
    pub fn lookup_mut<K: AsRef<[u8]>>(&mut self, path: &[K]) -> Option<&mut Node<V>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.child_mut(first.as_ref())?;
        for key in rest {
            node = node.child_mut(key.as_ref())?;
        }
        Some(node)
    }

    /// Find a descendant by path, creating every missing node along the way.
    ///
    /// New nodes are appended after their existing siblings, so sibling order
    /// follows call order. Calling this twice with the same path returns the
    /// same node. Returns `None` for an empty path.
    pub fn get_or_create<K: AsRef<[u8]>>(&mut self, path: &[K]) -> Option<&mut Node<V>> {
        if path.is_empty() {
            return None;
        }
        Some(self.descendant_or_insert(path))
    }

    /// Like [`get_or_create`](Node::get_or_create), but an empty path yields
    /// this node itself.
    pub fn descendant_or_insert<K: AsRef<[u8]>>(&mut self, path: &[K]) -> &mut Node<V> {
        let mut node = self;
        for key in path {
            node = node.child_or_insert(key.as_ref());
        }
        node
    }
}

/// Read access to a node, as needed to serialize it.
///
/// Implemented by [`Node`]; applications can implement it for their own
/// types to stream them through a writer without building a [`Node`] tree.
pub trait TreeNode {
    /// Leaf payload type.
    type Value: Value;

    /// The raw key, written verbatim.
    fn key(&self) -> &[u8];

    /// The leaf payload, if any.
    fn value(&self) -> Option<&Self::Value>;

    /// Number of child slots.
    fn child_count(&self) -> usize;

    /// The child in slot `index`.
    ///
    /// Returning `None` for an index below [`child_count`](TreeNode::child_count)
    /// marks a missing child, which serializers reject.
    fn child_at(&self, index: usize) -> Option<&Self>;
}

impl<V: Value> TreeNode for Node<V> {
    type Value = V;

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }
}

/// Owner of an optional root node.
///
/// An empty tree is what the serializer reports as a nil root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<V> {
    root: Option<Node<V>>,
}

impl<V> Tree<V> {
    /// Create a tree without a root.
    pub fn new() -> Self {
        Tree { root: None }
    }

    /// The root node.
    pub fn root(&self) -> Option<&Node<V>> {
        self.root.as_ref()
    }

    /// The root node, mutably.
    pub fn root_mut(&mut self) -> Option<&mut Node<V>> {
        self.root.as_mut()
    }

    /// Replace the root, returning the old one.
    pub fn set_root(&mut self, root: Node<V>) -> Option<Node<V>> {
        self.root.replace(root)
    }

    /// Take the root out of the tree.
    pub fn into_root(self) -> Option<Node<V>> {
        self.root
    }

    /// Find a node by full path, starting with the root key.
    pub fn lookup<K: AsRef<[u8]>>(&self, path: &[K]) -> Option<&Node<V>> {
        let root = self.root.as_ref()?;
        let (first, rest) = path.split_first()?;
        let first: &[u8] = first.as_ref();
        if root.key != first {
            return None;
        }
        if rest.is_empty() {
            Some(root)
        } else {
            root.lookup(rest)
        }
    }
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Node<V>> for Tree<V> {
    fn from(root: Node<V>) -> Self {
        Tree { root: Some(root) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    type N = Node<String>;

    fn leaf(key: &str, value: &str) -> N {
        Node::leaf(key, value.to_string())
    }

    fn sample() -> N {
        Node::branch(
            "a",
            [
                Node::branch(
                    "1",
                    [
                        Node::branch("a", [leaf("i", "v1")]),
                        leaf("b", "v2"),
                    ],
                ),
                Node::branch("2", [leaf("a", "v3")]),
            ],
        )
    }

    #[test]
    fn test_lookup() {
        let node = sample();
        assert!(node.lookup(&["a"]).is_none());
        assert_eq!(node.lookup(&["1"]), Some(&node.children[0]));
        assert_eq!(node.lookup(&["1", "a"]), Some(&node.children[0].children[0]));
        assert_eq!(
            node.lookup(&["1", "a", "i"]).and_then(|n| n.value.as_deref()),
            Some("v1")
        );
        assert!(node.lookup(&["1", "a", "X"]).is_none());
        assert_eq!(node.lookup(&["1", "b"]).unwrap().value.as_deref(), Some("v2"));
        assert_eq!(node.lookup(&["2"]), Some(&node.children[1]));
        assert_eq!(node.lookup(&["2", "a"]).unwrap().value.as_deref(), Some("v3"));
    }

    #[test]
    fn test_lookup_empty_path() {
        let node = sample();
        let empty: [&str; 0] = [];
        assert!(node.lookup(&empty).is_none());
    }

    #[test]
    fn test_lookup_mut() {
        let mut node = sample();
        node.lookup_mut(&["1", "b"]).unwrap().set_value("changed".to_string());
        assert_eq!(node.lookup(&["1", "b"]).unwrap().value.as_deref(), Some("changed"));
    }

    #[test]
    fn test_get_or_create_empty_path() {
        let mut node: N = Node::new("root");
        let empty: [&[u8]; 0] = [];
        assert!(node.get_or_create(&empty).is_none());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_get_or_create_appends_in_call_order() {
        let mut node: N = Node::new("root");
        node.get_or_create(&["B"]);
        node.get_or_create(&["A"]);
        let keys: Vec<_> = node.children.iter().map(|c| c.key_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut node: N = Node::new("root");
        let first: *const N = node.get_or_create(&["A", "1"]).unwrap();
        let second: *const N = node.get_or_create(&["A", "1"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].children.len(), 1);
    }

    #[test]
    fn test_get_or_create_nested() {
        let mut node: N = Node::new("root");
        node.get_or_create(&["A"]);
        node.get_or_create(&["B"]);
        node.get_or_create(&["B", "1", "i", "a"])
            .unwrap()
            .set_value("deep".to_string());
        node.get_or_create(&["A", "1"]);

        // Root children were not affected by the nested inserts.
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].children[0].key, b"1");
        let b = &node.children[1];
        assert_eq!(b.children[0].key, b"1");
        assert_eq!(b.children[0].children[0].key, b"i");
        assert_eq!(b.children[0].children[0].children[0].key, b"a");
        assert_eq!(
            node.lookup(&["B", "1", "i", "a"]).unwrap().value.as_deref(),
            Some("deep")
        );
    }

    #[test]
    fn test_keys_compare_raw_bytes() {
        let mut node: N = Node::new("root");
        node.get_or_create(&[r#"a\"b"#]);
        assert!(node.child(br#"a"b"#).is_none());
        assert!(node.child(br#"a\"b"#).is_some());
    }

    #[test]
    fn test_shape_predicates() {
        assert!(leaf("k", "v").is_leaf());
        assert!(N::new("k").is_empty());
        let branch = sample();
        assert!(!branch.is_leaf());
        assert!(!branch.is_empty());
    }

    #[test]
    fn test_tree_node_impl() {
        let node = sample();
        assert_eq!(TreeNode::key(&node), b"a");
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.child_at(1).map(|c| c.key.as_slice()), Some(&b"2"[..]));
        assert!(node.child_at(2).is_none());
        assert!(TreeNode::value(&node).is_none());
    }

    #[test]
    fn test_tree_lookup_includes_root_key() {
        let tree = Tree::from(sample());
        assert_eq!(tree.lookup(&["a"]).map(|n| n.key.as_slice()), Some(&b"a"[..]));
        assert_eq!(tree.lookup(&["a", "2", "a"]).unwrap().value.as_deref(), Some("v3"));
        assert!(tree.lookup(&["x"]).is_none());
        assert!(Tree::<String>::new().lookup(&["a"]).is_none());
    }

    #[test]
    fn test_descendant_or_insert_empty_path_is_self() {
        let mut node: N = Node::new("root");
        let empty: [&str; 0] = [];
        node.descendant_or_insert(&empty).set_value("v".to_string());
        assert_eq!(node.value.as_deref(), Some("v"));
        assert!(node.children.is_empty());
    }
}
