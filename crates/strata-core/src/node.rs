use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Index of a node slot in an [`Arena`].
pub(crate) type NodeId = usize;

/// A node's key, with sentinels as explicit variants so ordering is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKey {
    Head,
    Key(String),
    Tail,
}

pub(crate) struct Node {
    pub(crate) key: NodeKey,
    pub(crate) value: String,
    pub(crate) forward: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(key: String, value: String, level: usize, tail: NodeId) -> Self {
        Node {
            key: NodeKey::Key(key),
            value,
            forward: vec![tail; level],
        }
    }

    pub(crate) fn sentinel(key: NodeKey, level: usize, next: NodeId) -> Self {
        Node {
            key,
            value: String::new(),
            forward: vec![next; level],
        }
    }

    pub(crate) fn level(&self) -> usize {
        self.forward.len()
    }

    /// Orders this node's key against `search_key`. Sentinels sort after
    /// every real key, so traversal loops never need to special-case them.
    pub(crate) fn compare_key(&self, search_key: &str) -> Ordering {
        match &self.key {
            NodeKey::Key(key) => key.as_str().cmp(search_key),
            NodeKey::Head | NodeKey::Tail => Ordering::Greater,
        }
    }

    pub(crate) fn key_str(&self) -> Option<&str> {
        match &self.key {
            NodeKey::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("level", &self.level())
            .finish()
    }
}

/// Slot storage for nodes. Freed slots are recycled by later allocations,
/// so a `NodeId` stays valid until the node it names is freed.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Node {
        match self.slots.get_mut(id).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("dangling node id {}", id),
        }
    }

    /// Number of live nodes, sentinels included.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {}", id),
        }
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_key() {
        let node = Node::new("m".to_string(), "v".to_string(), 1, 0);
        assert_eq!(node.compare_key("a"), Ordering::Greater);
        assert_eq!(node.compare_key("m"), Ordering::Equal);
        assert_eq!(node.compare_key("z"), Ordering::Less);
    }

    #[test]
    fn test_sentinels_compare_greater() {
        let tail = Node::sentinel(NodeKey::Tail, 1, 0);
        let head = Node::sentinel(NodeKey::Head, 4, 0);
        for key in ["", "a", "\u{10FFFF}", "zzzzzzzz"] {
            assert_eq!(tail.compare_key(key), Ordering::Greater);
            assert_eq!(head.compare_key(key), Ordering::Greater);
        }
        assert_eq!(tail.key_str(), None);
        assert_eq!(head.level(), 4);
    }

    #[test]
    fn test_arena_reuses_freed_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new("a".into(), "1".into(), 1, 0));
        let b = arena.alloc(Node::new("b".into(), "2".into(), 2, 0));
        assert_eq!(arena.live(), 2);

        let freed = arena.free(a);
        assert_eq!(freed.key_str(), Some("a"));
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(Node::new("c".into(), "3".into(), 1, 0));
        assert_eq!(c, a);
        assert_eq!(arena[c].value, "3");
        assert_eq!(arena[b].level(), 2);
    }

    #[test]
    #[should_panic(expected = "dangling node id")]
    fn test_double_free_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new("a".into(), "1".into(), 1, 0));
        arena.free(a);
        arena.free(a);
    }
}
