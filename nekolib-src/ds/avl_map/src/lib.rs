use std::{cmp::Ordering, fmt};

use tracing::{debug, trace};

mod iter;

pub use iter::{IntoIter, Iter};

pub struct AvlMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    val: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: usize,
}

/// Read-only view of a node, for inspecting the shape of the tree.
pub struct NodeRef<'a, K, V> {
    node: &'a Node<K, V>,
}

impl<K, V> AvlMap<K, V> {
    pub fn new() -> Self { Self { root: None, len: 0 } }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn height(&self) -> usize { link_height(&self.root) }

    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Ascending-key traversal. Each call starts over from the smallest key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Inserts `val` under `key` and returns `true`, or returns `false`
    /// leaving the map untouched if `key` is already present. The first
    /// value stored under a key is never replaced.
    pub fn insert(&mut self, key: K, val: V) -> bool {
        let (root, below) = insert(self.root.take(), key, val);
        self.root = Some(root);
        let inserted = below.is_some();
        if inserted {
            self.len += 1;
        }
        inserted
    }
}

impl<K, V> Node<K, V> {
    fn new(key: K, val: V) -> Box<Self> {
        Box::new(Self { key, val, left: None, right: None, height: 1 })
    }

    fn fix_height(&mut self) {
        let (lh, rh) = (link_height(&self.left), link_height(&self.right));
        self.height = 1 + lh.max(rh);
    }

    fn balance_factor(&self) -> isize {
        link_height(&self.left) as isize - link_height(&self.right) as isize
    }
}

fn link_height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        panic!("right rotation requires a left child");
    };
    node.left = pivot.right.take();
    node.fix_height();
    pivot.right = Some(node);
    pivot.fix_height();
    pivot
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        panic!("left rotation requires a right child");
    };
    node.right = pivot.left.take();
    node.fix_height();
    pivot.left = Some(node);
    pivot.fix_height();
    pivot
}

// Returns the new root of the subtree, along with how the inserted key
// compared to the key of the node it descended through (`Equal` if the
// subtree was empty and the new leaf is the root). `None` means the key
// was already present and nothing changed.
fn insert<K: Ord, V>(
    link: Link<K, V>,
    key: K,
    val: V,
) -> (Box<Node<K, V>>, Option<Ordering>) {
    let Some(mut node) = link else {
        return (Node::new(key, val), Some(Ordering::Equal));
    };

    let went = key.cmp(&node.key);
    let below = match went {
        Ordering::Less => {
            let (left, below) = insert(node.left.take(), key, val);
            node.left = Some(left);
            below
        }
        Ordering::Greater => {
            let (right, below) = insert(node.right.take(), key, val);
            node.right = Some(right);
            below
        }
        Ordering::Equal => {
            debug!("duplicate key ignored");
            return (node, None);
        }
    };

    match below {
        Some(below) => {
            node.fix_height();
            (rebalance(node, below), Some(went))
        }
        None => (node, None),
    }
}

// `below` is the inserted key compared against the child on the side the
// insertion descended into; only that side can have grown.
fn rebalance<K, V>(
    mut node: Box<Node<K, V>>,
    below: Ordering,
) -> Box<Node<K, V>> {
    let balance = node.balance_factor();
    debug_assert!((-2..=2).contains(&balance));

    if balance > 1 && below == Ordering::Less {
        trace!(case = "left-left", "rebalancing");
        rotate_right(node)
    } else if balance < -1 && below == Ordering::Greater {
        trace!(case = "right-right", "rebalancing");
        rotate_left(node)
    } else if balance > 1 && below == Ordering::Greater {
        trace!(case = "left-right", "rebalancing");
        node.left = node.left.take().map(rotate_left);
        rotate_right(node)
    } else if balance < -1 && below == Ordering::Less {
        trace!(case = "right-left", "rebalancing");
        node.right = node.right.take().map(rotate_right);
        rotate_left(node)
    } else {
        debug_assert!(balance.abs() <= 1);
        node
    }
}

impl<'a, K, V> NodeRef<'a, K, V> {
    fn new(node: &'a Node<K, V>) -> Self { Self { node } }

    pub fn key(&self) -> &'a K { &self.node.key }
    pub fn value(&self) -> &'a V { &self.node.val }
    pub fn left(&self) -> Option<Self> {
        self.node.left.as_deref().map(NodeRef::new)
    }
    pub fn right(&self) -> Option<Self> {
        self.node.right.as_deref().map(NodeRef::new)
    }
    pub fn height(&self) -> usize { self.node.height }
    pub fn balance_factor(&self) -> isize { self.node.balance_factor() }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}
impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self { *self }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("height", &self.height())
            .finish()
    }
}

/// Height of a possibly absent node; `0` for `None`.
pub fn height<K, V>(node: Option<NodeRef<'_, K, V>>) -> usize {
    node.map_or(0, |node| node.height())
}

/// Balance factor of a possibly absent node; `0` for `None`.
pub fn balance_factor<K, V>(node: Option<NodeRef<'_, K, V>>) -> isize {
    node.map_or(0, |node| node.balance_factor())
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, val) in iter {
            self.insert(key, val);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

impl<'a, K, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<K, V> IntoIterator for AvlMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.root, self.len)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
