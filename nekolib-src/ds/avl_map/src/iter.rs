use std::iter::FusedIterator;

use crate::{Link, Node};

// The stack holds the nodes whose own entry and right subtree are yet to
// be visited, deepest on top; its depth is bounded by the tree height.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    len: usize,
}

pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self { stack: vec![], len };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(cur) = node {
            self.stack.push(cur);
            node = cur.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.right.as_deref());
        self.len -= 1;
        Some((&node.key, &node.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { stack: self.stack.clone(), len: self.len }
    }
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Link<K, V>, len: usize) -> Self {
        let mut iter = Self { stack: vec![], len };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let mut node = self.stack.pop()?;
        self.descend(node.right.take());
        self.len -= 1;
        let Node { key, val, .. } = *node;
        Some((key, val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
