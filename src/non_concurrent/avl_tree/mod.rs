//! Height-balanced binary search tree over `i32` keys.

use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};

use log::{debug, trace};

use node::{Link, Node, balance_factor, min_value_node, rotate_left, rotate_right};

mod iter;
mod node;
mod validate;

pub use iter::Iter;
pub use validate::InvariantViolation;

pub type Key = i32;

/// An ordered set of unique keys, kept balanced as an AVL tree.
///
/// Every node owns its children, and the tree owns the root, so dropping the
/// tree frees everything.
#[derive(Default)]
pub struct AvlTree {
    root: Link,
    len: usize,
}

impl AvlTree {
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// The amount of keys in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, `0` when empty.
    pub fn height(&self) -> i32 {
        node::height(&self.root)
    }

    pub fn root_key(&self) -> Option<Key> {
        self.root.as_ref().map(|root| root.key)
    }

    pub fn min(&self) -> Option<Key> {
        self.root.as_deref().map(|root| min_value_node(root).key)
    }

    pub fn max(&self) -> Option<Key> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(node.key)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Inserts `key`, rebalancing on the way back up.
    ///
    /// Returns `false` (and leaves the tree untouched) if `key` was already present.
    ///
    /// Complexity: O(log(n))
    pub fn insert(&mut self, key: Key) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), key, &mut inserted));
        if inserted {
            self.len += 1;
        } else {
            debug!("insert of {key}: already present");
        }
        inserted
    }

    /// Removes `key`, rebalancing on the way back up.
    ///
    /// Returns `false` if `key` wasn't in the tree.
    ///
    /// Complexity: O(log(n))
    pub fn remove(&mut self, key: Key) -> bool {
        let mut removed = false;
        self.root = delete_node(self.root.take(), key, &mut removed);
        if removed {
            self.len -= 1;
        } else {
            debug!("remove of {key}: not present");
        }
        removed
    }

    /// Complexity: O(log(n))
    pub fn search(&self, key: Key) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        false
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Dumps the keys to stdout in ascending order, each followed by a space.
    pub fn print_in_order(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_in_order(&mut stdout)?;
        stdout.flush()
    }

    /// Same as [`AvlTree::print_in_order`], but to any writer.
    pub fn write_in_order<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        fn helper<W: Write + ?Sized>(link: &Link, out: &mut W) -> io::Result<()> {
            if let Some(node) = link {
                helper(&node.left, out)?;
                write!(out, "{} ", node.key)?;
                helper(&node.right, out)?;
            }
            Ok(())
        }
        helper(&self.root, out)
    }
}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for AvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Keys in ascending order, separated by single spaces.
impl fmt::Display for AvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.iter();
        if let Some(first) = keys.next() {
            write!(f, "{first}")?;
            for key in keys {
                write!(f, " {key}")?;
            }
        }
        Ok(())
    }
}

/// Inserts `key` into the subtree and returns its new root.
///
/// `inserted` is set when a node was actually created. A duplicate returns the
/// subtree untouched, so nothing above it gets rebalanced either.
fn insert_node(link: Link, key: Key, inserted: &mut bool) -> Box<Node> {
    let Some(mut node) = link else {
        *inserted = true;
        return Node::leaf(key);
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), key, inserted)),
        Ordering::Greater => node.right = Some(insert_node(node.right.take(), key, inserted)),
        Ordering::Equal => return node,
    }

    if !*inserted {
        return node;
    }

    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // the new key went left, so `node.left` exists
        if let Some(left) = node.left.take() {
            node.left = Some(if key > left.key {
                trace!("insert {key}: left-right case at {}", node.key);
                rotate_left(left)
            } else {
                trace!("insert {key}: left-left case at {}", node.key);
                left
            });
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if key < right.key {
                trace!("insert {key}: right-left case at {}", node.key);
                rotate_right(right)
            } else {
                trace!("insert {key}: right-right case at {}", node.key);
                right
            });
        }
        return rotate_left(node);
    }

    node
}

/// Removes `key` from the subtree and returns its new root (if any is left).
///
/// `removed` is set when a node was actually unlinked.
fn delete_node(link: Link, key: Key, removed: &mut bool) -> Link {
    let mut node = link?;

    match key.cmp(&node.key) {
        Ordering::Less => node.left = delete_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = delete_node(node.right.take(), key, removed),
        Ordering::Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                // zero or one child: that child's subtree takes this node's place as-is
                (None, None) => return None,
                (Some(only), None) | (None, Some(only)) => return Some(only),
                (Some(left), Some(right)) => {
                    let successor = min_value_node(&right).key;
                    trace!("remove {key}: replacing with inorder successor {successor}");
                    node.key = successor;
                    node.left = Some(left);
                    node.right = delete_node(Some(right), successor, removed);
                }
            }
        }
    }

    if !*removed {
        return Some(node);
    }

    node.update_height();
    Some(rebalance_after_delete(node))
}

/// Unlike insertion, the case is picked from the heavy child's own balance factor.
fn rebalance_after_delete(mut node: Box<Node>) -> Box<Node> {
    let balance = node.balance_factor();

    if balance > 1 {
        if balance_factor(&node.left) < 0 {
            trace!("remove: left-right case at {}", node.key);
            node.left = node.left.take().map(rotate_left);
        } else {
            trace!("remove: left-left case at {}", node.key);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if balance_factor(&node.right) > 0 {
            trace!("remove: right-left case at {}", node.key);
            node.right = node.right.take().map(rotate_right);
        } else {
            trace!("remove: right-right case at {}", node.key);
        }
        return rotate_left(node);
    }

    node
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    use super::*;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([
            0x3A, 0x91, 0x0C, 0x7E, 0xD4, 0x22, 0x5B, 0xF0, 0x18, 0x6D, 0xA7,
            0x43, 0xC9, 0x05, 0xEE, 0x71, 0x9F, 0x2B, 0x60, 0xD8, 0x14, 0xB3,
            0x4A, 0x87, 0x39, 0xFC, 0x0E, 0x65, 0xA1, 0x5D, 0xC2, 0x2F,
        ])
    }

    fn tree_of(keys: &[Key]) -> AvlTree {
        let mut tree = AvlTree::new();
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    fn keys(tree: &AvlTree) -> Vec<Key> {
        tree.iter().collect()
    }

    #[test]
    fn empty_tree() {
        let mut tree = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root_key(), None);
        assert_eq!((tree.min(), tree.max()), (None, None));
        assert!(!tree.search(0));
        assert!(!tree.remove(0));
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut tree = tree_of(&[5, 3, 8]);
        assert!(!tree.insert(3));
        assert!(!tree.insert(5));
        assert_eq!(tree.len(), 3);
        assert_eq!(keys(&tree), [3, 5, 8]);
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn left_left_insert() {
        let tree = tree_of(&[3, 2, 1]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn left_right_insert() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(keys(&tree), [1, 2, 3]);
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn right_left_insert() {
        let tree = tree_of(&[1, 3, 2]);
        assert_eq!(tree.root_key(), Some(2));
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn remove_leaf_and_single_child() {
        let mut tree = tree_of(&[20, 10, 30, 25]);
        assert!(tree.remove(30)); // one child (25)
        assert_eq!(keys(&tree), [10, 20, 25]);
        assert!(tree.remove(10)); // leaf
        assert_eq!(keys(&tree), [20, 25]);
        assert_eq!(tree.check_invariants(), Ok(()));
        assert!(tree.remove(20));
        assert!(tree.remove(25));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn remove_rebalances_right_left() {
        //    10
        //   /  \
        //  5    20
        //      /
        //    15
        let mut tree = tree_of(&[10, 5, 20, 15]);
        assert!(tree.remove(5));
        assert_eq!(tree.root_key(), Some(15));
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn remove_rebalances_left_left() {
        let mut tree = tree_of(&[10, 5, 20, 3, 7]);
        assert!(tree.remove(20));
        assert_eq!(tree.root_key(), Some(5));
        assert_eq!(keys(&tree), [3, 5, 7, 10]);
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn min_max_and_clear() {
        let mut tree = tree_of(&[4, -7, 19, 0, 12]);
        assert_eq!(tree.min(), Some(-7));
        assert_eq!(tree.max(), Some(19));
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn dump_formats() {
        let tree = tree_of(&[30, 10, 20]);
        let mut out = Vec::new();
        tree.write_in_order(&mut out).unwrap();
        assert_eq!(out, b"10 20 30 ");
        assert_eq!(tree.to_string(), "10 20 30");
        assert_eq!(format!("{tree:?}"), "{10, 20, 30}");
        assert_eq!(AvlTree::new().to_string(), "");
    }

    #[test]
    fn extreme_keys() {
        let tree = tree_of(&[Key::MAX, Key::MIN, 0]);
        assert_eq!(keys(&tree), [Key::MIN, 0, Key::MAX]);
        assert!(tree.search(Key::MIN));
        assert!(tree.search(Key::MAX));
    }

    #[test]
    fn sorted_inserts_stay_logarithmic() {
        let tree = tree_of(&(0..1024).collect::<Vec<_>>());
        assert_eq!(tree.len(), 1024);
        // 1.44 * log2(1026) ≈ 14.4
        assert!(tree.height() <= 14, "height: {}", tree.height());
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn random_ops_match_btreeset() {
        let mut rng = rng();
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for i in 0..20_000 {
            let key = rng.gen_range(-500..500);
            if rng.gen_bool(0.6) {
                assert_eq!(tree.insert(key), model.insert(key), "i: {}", i);
            } else {
                assert_eq!(tree.remove(key), model.remove(&key), "i: {}", i);
            }
            if i % 97 == 0 {
                assert_eq!(tree.check_invariants(), Ok(()), "i: {}", i);
            }
        }

        assert_eq!(tree.check_invariants(), Ok(()));
        assert_eq!(tree.len(), model.len());
        assert!(tree.iter().eq(model.iter().copied()));
        for key in -510..510 {
            assert_eq!(tree.search(key), model.contains(&key), "key: {}", key);
        }
    }

    #[test]
    fn drain_in_random_order() {
        let mut rng = rng();
        let mut pending: Vec<Key> = (0..2000).map(|_| rng.r#gen()).collect();
        let mut tree = tree_of(&pending);
        pending.sort_unstable();
        pending.dedup();
        assert_eq!(tree.len(), pending.len());

        while !pending.is_empty() {
            let key = pending.swap_remove(rng.gen_range(0..pending.len()));
            assert!(tree.remove(key));
            assert!(!tree.search(key));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.check_invariants(), Ok(()));
    }
}
