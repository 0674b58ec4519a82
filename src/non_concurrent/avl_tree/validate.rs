use thiserror::Error;

use super::node::{Link, height};
use super::{AvlTree, Key};

/// The first broken invariant found by [`AvlTree::check_invariants`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the keys of its ancestors.
    #[error("key {key} is out of order (must lie strictly within {lower:?}..{upper:?})")]
    OutOfOrder {
        key: Key,
        lower: Option<Key>,
        upper: Option<Key>,
    },
    /// A node's cached height disagrees with its children.
    #[error("node {key} caches height {cached}, but its subtree has height {actual}")]
    StaleHeight { key: Key, cached: i32, actual: i32 },
    /// Child heights differ by more than one.
    #[error("node {key} has balance factor {balance}")]
    Unbalanced { key: Key, balance: i32 },
    /// The stored length doesn't match the amount of nodes.
    #[error("tree reports {reported} keys but holds {actual}")]
    LengthMismatch { reported: usize, actual: usize },
}

impl AvlTree {
    /// Walks the whole tree and checks ordering, cached heights, balance and length.
    ///
    /// Complexity: O(n)
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut count = 0;
        check_subtree(&self.root, None, None, &mut count)?;
        if count != self.len {
            return Err(InvariantViolation::LengthMismatch { reported: self.len, actual: count });
        }
        Ok(())
    }
}

/// Returns the real height of the subtree.
fn check_subtree(
    link: &Link,
    lower: Option<Key>,
    upper: Option<Key>,
    count: &mut usize,
) -> Result<i32, InvariantViolation> {
    let Some(node) = link else { return Ok(0) };
    let key = node.key;

    // strict bounds also rule out duplicates
    if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
        return Err(InvariantViolation::OutOfOrder { key, lower, upper });
    }
    *count += 1;

    let left = check_subtree(&node.left, lower, Some(key), count)?;
    let right = check_subtree(&node.right, Some(key), upper, count)?;

    let actual = 1 + left.max(right);
    if node.height != actual || height(&node.left) != left || height(&node.right) != right {
        return Err(InvariantViolation::StaleHeight { key, cached: node.height, actual });
    }

    let balance = left - right;
    if balance.abs() > 1 {
        return Err(InvariantViolation::Unbalanced { key, balance });
    }

    Ok(actual)
}
