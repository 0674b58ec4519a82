use log::trace;

use super::Key;

/// An owned, possibly empty subtree.
pub(crate) type Link = Option<Box<Node>>;

// PROVE: a subtree of height `h` holds at least `F(h+2) - 1` nodes (fibonacci)
// LEMMA: an AVL tree with `n` nodes has height at most `~1.44 * log₂(n+2)`

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: Key,
    /// Height of the subtree rooted here. A leaf has height 1.
    pub(crate) height: i32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn leaf(key: Key) -> Box<Self> {
        Box::new(Self {
            key,
            height: 1,
            left: None,
            right: None,
        })
    }

    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    pub(crate) fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

/// Height of a subtree, `0` if it is empty.
pub(crate) fn height(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// `height(left) - height(right)`, `0` if the subtree is empty.
pub(crate) fn balance_factor(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

/// Leftmost node of the subtree, i.e. the one holding its smallest key.
///
/// Complexity: O(height)
pub(crate) fn min_value_node(mut node: &Node) -> &Node {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node
}

/// ```text
///         y              x
///        / \            / \
///       x   C   -->    A   y
///      / \                / \
///     A   T2             T2  C
/// ```
///
/// `y` must have a left child. Without one there is nothing to rotate and `y` is returned as-is.
pub(crate) fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else { return y };
    trace!("rotate right at {} (new subtree root {})", y.key, x.key);

    y.left = x.right.take();
    // `y` is now below `x`, so its height has to be fixed first
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Mirror image of [`rotate_right`]. `x` must have a right child.
pub(crate) fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else { return x };
    trace!("rotate left at {} (new subtree root {})", x.key, y.key);

    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}
