//! A Functional BST. This is modeled after a BST one would see in
//! a functional language like Haskell: a tree is either empty, a leaf
//! holding one element, or a node holding a left subtree, an element,
//! and a right subtree. Any operation that one would expect to modify
//! the tree (i.e. `insert`) instead returns a new tree that references
//! every subtree of the original it didn't have to rebuild.
//!
//! There is no parent linkage and no way to remove an element.
//!
//! # Examples
//!
//! ```
//! use bstree::functional::Tree;
//!
//! let tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.search(&1), None);
//!
//! // This `insert` returns a new tree!
//! let new_tree = tree.insert(1);
//!
//! // The new tree has this new element but the old one doesn't.
//! assert_eq!(new_tree.search(&1), Some(&1));
//! assert_eq!(tree.search(&1), None);
//!
//! // Inserting a duplicate gives yet another tree with both copies.
//! let newer_tree = new_tree.insert(1);
//!
//! // All history is preserved.
//! assert_eq!(newer_tree.count(), 2);
//! assert_eq!(new_tree.count(), 1);
//! assert_eq!(tree.count(), 0);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;
use std::rc::Rc;

/// A Binary Search Tree. This can be used for inserting and searching
/// for elements. Note that this data structure is functional - `insert`
/// returns a new tree instead of modifying this one.
pub enum Tree<T> {
    /// A marker for the empty subtree at the bottom of the tree.
    Empty,
    /// A subtree holding exactly one element and no children.
    Leaf(Rc<T>),
    /// A subtree with an element and two children (either of which may be
    /// [`Empty`][Tree::Empty]). This enum trivially wraps the [`Node`] struct.
    Node(Node<T>),
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Manual implementation of `Clone` so we don't require `T: Clone`. Cloning
/// a tree only bumps reference counts.
impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Leaf(value) => Self::Leaf(Rc::clone(value)),
            Self::Node(n) => Self::Node(n.clone()),
        }
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self::Empty
    }

    /// Returns a new tree that also holds `value`. An element less than a
    /// node's element goes to its left, anything else goes to its right.
    /// Only the path from the root down to the new element is rebuilt.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::functional::Tree;
    ///
    /// let tree = Tree::new().insert(7).insert(2).insert(10);
    /// let bigger = tree.insert(5);
    ///
    /// // All history is preserved.
    /// assert_eq!(bigger.search(&5), Some(&5));
    /// assert_eq!(tree.search(&5), None);
    /// assert_eq!(bigger.to_string(), "((. <- 2 -> 5) <- 7 -> 10)");
    /// ```
    pub fn insert(&self, value: T) -> Self
    where
        T: Ord,
    {
        match self {
            Self::Empty => Self::Leaf(Rc::new(value)),
            // A leaf turns into a node with the new element as a leaf on one
            // side and nothing on the other.
            Self::Leaf(existing) => {
                let (left, right) = if value < **existing {
                    (Child::leaf(value), Child::empty())
                } else {
                    (Child::empty(), Child::leaf(value))
                };
                Self::Node(Node {
                    left,
                    value: Rc::clone(existing),
                    right,
                })
            }
            Self::Node(n) => Self::Node(n.insert(value)),
        }
    }

    /// Potentially finds an element equal to `x` in this tree. If no such
    /// element exists, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::functional::Tree;
    ///
    /// let tree = Tree::new().insert(1);
    ///
    /// assert_eq!(tree.search(&1), Some(&1));
    /// assert_eq!(tree.search(&42), None);
    /// ```
    pub fn search(&self, x: &T) -> Option<&T>
    where
        T: Ord,
    {
        let mut tree = self;
        loop {
            match tree {
                Self::Empty => return None,
                Self::Leaf(value) => return (**value == *x).then_some(&**value),
                Self::Node(n) => match x.cmp(&n.value) {
                    Ordering::Less => tree = n.left.tree(),
                    Ordering::Greater => tree = n.right.tree(),
                    Ordering::Equal => return Some(&*n.value),
                },
            }
        }
    }

    /// Whether an element equal to `x` is in this tree.
    pub fn contains(&self, x: &T) -> bool
    where
        T: Ord,
    {
        self.search(x).is_some()
    }

    /// Whether this tree has no elements.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Counts the elements in this tree. This walks the whole tree.
    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf(_) => 1,
            Self::Node(n) => n.left.tree().count() + 1 + n.right.tree().count(),
        }
    }

    /// The number of edges on the longest path from the root to a leaf.
    /// A single leaf has a height of 0 and the empty tree has no height
    /// at all (conventionally -1), hence the `Option`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::functional::Tree;
    ///
    /// let tree = Tree::new();
    /// assert_eq!(tree.height(), None);
    ///
    /// let tree = tree.insert(2);
    /// assert_eq!(tree.height(), Some(0));
    ///
    /// let tree = tree.insert(1).insert(3);
    /// assert_eq!(tree.height(), Some(1));
    /// ```
    pub fn height(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::Leaf(_) => Some(0),
            Self::Node(n) => {
                let tallest = n.left.tree().height().max(n.right.tree().height());
                Some(tallest.map_or(0, |h| h + 1))
            }
        }
    }

    /// The smallest element in the tree.
    pub fn minimum(&self) -> Option<&T> {
        let mut tree = self;
        let mut smallest = None;
        loop {
            match tree {
                Self::Empty => return smallest,
                Self::Leaf(value) => return Some(&**value),
                Self::Node(n) => {
                    smallest = Some(&*n.value);
                    tree = n.left.tree();
                }
            }
        }
    }

    /// The largest element in the tree. With duplicates, this is the one
    /// inserted last.
    pub fn maximum(&self) -> Option<&T> {
        let mut tree = self;
        let mut largest = None;
        loop {
            match tree {
                Self::Empty => return largest,
                Self::Leaf(value) => return Some(&**value),
                Self::Node(n) => {
                    largest = Some(&*n.value);
                    tree = n.right.tree();
                }
            }
        }
    }

    /// Iterates over the elements in sorted (in-order) order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::functional::Tree;
    ///
    /// let tree: Tree<_> = [7, 2, 5, 10, 9, 1].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 5, 7, 9, 10]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self);
        iter
    }

    /// Checks that every element lies in `[min, max]` and that the
    /// ordering invariant holds at every node: everything on the left is
    /// strictly less, everything on the right is greater or equal.
    pub fn is_binary_search_tree(&self, min: &T, max: &T) -> bool
    where
        T: Ord,
    {
        let mut stack = vec![(self, Bound::Included(min), Bound::Included(max))];
        while let Some((tree, lower, upper)) = stack.pop() {
            match tree {
                Self::Empty => {}
                Self::Leaf(value) => {
                    if !within(&**value, lower, upper) {
                        return false;
                    }
                }
                Self::Node(n) => {
                    if !within(&*n.value, lower, upper) {
                        return false;
                    }
                    stack.push((n.left.tree(), lower, Bound::Excluded(&*n.value)));
                    stack.push((n.right.tree(), Bound::Included(&*n.value), upper));
                }
            }
        }
        true
    }
}

/// Whether `value` lies between the two bounds.
fn within<T: Ord>(value: &T, lower: Bound<&T>, upper: Bound<&T>) -> bool {
    let above = match lower {
        Bound::Included(min) => value >= min,
        Bound::Excluded(min) => value > min,
        Bound::Unbounded => true,
    };
    let below = match upper {
        Bound::Included(max) => value <= max,
        Bound::Excluded(max) => value < max,
        Bound::Unbounded => true,
    };
    above && below
}

impl<T: Ord> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |tree, value| tree.insert(value))
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders as `(left <- value -> right)`, a leaf as its element and the
/// empty tree as `.`.
impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("."),
            Self::Leaf(value) => write!(f, "{}", value),
            Self::Node(n) => write!(
                f,
                "({} <- {} -> {})",
                n.left.tree(),
                n.value,
                n.right.tree()
            ),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            Self::Node(n) => fmt::Debug::fmt(n, f),
        }
    }
}

struct Child<T>(Rc<Tree<T>>);
impl<T> Clone for Child<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}
impl<T> Child<T> {
    fn empty() -> Self {
        Self(Rc::new(Tree::Empty))
    }

    fn leaf(value: T) -> Self {
        Self(Rc::new(Tree::Leaf(Rc::new(value))))
    }

    fn tree(&self) -> &Tree<T> {
        &self.0
    }

    fn insert(&self, value: T) -> Self
    where
        T: Ord,
    {
        Self(Rc::new(self.0.insert(value)))
    }
}

/// A `Node` has an element and two children, either of which may be
/// [`Empty`][Tree::Empty]. It never has two empty children since a lone
/// element is a [`Leaf`][Tree::Leaf].
pub struct Node<T> {
    left: Child<T>,
    value: Rc<T>,
    right: Child<T>,
}

/// Manual implementation of `Clone` so we don't clone references when the generic parameter
/// isn't `Clone` itself.
///
/// Note the comment on generic structs in
/// [the docs][<https://doc.rust-lang.org/std/clone/trait.Clone.html#derivable>].
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            value: Rc::clone(&self.value),
            right: self.right.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("left", self.left.tree())
            .field("right", self.right.tree())
            .finish()
    }
}

impl<T> Node<T> {
    /// The subtree holding the elements less than this node's element.
    pub fn left(&self) -> &Tree<T> {
        self.left.tree()
    }

    /// This node's element.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The subtree holding the elements greater than or equal to this
    /// node's element.
    pub fn right(&self) -> &Tree<T> {
        self.right.tree()
    }

    /// Rebuilds this node with `value` inserted into one side. The other
    /// side is shared with `self`.
    fn insert(&self, value: T) -> Self
    where
        T: Ord,
    {
        if value < *self.value {
            Self {
                left: self.left.insert(value),
                value: Rc::clone(&self.value),
                right: self.right.clone(),
            }
        } else {
            Self {
                left: self.left.clone(),
                value: Rc::clone(&self.value),
                right: self.right.insert(value),
            }
        }
    }
}

/// A borrowing in-order iterator over a [`Tree`], created by [`Tree::iter`].
pub struct Iter<'a, T> {
    /// Elements whose left subtree has already been pushed, paired with
    /// their right subtree (if any).
    stack: Vec<(&'a T, Option<&'a Tree<T>>)>,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut tree: &'a Tree<T>) {
        loop {
            match tree {
                Tree::Empty => return,
                Tree::Leaf(value) => {
                    self.stack.push((&**value, None));
                    return;
                }
                Tree::Node(n) => {
                    self.stack.push((&*n.value, Some(n.right.tree())));
                    tree = n.left.tree();
                }
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let (value, right) = self.stack.pop()?;
        if let Some(right) = right {
            self.push_left_spine(right);
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7, 2, 5, 10, 9, 1 gives:
    ///
    /// ```text
    ///        7
    ///      /   \
    ///     2     10
    ///    / \    /
    ///   1   5  9
    /// ```
    fn sample() -> Tree<i32> {
        [7, 2, 5, 10, 9, 1].into_iter().collect()
    }

    #[test]
    fn test_search() {
        let tree = sample();

        assert_eq!(tree.search(&10), Some(&10));
        assert_eq!(tree.search(&1), Some(&1));
        assert_eq!(tree.search(&11), None);
        assert_eq!(tree.height(), Some(2));
        assert_eq!(tree.count(), 6);
    }

    #[test]
    fn test_empty() {
        let tree = Tree::<i32>::new();

        assert!(tree.is_empty());
        assert_eq!(tree.count(), 0);
        assert_eq!(tree.height(), None);
        assert_eq!(tree.minimum(), None);
        assert_eq!(tree.maximum(), None);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.to_string(), ".");
    }

    #[test]
    fn test_leaf_becomes_node() {
        let tree = Tree::new().insert(5);
        assert!(matches!(tree, Tree::Leaf(_)));

        let smaller = tree.insert(3);
        match &smaller {
            Tree::Node(n) => {
                assert_eq!(n.value(), &5);
                assert!(matches!(n.left(), Tree::Leaf(v) if **v == 3));
                assert!(n.right().is_empty());
            }
            _ => panic!("expected a node, got {:?}", smaller),
        }

        // Ties go right.
        let equal = tree.insert(5);
        match &equal {
            Tree::Node(n) => {
                assert!(n.left().is_empty());
                assert!(matches!(n.right(), Tree::Leaf(v) if **v == 5));
            }
            _ => panic!("expected a node, got {:?}", equal),
        }
    }

    #[test]
    fn test_height() {
        let mut tree = Tree::new();
        assert_eq!(tree.height(), None);

        tree = tree.insert(1);
        assert_eq!(tree.height(), Some(0));

        // Insert to the right making it taller.
        tree = tree.insert(2);
        assert_eq!(tree.height(), Some(1));

        // Insert to the left not changing the overall height.
        tree = tree.insert(0);
        assert_eq!(tree.height(), Some(1));

        // Sorted input never branches.
        let tree: Tree<_> = (0..10).collect();
        assert_eq!(tree.height(), Some(9));
    }

    #[test]
    fn test_insert_shares_untouched_subtrees() {
        let tree = sample();
        let bigger = tree.insert(8);

        let (Tree::Node(old), Tree::Node(new)) = (&tree, &bigger) else {
            panic!("both trees have a root node");
        };
        // 8 goes right so the whole left subtree is reused.
        assert!(Rc::ptr_eq(&old.left.0, &new.left.0));
        assert!(!Rc::ptr_eq(&old.right.0, &new.right.0));
        assert!(Rc::ptr_eq(&old.value, &new.value));

        // The original is untouched.
        assert_eq!(tree.search(&8), None);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 5, 7, 9, 10]);
        assert_eq!(
            bigger.iter().copied().collect::<Vec<_>>(),
            [1, 2, 5, 7, 8, 9, 10]
        );
    }

    #[test]
    fn test_extremes() {
        let tree = sample();

        assert_eq!(tree.minimum(), Some(&1));
        assert_eq!(tree.maximum(), Some(&10));
        assert_eq!(Tree::new().insert(4).minimum(), Some(&4));
    }

    #[test]
    fn test_description() {
        let tree = sample();

        assert_eq!(tree.to_string(), "((1 <- 2 -> 5) <- 7 -> (9 <- 10 -> .))");
    }

    #[test]
    fn test_is_binary_search_tree() {
        let tree = sample();

        assert!(tree.is_binary_search_tree(&i32::MIN, &i32::MAX));
        assert!(tree.is_binary_search_tree(&1, &10));
        assert!(!tree.is_binary_search_tree(&2, &10));
        assert!(!tree.is_binary_search_tree(&1, &9));

        // A hand-built node with an equal element on the left breaks the
        // invariant.
        let broken = Tree::Node(Node {
            left: Child::leaf(3),
            value: Rc::new(3),
            right: Child::empty(),
        });
        assert!(!broken.is_binary_search_tree(&i32::MIN, &i32::MAX));
    }

    #[test]
    fn test_duplicates() {
        let tree: Tree<_> = [3, 3, 1, 3].into_iter().collect();

        assert_eq!(tree.count(), 4);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 3, 3]);
        assert!(tree.is_binary_search_tree(&i32::MIN, &i32::MAX));
    }
}
