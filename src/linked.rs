//! A linked BST. Every node owns its two children and keeps a raw, non-owning pointer back to
//! its parent, so a node can walk up to its ancestors (for [`depth`][NodeRef::depth],
//! [`successor`][NodeRef::successor], etc.) without the tree having a reference cycle. Nodes are
//! only ever owned through child links (or the tree's root link); a node's lifetime ends when it
//! is no longer reachable from the root.
//!
//! # Examples
//!
//! ```
//! use bstree::linked::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(&1).is_none());
//!
//! for x in [8, 1, 3, 22, 9] {
//!     tree.insert(x);
//! }
//! assert_eq!(tree.len(), 5);
//! assert_eq!(tree.height(), Some(2));
//!
//! // Searching hands back the node so we can navigate from it.
//! let one = tree.search(&1).unwrap();
//! assert_eq!(one.depth(), 1);
//! assert_eq!(one.successor().map(|n| *n.value()), Some(3));
//!
//! // Removing the root promotes the smallest element of its right subtree.
//! let removed = tree.remove(&8).unwrap();
//! assert_eq!(removed.value, 8);
//! assert_eq!(removed.replacement.map(|n| *n.value()), Some(9));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 9, 22]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Bound;
use std::ptr::NonNull;

use crate::Error;

/// An unbalanced Binary Search Tree with parent pointers. This can be used for inserting,
/// searching for, and removing elements, and for navigating between nodes.
pub struct Tree<T> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that it can be moved around with the
    // `Tree` without the children's parent pointers breaking.
    root: Link<T>,
    len: usize,
    marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: A `Tree` owns all of its nodes and only hands out references tied to borrows of itself,
// the same as a `Box<T>` would.
unsafe impl<T: Send> Send for Tree<T> {}
unsafe impl<T: Sync> Sync for Tree<T> {}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        let mut stack: Vec<_> = self.root.take().0.into_iter().collect();
        while let Some(node) = stack.pop() {
            // SAFETY: Every node is owned by exactly one link (a child link or the root) and we
            // just took it from that link, so it is dropped exactly once. Nodes are allocated with
            // `Box::new` in `Node::leak`.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone + Ord,
{
    /// Re-inserting in pre-order reproduces the exact shape: every element is inserted after all
    /// of its ancestors.
    fn clone(&self) -> Self {
        let mut tree = Self::new();
        self.traverse_pre_order(|value| tree.insert(value.clone()));
        tree
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Renders the root's description. An empty tree renders as nothing.
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => write!(f, "{}", root),
            None => Ok(()),
        }
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
            marker: PhantomData,
        }
    }

    /// Generate a `Tree` holding just `value` at its root.
    pub fn with_root(value: T) -> Self {
        Self {
            root: Link(Some(Node::leak(value, Link(None)))),
            len: 1,
            marker: PhantomData,
        }
    }

    /// Builds a tree whose root is the first of `values`. The rest are inserted in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if `values` is empty since there would be no root.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    /// use bstree::Error;
    ///
    /// let tree = Tree::try_from_values([9, -1, 5, 1, 3]).unwrap();
    /// assert_eq!(tree.root().map(|n| *n.value()), Some(9));
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [-1, 1, 3, 5, 9]);
    ///
    /// assert_eq!(Tree::<i32>::try_from_values([]).unwrap_err(), Error::EmptyInput);
    /// ```
    pub fn try_from_values<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Ord,
    {
        let mut values = values.into_iter();
        let Some(root) = values.next() else {
            log::debug!("refusing to build a rooted tree from an empty collection");
            return Err(Error::EmptyInput);
        };
        let mut tree = Self::with_root(root);
        tree.extend(values);
        Ok(tree)
    }

    /// The number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Same as [`Tree::len`].
    pub fn count(&self) -> usize {
        self.len
    }

    /// Whether the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.root.0.is_none()
    }

    /// The root node, if there is one.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.0.map(NodeRef::new)
    }

    /// Inserts `value` into the tree. Starting at the root, it moves left past every node whose
    /// element is greater than `value` and right past every other node, so equal elements end up
    /// to the right of each other. There is no rebalancing: sorted input builds a tree as tall as
    /// it is long.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2);
    /// tree.insert(2);
    ///
    /// let root = tree.root().unwrap();
    /// assert!(root.left().is_none());
    /// assert_eq!(root.right().map(|n| *n.value()), Some(2));
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        let Some(mut current) = self.root.0 else {
            self.root = Link(Some(Node::leak(value, Link(None))));
            self.len = 1;
            return;
        };

        loop {
            // SAFETY: `current` is reachable from the root and we hold `&mut self`, so there are no
            // other references into the tree.
            let node = unsafe { &mut *current.as_ptr() };
            let side = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
            match side.0 {
                Some(child) => current = child,
                None => {
                    *side = Link(Some(Node::leak(value, Link(Some(current)))));
                    node.debug_assert_links();
                    break;
                }
            }
        }
        self.len += 1;
    }

    /// Potentially finds the first node (the one closest to the root) holding an element equal to
    /// `value`. If no node has such an element, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    ///
    /// let tree = Tree::try_from_values([2, 1]).unwrap();
    ///
    /// assert_eq!(tree.search(&1).map(|n| *n.value()), Some(1));
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, value: &T) -> Option<NodeRef<'_, T>>
    where
        T: Ord,
    {
        self.root().and_then(|root| root.search(value))
    }

    /// Whether an element equal to `value` is in the tree.
    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.search(value).is_some()
    }

    /// The node holding the smallest element.
    pub fn minimum(&self) -> Option<NodeRef<'_, T>> {
        self.root().map(|root| root.minimum())
    }

    /// The node holding the largest element. With duplicates, this is the one inserted last.
    pub fn maximum(&self) -> Option<NodeRef<'_, T>> {
        self.root().map(|root| root.maximum())
    }

    /// The height of the root node or `None` for an empty tree.
    pub fn height(&self) -> Option<usize> {
        self.root().map(|root| root.height())
    }

    /// Iterates over the elements in sorted (in-order) order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.0)
    }

    /// Calls `visit` with every element: left subtree, then node, then right subtree.
    pub fn traverse_in_order<'a>(&'a self, visit: impl FnMut(&'a T)) {
        if let Some(root) = self.root() {
            root.traverse_in_order(visit);
        }
    }

    /// Calls `visit` with every element: node, then left subtree, then right subtree.
    pub fn traverse_pre_order<'a>(&'a self, visit: impl FnMut(&'a T)) {
        if let Some(root) = self.root() {
            root.traverse_pre_order(visit);
        }
    }

    /// Calls `visit` with every element: left subtree, then right subtree, then node.
    pub fn traverse_post_order<'a>(&'a self, visit: impl FnMut(&'a T)) {
        if let Some(root) = self.root() {
            root.traverse_post_order(visit);
        }
    }

    /// Whether every element is in `[min, max]` and the ordering invariant holds at every node.
    /// An empty tree trivially passes.
    pub fn is_binary_search_tree(&self, min: &T, max: &T) -> bool
    where
        T: Ord,
    {
        self.root()
            .map_or(true, |root| root.is_binary_search_tree(min, max))
    }

    /// Removes the first node holding an element equal to `value` (the node [`Tree::search`]
    /// finds) and returns its element along with the node that took its place. If no node holds
    /// such an element, nothing happens.
    ///
    /// The removed node is replaced by the smallest node of its right subtree, which is first
    /// removed from its own position the same way. If there is no right subtree, the highest node
    /// holding the largest element of the left subtree takes over: its left subtree moves up into
    /// its old position and any equal elements below it come along as its right subtree. A leaf
    /// has no replacement. Either way the replacement inherits the removed node's parent and
    /// remaining children.
    ///
    /// To remove a particular node among several equal ones, use [`Tree::cursor_mut`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    ///
    /// let mut tree = Tree::try_from_values([5, 3, 1, 4]).unwrap();
    ///
    /// // No right child so the largest element on the left takes over.
    /// let removed = tree.remove(&5).unwrap();
    /// assert_eq!(removed.value, 5);
    /// assert_eq!(removed.replacement.map(|n| *n.value()), Some(4));
    ///
    /// assert!(tree.remove(&5).is_none());
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<Removed<'_, T>>
    where
        T: Ord,
    {
        self.cursor_mut(value).map(CursorMut::remove)
    }

    /// A cursor at the node [`Tree::search`] would find for `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    ///
    /// let mut tree = Tree::try_from_values([4, 4, 4]).unwrap();
    ///
    /// // Remove the middle one of the three equal elements.
    /// let mut cursor = tree.cursor_mut(&4).unwrap();
    /// assert!(cursor.move_to_successor());
    /// let removed = cursor.remove();
    /// assert_eq!(removed.value, 4);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn cursor_mut(&mut self, value: &T) -> Option<CursorMut<'_, T>>
    where
        T: Ord,
    {
        let node = self.search(value)?.node;
        Some(CursorMut { tree: self, node })
    }

    /// A cursor at the root node, if there is one.
    pub fn root_cursor_mut(&mut self) -> Option<CursorMut<'_, T>> {
        let node = self.root.0?;
        Some(CursorMut { tree: self, node })
    }

    /// Detaches `node` from the tree, splicing its replacement into its position, and returns
    /// the replacement. Afterwards `node` has no parent or children and is not reachable from the
    /// root, but it is still allocated.
    ///
    /// # Safety
    ///
    /// `node` must be reachable from `self.root`.
    unsafe fn unlink(&mut self, mut node: NonNull<Node<T>>) -> Link<T>
    where
        T: Ord,
    {
        let replacement = match (node.as_ref().right.0, node.as_ref().left.0) {
            (Some(right), _) => {
                log::trace!("splicing in the smallest node of the right subtree");
                let smallest = Node::leftmost(right);
                self.unlink(smallest);
                Some(smallest)
            }
            (None, Some(left)) => {
                log::trace!("splicing in the largest node of the left subtree");
                // Everything left of the replacement has to be strictly smaller, so the highest
                // of the largest elements moves up and keeps the equal ones on its right.
                let largest = Node::topmost_maximum(left);
                self.lift_left_subtree(largest);
                Some(largest)
            }
            (None, None) => None,
        };

        // The replacement can't occupy two positions. Detaching it may have changed `node`'s
        // children (if it was one of them), so they're read now.
        let Node {
            left,
            right,
            parent,
            ..
        } = *node.as_ref();

        if let Some(mut replacement) = replacement {
            let spliced = replacement.as_mut();
            spliced.left = left;
            // A replacement from the left subtree keeps its own right subtree. `node` has no
            // right subtree in that case.
            if right.0.is_some() {
                spliced.right = right;
            }
            spliced.parent = parent;
            Node::adopt_children(replacement);
            replacement.as_ref().debug_assert_links();
        }
        self.replace_child(parent, node, Link(replacement));

        let detached = node.as_mut();
        detached.parent = Link(None);
        detached.left = Link(None);
        detached.right = Link(None);

        Link(replacement)
    }

    /// Puts the left subtree of `node` where `node` was. Afterwards `node` has no parent and no
    /// left child but keeps its right subtree.
    ///
    /// # Safety
    ///
    /// `node` must be reachable from `self.root`.
    unsafe fn lift_left_subtree(&mut self, mut node: NonNull<Node<T>>) {
        let Node { left, parent, .. } = *node.as_ref();
        if let Some(mut child) = left.0 {
            child.as_mut().parent = parent;
        }
        self.replace_child(parent, node, left);

        let detached = node.as_mut();
        detached.parent = Link(None);
        detached.left = Link(None);
    }

    /// Points whichever link of `parent` held `old` (or the root, if there is no parent) at `new`.
    /// Left or right is decided by identity, not by comparing elements, since equal elements can
    /// sit on both sides of a path.
    ///
    /// # Safety
    ///
    /// `parent` must be empty or a node of this tree.
    unsafe fn replace_child(&mut self, parent: Link<T>, old: NonNull<Node<T>>, new: Link<T>) {
        match parent.0 {
            None => self.root = new,
            Some(mut parent) => {
                let parent = parent.as_mut();
                if parent.left.0 == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            }
        }
    }
}

impl<T: Ord> Extend<T> for Tree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The result of [`Tree::remove`] and [`CursorMut::remove`].
#[derive(Debug)]
pub struct Removed<'a, T> {
    /// The element held by the removed node.
    pub value: T,
    /// The node now occupying the removed node's position, if the removed node wasn't a leaf.
    pub replacement: Option<NodeRef<'a, T>>,
}

struct Link<T>(Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Link<T> {}

impl<T> Link<T> {
    fn get(&self) -> Option<&Node<T>> {
        // SAFETY: If the link is not `None` then it points at a live `Node` allocated by
        // `Node::leak`. Nodes are only mutated or freed through `&mut Tree`, so while anyone can
        // read through a `Link` no one can be writing through one.
        //
        // This isn't the sexiest guarantee but it matches how the links are used: only from
        // methods of a borrowed `Tree` or a `NodeRef` that borrows one.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    parent: Link<T>,
}

impl<T> Node<T> {
    /// Allocates a childless node and gives up ownership of it. Ownership is taken back by
    /// `Tree::drop` or `Tree::remove`.
    fn leak(value: T, parent: Link<T>) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Node {
            value,
            left: Link(None),
            right: Link(None),
            parent,
        })))
    }

    fn left(&self) -> Option<&Self> {
        self.left.get()
    }

    fn right(&self) -> Option<&Self> {
        self.right.get()
    }

    /// Points the children of `node` back at it.
    ///
    /// # Safety
    ///
    /// `node` and its children must be live nodes with no outstanding references.
    unsafe fn adopt_children(node: NonNull<Self>) {
        if let Some(mut left) = node.as_ref().left.0 {
            left.as_mut().parent = Link(Some(node));
        }
        if let Some(mut right) = node.as_ref().right.0 {
            right.as_mut().parent = Link(Some(node));
        }
    }

    /// # Safety
    ///
    /// `node` must be a live node.
    unsafe fn leftmost(mut node: NonNull<Self>) -> NonNull<Self> {
        while let Some(left) = node.as_ref().left.0 {
            node = left;
        }
        node
    }

    /// The highest node on the right spine of `node` holding the largest element of its subtree.
    /// Every other node holding that element is in its right subtree.
    ///
    /// # Safety
    ///
    /// `node` must be a live node.
    unsafe fn topmost_maximum(node: NonNull<Self>) -> NonNull<Self>
    where
        T: Ord,
    {
        let mut top = node;
        let mut current = node;
        while let Some(right) = current.as_ref().right.0 {
            if right.as_ref().value > top.as_ref().value {
                top = right;
            }
            current = right;
        }
        top
    }

    /// In debug builds, checks the ordering and parent pointers of this node's children.
    fn debug_assert_links(&self)
    where
        T: Ord,
    {
        if cfg!(debug_assertions) {
            let this = NonNull::from(self);
            if let Some(left) = self.left() {
                assert!(left.value < self.value);
                assert_eq!(left.parent.0, Some(this));
            }
            if let Some(right) = self.right() {
                assert!(right.value >= self.value);
                assert_eq!(right.parent.0, Some(this));
            }
        }
    }
}

/// A shared handle to one node of a [`Tree`], used to read its element and navigate to its
/// relatives. Two handles are equal when they refer to the same node, regardless of elements.
pub struct NodeRef<'a, T> {
    node: NonNull<Node<T>>,
    marker: PhantomData<&'a Node<T>>,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}
impl<T> Eq for NodeRef<'_, T> {}

/// Shows this node's element and its children's elements, not the whole subtree.
impl<T> fmt::Debug for NodeRef<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("left", &self.left().map(|n| n.value()))
            .field("right", &self.right().map(|n| n.value()))
            .finish()
    }
}

/// Renders as `(left) <- value -> (right)`, leaving out missing sides.
impl<T> fmt::Display for NodeRef<'_, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Popped in reverse, so each node pushes its right side first.
        let mut pending = vec![Piece::Node(*self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Value(value) => write!(f, "{}", value)?,
                Piece::Node(node) => {
                    if let Some(right) = node.right() {
                        pending.extend([
                            Piece::Text(")"),
                            Piece::Node(right),
                            Piece::Text(" -> ("),
                        ]);
                    }
                    pending.push(Piece::Value(node.value()));
                    if let Some(left) = node.left() {
                        pending.extend([
                            Piece::Text(") <- "),
                            Piece::Node(left),
                            Piece::Text("("),
                        ]);
                    }
                }
            }
        }
        Ok(())
    }
}

enum Piece<'a, T> {
    Text(&'static str),
    Value(&'a T),
    Node(NodeRef<'a, T>),
}

impl<'a, T> NodeRef<'a, T> {
    fn new(node: NonNull<Node<T>>) -> Self {
        Self {
            node,
            marker: PhantomData,
        }
    }

    fn get(&self) -> &'a Node<T> {
        // SAFETY: A `NodeRef` only exists while its tree is borrowed for `'a`, and nodes are only
        // mutated or freed through `&mut Tree`.
        unsafe { self.node.as_ref() }
    }

    fn link(link: Link<T>) -> Option<Self> {
        link.0.map(Self::new)
    }

    /// The element stored in this node.
    pub fn value(&self) -> &'a T {
        &self.get().value
    }

    /// The root of this node's left subtree.
    pub fn left(&self) -> Option<Self> {
        Self::link(self.get().left)
    }

    /// The root of this node's right subtree.
    pub fn right(&self) -> Option<Self> {
        Self::link(self.get().right)
    }

    /// The node this node is a child of. Only the root has no parent.
    pub fn parent(&self) -> Option<Self> {
        Self::link(self.get().parent)
    }

    /// Whether this is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        !self.has_any_child()
    }

    /// Whether this node is its parent's left child.
    pub fn is_left_child(&self) -> bool {
        self.parent()
            .map_or(false, |parent| parent.left() == Some(*self))
    }

    /// Whether this node is its parent's right child.
    pub fn is_right_child(&self) -> bool {
        self.parent()
            .map_or(false, |parent| parent.right() == Some(*self))
    }

    /// Whether this node has a left child.
    pub fn has_left_child(&self) -> bool {
        self.get().left.0.is_some()
    }

    /// Whether this node has a right child.
    pub fn has_right_child(&self) -> bool {
        self.get().right.0.is_some()
    }

    /// Whether this node has at least one child.
    pub fn has_any_child(&self) -> bool {
        self.has_left_child() || self.has_right_child()
    }

    /// Whether this node has two children.
    pub fn has_both_children(&self) -> bool {
        self.has_left_child() && self.has_right_child()
    }

    /// The number of nodes in the subtree rooted at this node, including itself.
    pub fn count(&self) -> usize {
        let mut count = 0;
        self.traverse_pre_order(|_| count += 1);
        count
    }

    /// Potentially finds the first node in this subtree holding an element equal to `value`.
    pub fn search(&self, value: &T) -> Option<Self>
    where
        T: Ord,
    {
        let mut node = *self;
        loop {
            node = match value.cmp(node.value()) {
                Ordering::Less => node.left()?,
                Ordering::Greater => node.right()?,
                Ordering::Equal => return Some(node),
            };
        }
    }

    /// The node holding the smallest element of this subtree. That is this node itself if it has
    /// no left child.
    pub fn minimum(&self) -> Self {
        let mut node = *self;
        while let Some(left) = node.left() {
            node = left;
        }
        node
    }

    /// The node holding the largest element of this subtree. That is this node itself if it has
    /// no right child.
    pub fn maximum(&self) -> Self {
        let mut node = *self;
        while let Some(right) = node.right() {
            node = right;
        }
        node
    }

    /// The number of edges on the longest path from this node down to a leaf. A leaf has a
    /// height of 0. This walks the whole subtree every time.
    pub fn height(&self) -> usize {
        let mut level = vec![*self];
        let mut height = 0;
        loop {
            let next: Vec<_> = level
                .iter()
                .flat_map(|node| node.left().into_iter().chain(node.right()))
                .collect();
            if next.is_empty() {
                return height;
            }
            height += 1;
            level = next;
        }
    }

    /// The number of parent links between this node and the root. The root has a depth of 0.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), NodeRef::parent).count()
    }

    /// The node that comes right before this one in sorted order, or `None` if this node holds
    /// the smallest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    ///
    /// let tree = Tree::try_from_values([8, 1, 3, 22, 9]).unwrap();
    ///
    /// let nine = tree.search(&9).unwrap();
    /// assert_eq!(nine.predecessor().map(|n| *n.value()), Some(8));
    ///
    /// let one = tree.search(&1).unwrap();
    /// assert!(one.predecessor().is_none());
    /// ```
    pub fn predecessor(&self) -> Option<Self> {
        if let Some(left) = self.left() {
            return Some(left.maximum());
        }
        // Climb until we arrive at an ancestor from its right.
        let mut node = *self;
        while let Some(parent) = node.parent() {
            if node.is_right_child() {
                return Some(parent);
            }
            node = parent;
        }
        None
    }

    /// The node that comes right after this one in sorted order, or `None` if this node holds the
    /// largest element.
    pub fn successor(&self) -> Option<Self> {
        if let Some(right) = self.right() {
            return Some(right.minimum());
        }
        // Climb until we arrive at an ancestor from its left.
        let mut node = *self;
        while let Some(parent) = node.parent() {
            if node.is_left_child() {
                return Some(parent);
            }
            node = parent;
        }
        None
    }

    /// Iterates over the elements of this subtree in sorted order.
    pub fn iter(&self) -> Iter<'a, T> {
        Iter::new(Some(self.node))
    }

    /// Calls `visit` with every element of this subtree: left subtree, then node, then right
    /// subtree.
    pub fn traverse_in_order(&self, visit: impl FnMut(&'a T)) {
        self.iter().for_each(visit);
    }

    /// Calls `visit` with every element of this subtree: node, then left subtree, then right
    /// subtree.
    pub fn traverse_pre_order(&self, mut visit: impl FnMut(&'a T)) {
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            visit(node.value());
            stack.extend(node.right());
            stack.extend(node.left());
        }
    }

    /// Calls `visit` with every element of this subtree: left subtree, then right subtree, then
    /// node.
    pub fn traverse_post_order(&self, mut visit: impl FnMut(&'a T)) {
        // The flag marks nodes whose children have already been pushed.
        let mut stack = vec![(*self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                visit(node.value());
                continue;
            }
            stack.push((node, true));
            stack.extend(node.right().map(|n| (n, false)));
            stack.extend(node.left().map(|n| (n, false)));
        }
    }

    /// Checks that every element of this subtree is in `[min, max]`, that everything left of a
    /// node is strictly less than it and that everything right of a node is greater or equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::linked::Tree;
    ///
    /// let tree = Tree::try_from_values([5, 2, 8]).unwrap();
    /// let root = tree.root().unwrap();
    ///
    /// assert!(root.is_binary_search_tree(&2, &8));
    /// assert!(!root.is_binary_search_tree(&3, &8));
    /// ```
    pub fn is_binary_search_tree(&self, min: &T, max: &T) -> bool
    where
        T: Ord,
    {
        let mut stack = vec![(*self, Bound::Included(min), Bound::Included(max))];
        while let Some((node, lower, upper)) = stack.pop() {
            let value = node.value();
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
            if !(above && below) {
                return false;
            }
            if let Some(left) = node.left() {
                stack.push((left, lower, Bound::Excluded(value)));
            }
            if let Some(right) = node.right() {
                stack.push((right, Bound::Included(value), upper));
            }
        }
        true
    }
}

/// Points at one node of a [`Tree`] while holding the tree's unique borrow, which is what lets it
/// remove exactly that node even when other nodes hold equal elements. Created by
/// [`Tree::cursor_mut`] or [`Tree::root_cursor_mut`].
///
/// The `move_to_*` methods return `false` and stay put when there is nowhere to go.
pub struct CursorMut<'a, T> {
    tree: &'a mut Tree<T>,
    node: NonNull<Node<T>>,
}

impl<T: fmt::Debug> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.current()).finish()
    }
}

impl<'a, T> CursorMut<'a, T> {
    /// The node the cursor points at, for reading and navigation.
    pub fn current(&self) -> NodeRef<'_, T> {
        NodeRef::new(self.node)
    }

    /// The element of the node the cursor points at.
    pub fn value(&self) -> &T {
        self.current().value()
    }

    /// Moves to the left child.
    pub fn move_to_left(&mut self) -> bool {
        let next = self.current().left().map(|n| n.node);
        self.jump(next)
    }

    /// Moves to the right child.
    pub fn move_to_right(&mut self) -> bool {
        let next = self.current().right().map(|n| n.node);
        self.jump(next)
    }

    /// Moves to the parent.
    pub fn move_to_parent(&mut self) -> bool {
        let next = self.current().parent().map(|n| n.node);
        self.jump(next)
    }

    /// Moves to the in-order [successor][NodeRef::successor].
    pub fn move_to_successor(&mut self) -> bool {
        let next = self.current().successor().map(|n| n.node);
        self.jump(next)
    }

    /// Moves to the in-order [predecessor][NodeRef::predecessor].
    pub fn move_to_predecessor(&mut self) -> bool {
        let next = self.current().predecessor().map(|n| n.node);
        self.jump(next)
    }

    fn jump(&mut self, next: Option<NonNull<Node<T>>>) -> bool {
        match next {
            Some(node) => {
                self.node = node;
                true
            }
            None => false,
        }
    }

    /// Removes the node the cursor points at, splicing in a replacement the same way
    /// [`Tree::remove`] does, and returns its element.
    pub fn remove(self) -> Removed<'a, T>
    where
        T: Ord,
    {
        let Self { tree, node } = self;

        // SAFETY: The cursor only ever points at nodes of `tree`, and nothing else can reach the
        // tree while the cursor holds its unique borrow.
        let replacement = unsafe { tree.unlink(node) };

        // SAFETY: `unlink` cleared every link into and out of `node`, so nothing references it
        // and it won't be dropped again when the tree is.
        let removed = unsafe { Box::from_raw(node.as_ptr()) };
        tree.len -= 1;

        Removed {
            value: removed.value,
            replacement: replacement.0.map(NodeRef::new),
        }
    }
}

/// A borrowing in-order iterator, created by [`Tree::iter`] or [`NodeRef::iter`].
pub struct Iter<'a, T> {
    /// Nodes whose left subtree has been pushed but who haven't been yielded yet.
    stack: Vec<NodeRef<'a, T>>,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<NonNull<Node<T>>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root.map(NodeRef::new));
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<NodeRef<'a, T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.value())
    }
}
