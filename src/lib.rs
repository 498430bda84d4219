//! This crate exposes two representations of the same Binary Search Tree (BST)
//! mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert and search for stored elements. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores an element
//! and will sometimes have child `Node`s. The most important invariants of
//! the BSTs in this crate are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have an
//!    element strictly less than its own element.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have an
//!    element greater than or equal to its own element.
//!
//! > Duplicates are allowed. An element equal to an existing one always goes right.
//!
//! Searching for an element takes `O(height)` (where `height` is the longest
//! path from the root `Node` to a leaf `Node`). Neither tree here rebalances,
//! so inserting sorted input gives a tree of height `N - 1`. BSTs also
//! naturally support sorted iteration by visiting the left subtree, then the
//! subtree root, then the right subtree.
//!
//! ## Representations
//!
//! - [`linked`]: a mutable tree where every node owns its children and keeps a
//!   non-owning pointer back to its parent. It supports in-place removal and
//!   walking to a node's predecessor or successor.
//! - [`functional`]: an immutable tree modeled after a functional language's
//!   algebraic data type. `insert` returns a new tree sharing every untouched
//!   subtree with the original.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
pub mod functional;
pub mod linked;

pub use error::Error;
