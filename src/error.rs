//! Errors returned by tree constructors.

/// Errors triggered while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A rooted tree was requested from a collection with no elements.
    #[error("cannot build a rooted tree from an empty collection")]
    EmptyInput,
}
