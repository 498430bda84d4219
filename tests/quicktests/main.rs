use quickcheck::{Arbitrary, Gen};

mod functional;
mod linked;

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<T> {
    /// Insert the element into the tree
    Insert(T),
    /// Remove the element from the tree (where supported)
    Remove(T),
    /// Look the element up in the tree
    Search(T),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1, 2]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Remove(T::arbitrary(g)),
            2 => Op::Search(T::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}
