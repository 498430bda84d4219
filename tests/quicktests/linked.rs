use bstree::linked::{NodeRef, Tree};
use quickcheck_macros::quickcheck;

use std::collections::HashSet;

use crate::Op;

/// Whether every child points back at its parent.
fn parents_are_consistent<T>(tree: &Tree<T>) -> bool {
    let Some(root) = tree.root() else {
        return true;
    };
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for child in node.left().into_iter().chain(node.right()) {
            if child.parent() != Some(node) {
                return false;
            }
            stack.push(child);
        }
    }

    root.parent().is_none()
}

/// Applies a set of operations to a tree and a sorted vector, checking the
/// invariants after every single one.
fn do_ops(ops: &[Op<i8>], tree: &mut Tree<i8>, model: &mut Vec<i8>) -> bool {
    for op in ops {
        match op {
            Op::Insert(x) => {
                tree.insert(*x);
                let at = model.partition_point(|y| y <= x);
                model.insert(at, *x);
            }
            Op::Remove(x) => {
                let expected = model.binary_search(x).ok().map(|at| model.remove(at));
                let removed = tree.remove(x).map(|removed| removed.value);
                if removed != expected {
                    return false;
                }
            }
            Op::Search(x) => {
                let found = tree.search(x);
                if found.map(|node| node.value()) != model.binary_search(x).ok().map(|_| x) {
                    return false;
                }
                // `search` finds the shallowest match, so no ancestor holds an equal element.
                let mut ancestors = found.into_iter().flat_map(|node| {
                    std::iter::successors(node.parent(), NodeRef::parent)
                });
                if ancestors.any(|node| node.value() == x) {
                    return false;
                }
            }
        }

        let ordered = tree.is_binary_search_tree(&i8::MIN, &i8::MAX);
        if !ordered || !parents_are_consistent(tree) || tree.len() != model.len() {
            return false;
        }
    }

    true
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();

    do_ops(&ops, &mut tree, &mut model) && tree.iter().eq(model.iter())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.extend(xs.iter().copied());

    xs.iter()
        .all(|x| tree.search(x).map(|node| node.value()) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.extend(xs.iter().copied());
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn traversals_visit_everything_once(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.extend(xs.iter().copied());
    let mut sorted = xs;
    sorted.sort();

    let mut in_order = Vec::new();
    tree.traverse_in_order(|x| in_order.push(*x));
    let mut pre_order = Vec::new();
    tree.traverse_pre_order(|x| pre_order.push(*x));
    let mut post_order = Vec::new();
    tree.traverse_post_order(|x| post_order.push(*x));

    pre_order.sort();
    post_order.sort();
    in_order == sorted && pre_order == sorted && post_order == sorted
}

#[quickcheck]
fn pre_order_rebuilds_the_same_shape(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.extend(xs.iter().copied());

    tree.clone().to_string() == tree.to_string()
}

#[quickcheck]
fn depth_plus_height_fits_in_tree_height(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.extend(xs.iter().copied());
    let Some(height) = tree.height() else {
        return xs.is_empty();
    };

    let mut stack: Vec<NodeRef<'_, i8>> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        if node.depth() + node.height() > height {
            return false;
        }
        stack.extend(node.left());
        stack.extend(node.right());
    }

    true
}

#[quickcheck]
fn predecessor_undoes_successor(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.extend(xs.iter().copied());

    std::iter::successors(tree.minimum(), NodeRef::successor)
        .all(|node| node.successor().map_or(true, |next| next.predecessor() == Some(node)))
}
