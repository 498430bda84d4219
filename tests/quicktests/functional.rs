use bstree::functional::Tree;
use quickcheck_macros::quickcheck;

use std::collections::HashSet;

use crate::Op;

/// Builds one tree per prefix of `xs`, i.e. the whole insertion history.
fn history(xs: &[i8]) -> Vec<Tree<i8>> {
    let mut trees = vec![Tree::new()];
    for x in xs {
        let next = trees.last().unwrap().insert(*x);
        trees.push(next);
    }

    trees
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.search(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn stays_ordered(xs: Vec<i8>) -> bool {
    history(&xs)
        .iter()
        .all(|tree| tree.is_binary_search_tree(&i8::MIN, &i8::MAX))
}

#[quickcheck]
fn in_order_is_sorted(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let mut sorted = xs;
    sorted.sort();

    tree.iter().copied().eq(sorted) && tree.count() == tree.iter().count()
}

#[quickcheck]
fn older_versions_are_untouched(xs: Vec<i8>) -> bool {
    // Every version still holds exactly the prefix it was built from.
    history(&xs).iter().enumerate().all(|(len, tree)| {
        let mut prefix = xs[..len].to_vec();
        prefix.sort();
        tree.iter().copied().eq(prefix)
    })
}

#[quickcheck]
fn height_is_bounded_by_count(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    match tree.height() {
        None => tree.is_empty(),
        Some(height) => {
            let count = tree.count();
            // A perfectly balanced tree is as short as it gets; a chain is as tall.
            height < count && count < 2usize.saturating_pow(height as u32 + 1)
        }
    }
}

#[quickcheck]
fn inserts_match_a_set_model(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = HashSet::new();
    for op in ops {
        match op {
            Op::Insert(x) => {
                tree = tree.insert(x);
                model.insert(x);
            }
            Op::Search(x) => {
                if tree.search(&x) != model.get(&x) {
                    return false;
                }
            }
            // Persistent trees have no removal.
            Op::Remove(_) => {}
        }
    }

    model.iter().all(|x| tree.contains(x))
}
