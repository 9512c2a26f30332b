//! Curry convention: `(module . (arg0 arg1 ... argN))`.
//!
//! A curried node binds a fixed list of arguments to a module. `uncurry`
//! splits such a node back apart; it never looks at the module itself, so
//! callers decide what a module is by comparing its fingerprint.

use super::{ShapeError, Tree};

/// Bind `args` to `module`.
pub fn curry(module: Tree, args: impl IntoIterator<Item = Tree>) -> Tree {
    Tree::pair(module, Tree::list(args))
}

/// Split a curried node into its module and bound arguments.
pub fn uncurry(node: &Tree) -> Result<(Tree, Vec<Tree>), ShapeError> {
    let (module, args) = node.decompose()?;
    Ok((module.clone(), args.to_vec()?))
}

/// Split a curried node whose module takes exactly `N` arguments.
pub fn uncurry_n<const N: usize>(node: &Tree) -> Result<(Tree, [Tree; N]), ShapeError> {
    let (module, args) = uncurry(node)?;
    let found = args.len();
    let args: [Tree; N] = args
        .try_into()
        .map_err(|_| ShapeError::Arity { expected: N, found })?;
    Ok((module, args))
}
