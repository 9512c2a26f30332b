//! Program trees: the value model of curried puzzles.
//!
//! All data is a binary tree. A node is either an atom (an immutable byte
//! string) or a pair `(first . rest)`. Lists are right-nested pairs ending
//! in the empty atom (nil):
//!
//! ```text
//! (a b c)  =  (a . (b . (c . ())))
//! ```
//!
//! Integers are atoms in big-endian two's complement, minimal length, so
//! `0` is nil, `1` is `0x01` and `128` is `0x0080`.
//!
//! Trees are immutable and reference counted. Cloning a tree or handing a
//! subtree to a decoded record never copies the underlying structure.

pub mod curry;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

// ─── Shape Errors ──────────────────────────────────────────────────

/// A node did not have the structure a reader expected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected a pair, found atom {0}")]
    NotAPair(Tree),
    #[error("expected an atom, found pair {0}")]
    NotAnAtom(Tree),
    #[error("list is not nil-terminated (ends in {0})")]
    ImproperList(Tree),
    #[error("expected {expected} curried arguments, found {found}")]
    Arity { expected: usize, found: usize },
}

// ─── Atom ──────────────────────────────────────────────────────────

/// An immutable byte string leaf.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Atom(Arc<[u8]>);

impl Atom {
    pub fn new(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }

    /// The empty atom: list terminator and integer zero.
    pub fn nil() -> Self {
        Self::new(&[])
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode an integer in minimal big-endian two's complement.
    pub fn from_i64(value: i64) -> Self {
        if value == 0 {
            return Self::nil();
        }
        let bytes = value.to_be_bytes();
        let mut start = 0;
        // Drop a leading byte while the next one still carries the sign.
        while start < bytes.len() - 1 {
            let lead = bytes[start];
            let next_negative = bytes[start + 1] & 0x80 != 0;
            if (lead == 0x00 && !next_negative) || (lead == 0xff && next_negative) {
                start += 1;
            } else {
                break;
            }
        }
        Self::new(&bytes[start..])
    }

    /// Decode as a signed integer. `None` if the value needs more than 64 bits.
    pub fn to_i64(&self) -> Option<i64> {
        let bytes = self.as_bytes();
        if bytes.is_empty() {
            return Some(0);
        }
        let negative = bytes[0] & 0x80 != 0;
        let fill = if negative { 0xff } else { 0x00 };
        let (extra, tail) = bytes.split_at(bytes.len().saturating_sub(8));
        if extra.iter().any(|b| *b != fill) {
            return None;
        }
        if !extra.is_empty() && (tail[0] & 0x80 != 0) != negative {
            return None;
        }
        let mut buf = [fill; 8];
        buf[8 - tail.len()..].copy_from_slice(tail);
        Some(i64::from_be_bytes(buf))
    }

    /// Decode as an unsigned integer. `None` if negative or wider than 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        let bytes = self.as_bytes();
        if bytes.first().is_some_and(|b| b & 0x80 != 0) {
            return None;
        }
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let significant = &bytes[start..];
        if significant.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[8 - significant.len()..].copy_from_slice(significant);
        Some(u64::from_be_bytes(buf))
    }

    /// True if the atom reads as a quoted string in the text form.
    /// Single bytes stay numeric so small integers print as numbers.
    fn is_printable(&self) -> bool {
        self.len() >= 2
            && self
                .0
                .iter()
                .all(|b| (b.is_ascii_graphic() || *b == b' ') && *b != b'"')
    }

    /// True if the atom is a minimally encoded integer of at most 8 bytes.
    fn is_canonical_int(&self) -> bool {
        self.len() <= 8
            && self
                .to_i64()
                .is_some_and(|value| Atom::from_i64(value) == *self)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return write!(f, "()");
        }
        if self.is_printable() {
            return write!(f, "\"{}\"", String::from_utf8_lossy(&self.0));
        }
        if let Some(value) = self.to_i64().filter(|_| self.is_canonical_int()) {
            return write!(f, "{}", value);
        }
        write!(f, "0x")?;
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self)
    }
}

// ─── Tree ──────────────────────────────────────────────────────────

/// A program tree node.
///
/// Equality, hashing and drop walk the tree with an explicit stack, so
/// lists of any length are safe on small thread stacks.
#[derive(Clone)]
pub enum Tree {
    /// A leaf byte string.
    Atom(Atom),
    /// An ordered pair `(first . rest)`.
    Pair(Arc<Tree>, Arc<Tree>),
}

impl Tree {
    pub fn nil() -> Self {
        Tree::Atom(Atom::nil())
    }

    pub fn atom(bytes: impl AsRef<[u8]>) -> Self {
        Tree::Atom(Atom::new(bytes.as_ref()))
    }

    /// An integer atom.
    pub fn int(value: i64) -> Self {
        Tree::Atom(Atom::from_i64(value))
    }

    pub fn pair(first: Tree, rest: Tree) -> Self {
        Tree::Pair(Arc::new(first), Arc::new(rest))
    }

    /// Build a nil-terminated list from `items`, in order.
    pub fn list(items: impl IntoIterator<Item = Tree>) -> Self {
        let items: Vec<Tree> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Tree::nil(), |rest, item| Tree::pair(item, rest))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Tree::Atom(atom) if atom.is_nil())
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Tree::Atom(_))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Tree::Pair(..))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Tree::Atom(atom) => Some(atom),
            Tree::Pair(..) => None,
        }
    }

    pub fn first(&self) -> Option<&Tree> {
        match self {
            Tree::Pair(first, _) => Some(&**first),
            Tree::Atom(_) => None,
        }
    }

    pub fn rest(&self) -> Option<&Tree> {
        match self {
            Tree::Pair(_, rest) => Some(&**rest),
            Tree::Atom(_) => None,
        }
    }

    /// Split a pair into `(first, rest)`.
    pub fn decompose(&self) -> Result<(&Tree, &Tree), ShapeError> {
        match self {
            Tree::Pair(first, rest) => Ok((&**first, &**rest)),
            Tree::Atom(_) => Err(ShapeError::NotAPair(self.clone())),
        }
    }

    /// Borrow the atom, failing on pairs.
    pub fn atom_or_err(&self) -> Result<&Atom, ShapeError> {
        self.as_atom()
            .ok_or_else(|| ShapeError::NotAnAtom(self.clone()))
    }

    /// Iterate a nil-terminated list.
    ///
    /// Yields one `Err(ShapeError::ImproperList)` and stops if the chain
    /// ends in a non-nil atom. A bare nil is the empty list.
    pub fn iter_list(&self) -> ListIter<'_> {
        ListIter { cursor: Some(self) }
    }

    /// Collect a nil-terminated list into owned elements.
    pub fn to_vec(&self) -> Result<Vec<Tree>, ShapeError> {
        self.iter_list().map(|item| item.cloned()).collect()
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Tree::Atom(a), Tree::Atom(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Tree::Pair(a_first, a_rest), Tree::Pair(b_first, b_rest)) => {
                    if !Arc::ptr_eq(a_rest, b_rest) {
                        pending.push((&**a_rest, &**b_rest));
                    }
                    if !Arc::ptr_eq(a_first, b_first) {
                        pending.push((&**a_first, &**b_first));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Tree {}

impl Hash for Tree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Pre-order with a tag per node.
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Tree::Atom(atom) => {
                    state.write_u8(0);
                    atom.hash(state);
                }
                Tree::Pair(first, rest) => {
                    state.write_u8(1);
                    pending.push(&**rest);
                    pending.push(&**first);
                }
            }
        }
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_pairs(self, &mut pending);
        while let Some(child) = pending.pop() {
            // A shared child only loses a reference here.
            if let Ok(mut node) = Arc::try_unwrap(child) {
                detach_pairs(&mut node, &mut pending);
            }
        }
    }
}

/// Move the pair children of `node` onto `pending`, leaving nil behind.
/// Atom children stay: dropping them never recurses.
fn detach_pairs(node: &mut Tree, pending: &mut Vec<Arc<Tree>>) {
    if let Tree::Pair(first, rest) = node {
        for child in [first, rest] {
            if child.is_pair() {
                pending.push(mem::replace(child, shared_nil()));
            }
        }
    }
}

/// One process-wide nil node used as a placeholder while dropping.
fn shared_nil() -> Arc<Tree> {
    static NIL: OnceLock<Arc<Tree>> = OnceLock::new();
    NIL.get_or_init(|| Arc::new(Tree::nil())).clone()
}

impl From<Atom> for Tree {
    fn from(atom: Atom) -> Self {
        Tree::Atom(atom)
    }
}

/// Iterator over the elements of a right-nested list.
pub struct ListIter<'a> {
    cursor: Option<&'a Tree>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<&'a Tree, ShapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor.take()?;
        match node {
            Tree::Pair(first, rest) => {
                self.cursor = Some(&**rest);
                Some(Ok(&**first))
            }
            Tree::Atom(atom) if atom.is_nil() => None,
            Tree::Atom(_) => Some(Err(ShapeError::ImproperList(node.clone()))),
        }
    }
}

/// Disassembled text form: `()`, `42`, `"abc"`, `0xbeef`, `(a b . c)`.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Atom(atom) => write!(f, "{}", atom),
            Tree::Pair(first, rest) => {
                write!(f, "({}", first)?;
                let mut cursor: &Tree = &**rest;
                loop {
                    match cursor {
                        Tree::Pair(item, next) => {
                            write!(f, " {}", item)?;
                            cursor = &**next;
                        }
                        Tree::Atom(atom) if atom.is_nil() => break,
                        Tree::Atom(atom) => {
                            write!(f, " . {}", atom)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tree({})", self)
    }
}

impl serde::Serialize for Tree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
