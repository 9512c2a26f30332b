//! Tree fingerprints: structural content hashes of program trees.
//!
//! A module is identified by the hash of its tree, not by where it came
//! from. The hash is computed bottom-up:
//!
//! ```text
//! atom  →  H(0x01 ‖ bytes)
//! pair  →  H(0x02 ‖ fp(first) ‖ fp(rest))
//! ```
//!
//! With SHA-256 this is the standard CLVM tree hash, so reference values
//! published for on-chain puzzles can be compared directly. BLAKE3 is
//! available for private module registries where hashing speed matters
//! more than compatibility.
//!
//! Properties:
//! - Structurally equal trees have equal fingerprints.
//! - Atoms and pairs never collide on the same preimage (distinct prefix).
//! - Sharing a subtree does not change the hash.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::tree::Tree;

/// Domain prefix for atom preimages.
const ATOM_PREFIX: u8 = 0x01;
/// Domain prefix for pair preimages.
const PAIR_PREFIX: u8 = 0x02;

// ─── Fingerprint ───────────────────────────────────────────────────

/// A 256-bit tree fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// All-zero fingerprint. A built-in reference that fails to parse
    /// falls back to it, and it matches no module.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Display as full hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse a 64-character hex string, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let hi = hex_digit(chunk[0])?;
            let lo = hex_digit(chunk[1])?;
            bytes[i] = (hi << 4) | lo;
        }
        Some(Fingerprint(bytes))
    }

    /// Display as short base-32 (8 characters, 40 bits).
    pub fn to_short(&self) -> String {
        // Take first 5 bytes (40 bits), encode as base-32
        const ALPHABET: &[u8] = b"0123456789abcdefghjkmnpqrstuvwxyz";
        let val = u64::from_be_bytes([
            0, 0, 0, self.0[0], self.0[1], self.0[2], self.0[3], self.0[4],
        ]);
        let mut result = String::with_capacity(8);
        for i in (0..8).rev() {
            let idx = ((val >> (i * 5)) & 0x1F) as usize;
            result.push(ALPHABET[idx] as char);
        }
        result
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Fingerprint::from_hex(&hex).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid fingerprint '{}': expected 64 hex digits", hex))
        })
    }
}

// ─── Algorithm ─────────────────────────────────────────────────────

/// Hash function used for tree fingerprints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// CLVM-compatible tree hash.
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Fingerprint a tree.
    ///
    /// Post-order over an explicit stack: list length does not grow the
    /// call stack.
    pub fn tree_hash(&self, tree: &Tree) -> Fingerprint {
        enum Step<'a> {
            Visit(&'a Tree),
            Combine,
        }

        let mut steps = vec![Step::Visit(tree)];
        let mut done: Vec<Fingerprint> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Tree::Atom(atom)) => {
                    done.push(self.digest(&[&[ATOM_PREFIX][..], atom.as_bytes()]));
                }
                Step::Visit(Tree::Pair(first, rest)) => {
                    steps.push(Step::Combine);
                    steps.push(Step::Visit(&**rest));
                    steps.push(Step::Visit(&**first));
                }
                Step::Combine => {
                    // Each Combine follows the two Visits pushed above it.
                    let (Some(rest), Some(first)) = (done.pop(), done.pop()) else {
                        unreachable!("pair combined before both children were hashed");
                    };
                    done.push(self.digest(&[&[PAIR_PREFIX][..], &first.0[..], &rest.0[..]]));
                }
            }
        }
        match done.pop() {
            Some(fingerprint) => fingerprint,
            None => unreachable!("tree hash produced no fingerprint"),
        }
    }

    fn digest(&self, parts: &[&[u8]]) -> Fingerprint {
        let mut out = [0u8; 32];
        match self {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                out.copy_from_slice(&hasher.finalize());
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                out.copy_from_slice(hasher.finalize().as_bytes());
            }
        }
        Fingerprint(out)
    }
}

/// CLVM tree hash (SHA-256) of `tree`.
pub fn tree_hash(tree: &Tree) -> Fingerprint {
    HashAlgorithm::Sha256.tree_hash(tree)
}

/// Parse a single hex digit (0-9, a-f, A-F) to its numeric value.
fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
