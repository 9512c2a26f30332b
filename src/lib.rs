//! Layered decoder for curried singleton NFT puzzles.
//!
//! ```text
//! Tree ─→ uncurry ─→ singleton top layer ─→ state layer ─→ [ownership layer] ─→ p2
//!                         │                      │                 │
//!                    fingerprint            metadata          royalty info
//! ```
//!
//! The entry point is [`NftDecoder::decode`], or [`decode`] for the
//! mainnet layer references.

pub mod config;
pub mod error;
pub mod hash;
pub mod nft;
pub mod tree;

pub use config::{ConfigError, LayerReferences};
pub use error::{DecodeError, DecodeResult, Layer, ModuleMismatch};
pub use hash::{tree_hash, Fingerprint, HashAlgorithm};
pub use nft::{decode, MetadataKey, NftDecoder, NftMetadata, OwnershipLayer, UncurriedNft};
pub use tree::curry::{curry, uncurry, uncurry_n};
pub use tree::{Atom, ShapeError, Tree};
