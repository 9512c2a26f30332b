//! Uncurrying of singleton NFT puzzles.
//!
//! A full NFT puzzle is three nested curried layers around the owner's
//! spend-authority (p2) puzzle:
//!
//! ```text
//! singleton_top_layer → nft_state_layer → [nft_ownership_layer] → p2
//! ```
//!
//! `NftDecoder::decode` peels them off in order, checks each module by
//! fingerprint, reads each layer's arguments positionally and returns one
//! `UncurriedNft`. Decoding is all-or-nothing: the first mismatch is
//! returned and no partial record is built. The one mismatch that is not an
//! error is a missing ownership layer.
//!
//! The decoder holds nothing but its reference fingerprints, so one
//! instance can be shared across threads.

mod layers;
mod metadata;

pub use layers::OwnershipLayer;
pub use metadata::{MetadataKey, NftMetadata};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::LayerReferences;
use crate::error::DecodeResult;
use crate::tree::Tree;
use layers::{SingletonLayer, StateLayer};

/// A fully uncurried NFT puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UncurriedNft {
    /// `(MOD_HASH . (LAUNCHER_ID . LAUNCHER_PUZZLE_HASH))`
    pub singleton_struct: Tree,
    pub singleton_mod_hash: Tree,
    pub singleton_launcher_id: Tree,
    pub launcher_puzhash: Tree,

    /// The curried state layer, as found inside the singleton.
    pub nft_state_layer: Tree,
    pub nft_mod_hash: Tree,
    /// Raw metadata list.
    pub metadata: Tree,
    pub metadata_updater_hash: Tree,
    /// Decoded metadata with defaults.
    pub metadata_fields: NftMetadata,
    /// State layer inner puzzle (the ownership layer, if present).
    pub inner_puzzle: Tree,

    /// `None` when the NFT has no ownership layer.
    pub ownership: Option<OwnershipLayer>,

    /// Spend-authority puzzle of the owner.
    pub p2_puzzle: Tree,
}

impl UncurriedNft {
    /// Launcher id bytes, if the struct holds an atom there.
    pub fn launcher_id(&self) -> Option<&[u8]> {
        self.singleton_launcher_id.as_atom().map(|atom| atom.as_bytes())
    }

    pub fn supports_did(&self) -> bool {
        self.ownership.is_some()
    }

    pub fn owner_did(&self) -> Option<&Tree> {
        self.ownership.as_ref().map(|layer| &layer.owner_did)
    }

    /// Royalty in basis points. `None` without an ownership layer, or if the
    /// curried value is not an integer in `0..=65535`.
    pub fn royalty_percentage(&self) -> Option<u16> {
        self.ownership
            .as_ref()
            .and_then(OwnershipLayer::royalty_percentage_u16)
    }
}

/// Decodes NFT puzzles against a fixed set of layer references.
#[derive(Clone, Debug, Default)]
pub struct NftDecoder {
    references: LayerReferences,
}

impl NftDecoder {
    pub fn new(references: LayerReferences) -> Self {
        Self { references }
    }

    pub fn references(&self) -> &LayerReferences {
        &self.references
    }

    /// Uncurry a full NFT puzzle.
    pub fn decode(&self, puzzle: &Tree) -> DecodeResult<UncurriedNft> {
        let refs = &self.references;
        let singleton = SingletonLayer::match_puzzle(puzzle, refs)?;
        let state = StateLayer::match_puzzle(&singleton.inner_puzzle, refs)?;
        let metadata_fields = NftMetadata::decode(&state.metadata)?;

        let (ownership, p2_puzzle) = match OwnershipLayer::match_puzzle(&state.inner_puzzle, refs)? {
            Some((layer, p2_puzzle)) => (Some(layer), p2_puzzle),
            None => (None, state.inner_puzzle.clone()),
        };

        Ok(UncurriedNft {
            singleton_struct: singleton.singleton_struct,
            singleton_mod_hash: singleton.singleton_mod_hash,
            singleton_launcher_id: singleton.launcher_id,
            launcher_puzhash: singleton.launcher_puzhash,
            nft_state_layer: singleton.inner_puzzle,
            nft_mod_hash: state.nft_mod_hash,
            metadata: state.metadata,
            metadata_updater_hash: state.metadata_updater_hash,
            metadata_fields,
            inner_puzzle: state.inner_puzzle,
            ownership,
            p2_puzzle,
        })
    }

    /// Decode, treating any failure as "not an NFT".
    pub fn try_decode(&self, puzzle: &Tree) -> Option<UncurriedNft> {
        match self.decode(puzzle) {
            Ok(nft) => Some(nft),
            Err(err) => {
                debug!(layer = %err.layer(), "not an NFT puzzle: {}", err);
                None
            }
        }
    }

    /// Decode many puzzles in parallel. Results keep the input order.
    pub fn decode_batch(&self, puzzles: &[Tree]) -> Vec<DecodeResult<UncurriedNft>> {
        puzzles.par_iter().map(|puzzle| self.decode(puzzle)).collect()
    }
}

/// Uncurry a puzzle against the mainnet layer references.
pub fn decode(puzzle: &Tree) -> DecodeResult<UncurriedNft> {
    NftDecoder::default().decode(puzzle)
}
