//! Per-layer extraction steps.
//!
//! Each layer is a curried module with a fixed argument list:
//!
//! ```text
//! singleton_top_layer  (SINGLETON_STRUCT  INNER_PUZZLE)
//!   nft_state_layer    (MOD_HASH  METADATA  METADATA_UPDATER_HASH  INNER_PUZZLE)
//!     [nft_ownership_layer (CURRENT_OWNER  TRANSFER_PROGRAM  INNER_PUZZLE)]
//!       p2 puzzle
//! ```
//!
//! The ownership layer is optional. A state-layer inner puzzle that is not
//! curried, or whose module is something else, is the p2 puzzle itself.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::LayerReferences;
use crate::error::{DecodeError, DecodeResult, ModuleMismatch};
use crate::hash::{Fingerprint, HashAlgorithm};
use crate::tree::curry::{uncurry, uncurry_n};
use crate::tree::{ShapeError, Tree};

/// Uncurry `node` and check its module against `expected`.
fn curried_args(
    node: &Tree,
    expected: Fingerprint,
    algorithm: HashAlgorithm,
) -> Result<Vec<Tree>, ModuleMismatch> {
    let (module, args) = uncurry(node).map_err(ModuleMismatch::NotCurried)?;
    let found = algorithm.tree_hash(&module);
    if found != expected {
        return Err(ModuleMismatch::Fingerprint { found, expected });
    }
    Ok(args)
}

// ─── Singleton Top Layer ───────────────────────────────────────────

/// The outer singleton wrapper.
pub(crate) struct SingletonLayer {
    pub singleton_struct: Tree,
    pub singleton_mod_hash: Tree,
    pub launcher_id: Tree,
    pub launcher_puzhash: Tree,
    /// The curried state layer.
    pub inner_puzzle: Tree,
}

impl SingletonLayer {
    pub fn match_puzzle(puzzle: &Tree, refs: &LayerReferences) -> DecodeResult<Self> {
        let args = curried_args(puzzle, refs.singleton_top_layer, refs.algorithm).map_err(
            |reason| DecodeError::UnknownOuterModule {
                node: puzzle.clone(),
                reason,
            },
        )?;

        let found = args.len();
        let [singleton_struct, inner_puzzle]: [Tree; 2] =
            args.try_into()
                .map_err(|_| DecodeError::MalformedSingletonStruct {
                    node: puzzle.clone(),
                    reason: ShapeError::Arity { expected: 2, found },
                })?;

        // (MOD_HASH . (LAUNCHER_ID . LAUNCHER_PUZZLE_HASH))
        let malformed = |reason| DecodeError::MalformedSingletonStruct {
            node: singleton_struct.clone(),
            reason,
        };
        let (mod_hash, tail) = singleton_struct.decompose().map_err(malformed)?;
        let (launcher_id, launcher_puzhash) = tail.decompose().map_err(malformed)?;

        trace!(launcher_id = %launcher_id, "matched singleton top layer");
        Ok(Self {
            singleton_mod_hash: mod_hash.clone(),
            launcher_id: launcher_id.clone(),
            launcher_puzhash: launcher_puzhash.clone(),
            singleton_struct: singleton_struct.clone(),
            inner_puzzle,
        })
    }
}

// ─── NFT State Layer ───────────────────────────────────────────────

/// The state layer holding metadata.
pub(crate) struct StateLayer {
    pub nft_mod_hash: Tree,
    pub metadata: Tree,
    pub metadata_updater_hash: Tree,
    pub inner_puzzle: Tree,
}

impl StateLayer {
    pub fn match_puzzle(node: &Tree, refs: &LayerReferences) -> DecodeResult<Self> {
        let args = curried_args(node, refs.nft_state_layer, refs.algorithm).map_err(|reason| {
            DecodeError::UnknownStateModule {
                node: node.clone(),
                reason,
            }
        })?;

        let found = args.len();
        let [nft_mod_hash, metadata, metadata_updater_hash, inner_puzzle]: [Tree; 4] = args
            .try_into()
            .map_err(|_| DecodeError::StateLayerArityError {
                node: node.clone(),
                found,
            })?;

        trace!("matched NFT state layer");
        Ok(Self {
            nft_mod_hash,
            metadata,
            metadata_updater_hash,
            inner_puzzle,
        })
    }
}

// ─── NFT Ownership Layer ───────────────────────────────────────────

/// Fields recovered from the ownership layer. Present or absent as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnershipLayer {
    /// Current owner DID (nil when unassigned).
    pub owner_did: Tree,
    /// Owner public key. The ownership layer does not curry one, so this is
    /// always `None` after decoding.
    pub owner_pubkey: Option<Tree>,
    /// Fingerprint of the ownership layer's inner puzzle module.
    pub nft_inner_puzzle_hash: Fingerprint,
    /// Fingerprint of the transfer program module.
    pub transfer_program_hash: Fingerprint,
    /// All five curried transfer program arguments, in order.
    pub transfer_program_curry_params: Vec<Tree>,
    pub royalty_address: Tree,
    /// Royalty in basis points, as curried. See `royalty_percentage_u16`.
    pub royalty_percentage: Tree,
}

impl OwnershipLayer {
    /// Try to match the ownership layer around `inner_puzzle`.
    ///
    /// Returns `Ok(None)` if the layer is absent. Once the module matches,
    /// a malformed transfer program or inner puzzle is an error.
    /// On success also returns the p2 puzzle.
    pub fn match_puzzle(
        inner_puzzle: &Tree,
        refs: &LayerReferences,
    ) -> DecodeResult<Option<(Self, Tree)>> {
        let args = match curried_args(inner_puzzle, refs.nft_ownership_layer, refs.algorithm) {
            Ok(args) => args,
            Err(reason) => {
                trace!(%reason, "no ownership layer");
                return Ok(None);
            }
        };

        let found = args.len();
        let [owner_did, transfer_program, nft_inner_puzzle]: [Tree; 3] =
            args.try_into()
                .map_err(|_| DecodeError::MalformedOwnershipLayer {
                    node: inner_puzzle.clone(),
                    reason: ShapeError::Arity { expected: 3, found },
                })?;

        let (royalty_address, royalty_percentage, transfer_module, transfer_args) =
            read_transfer_program(&transfer_program).map_err(|reason| {
                DecodeError::MalformedTransferProgram {
                    node: transfer_program.clone(),
                    reason,
                }
            })?;

        let (inner_module, [_, _, p2_puzzle]) =
            uncurry_n::<3>(&nft_inner_puzzle).map_err(|reason| {
                DecodeError::MalformedOwnershipInnerPuzzle {
                    node: nft_inner_puzzle.clone(),
                    reason,
                }
            })?;

        debug!(
            owner_did = %owner_did,
            royalty_percentage = %royalty_percentage,
            "matched NFT ownership layer"
        );
        let layer = Self {
            owner_did,
            owner_pubkey: None,
            nft_inner_puzzle_hash: refs.algorithm.tree_hash(&inner_module),
            transfer_program_hash: refs.algorithm.tree_hash(&transfer_module),
            transfer_program_curry_params: Vec::from(transfer_args),
            royalty_address,
            royalty_percentage,
        };
        Ok(Some((layer, p2_puzzle)))
    }

    /// `royalty_percentage` as basis points, if it is an atom in `0..=65535`.
    pub fn royalty_percentage_u16(&self) -> Option<u16> {
        let value = self.royalty_percentage.as_atom()?.to_u64()?;
        u16::try_from(value).ok()
    }
}

/// Read `(_ ROYALTY_ADDRESS ROYALTY_PERCENTAGE _ _)` from a curried transfer program.
///
/// Both royalty values are kept as curried; only the arity is checked.
fn read_transfer_program(
    transfer_program: &Tree,
) -> Result<(Tree, Tree, Tree, [Tree; 5]), ShapeError> {
    let (module, args) = uncurry_n::<5>(transfer_program)?;
    let royalty_address = args[1].clone();
    let royalty_percentage = args[2].clone();
    Ok((royalty_address, royalty_percentage, module, args))
}
