use thiserror::Error;

use crate::hash::Fingerprint;
use crate::tree::{ShapeError, Tree};

/// Result alias for NFT decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// The nesting level a decode error was raised at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Singleton,
    State,
    Metadata,
    Ownership,
    TransferProgram,
    OwnershipInner,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Singleton => "singleton top layer",
            Layer::State => "NFT state layer",
            Layer::Metadata => "NFT metadata",
            Layer::Ownership => "NFT ownership layer",
            Layer::TransferProgram => "transfer program",
            Layer::OwnershipInner => "ownership layer inner puzzle",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a node was not the expected module.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModuleMismatch {
    #[error("node is not curried: {0}")]
    NotCurried(ShapeError),
    #[error("module {found} is not {expected}")]
    Fingerprint {
        found: Fingerprint,
        expected: Fingerprint,
    },
}

/// Structural mismatches found while uncurrying an NFT puzzle.
///
/// Each variant carries the node that failed so callers can report it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("cannot uncurry NFT puzzle, failed on singleton top layer: {reason}")]
    UnknownOuterModule { node: Tree, reason: ModuleMismatch },

    #[error("cannot uncurry singleton top layer: {reason}")]
    MalformedSingletonStruct { node: Tree, reason: ShapeError },

    #[error("cannot uncurry NFT puzzle, failed on NFT state layer: {reason}")]
    UnknownStateModule { node: Tree, reason: ModuleMismatch },

    #[error("NFT state layer expects 4 curried arguments, found {found}")]
    StateLayerArityError { node: Tree, found: usize },

    #[error("cannot decode NFT metadata: {reason}")]
    MalformedMetadata { node: Tree, reason: ShapeError },

    #[error("cannot uncurry NFT ownership layer: {reason}")]
    MalformedOwnershipLayer { node: Tree, reason: ShapeError },

    #[error("cannot uncurry transfer program: {reason}")]
    MalformedTransferProgram { node: Tree, reason: ShapeError },

    #[error("cannot uncurry ownership layer inner puzzle: {reason}")]
    MalformedOwnershipInnerPuzzle { node: Tree, reason: ShapeError },
}

impl DecodeError {
    /// The layer being decoded when the error was raised.
    pub fn layer(&self) -> Layer {
        match self {
            DecodeError::UnknownOuterModule { .. } | DecodeError::MalformedSingletonStruct { .. } => {
                Layer::Singleton
            }
            DecodeError::UnknownStateModule { .. } | DecodeError::StateLayerArityError { .. } => {
                Layer::State
            }
            DecodeError::MalformedMetadata { .. } => Layer::Metadata,
            DecodeError::MalformedOwnershipLayer { .. } => Layer::Ownership,
            DecodeError::MalformedTransferProgram { .. } => Layer::TransferProgram,
            DecodeError::MalformedOwnershipInnerPuzzle { .. } => Layer::OwnershipInner,
        }
    }

    /// The node that failed to decode.
    pub fn node(&self) -> &Tree {
        match self {
            DecodeError::UnknownOuterModule { node, .. }
            | DecodeError::MalformedSingletonStruct { node, .. }
            | DecodeError::UnknownStateModule { node, .. }
            | DecodeError::StateLayerArityError { node, .. }
            | DecodeError::MalformedMetadata { node, .. }
            | DecodeError::MalformedOwnershipLayer { node, .. }
            | DecodeError::MalformedTransferProgram { node, .. }
            | DecodeError::MalformedOwnershipInnerPuzzle { node, .. } => node,
        }
    }
}
