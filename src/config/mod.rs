//! Reference fingerprints for the three NFT layers.
//!
//! The decoder recognizes a layer by comparing the fingerprint of a curried
//! module against a known value. The values are fixed for a deployment:
//! mainnet puzzles use the published CLVM tree hashes, tests and private
//! deployments load their own from a TOML file:
//!
//! ```toml
//! [references]
//! algorithm = "sha256"
//! singleton_top_layer = "7faa3253..."
//! nft_state_layer = "a04d9f57..."
//! nft_ownership_layer = "c5abea79..."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::{Fingerprint, HashAlgorithm};
use crate::tree::Tree;

/// Tree hash of `singleton_top_layer_v1_1`.
const SINGLETON_TOP_LAYER_V1_1: &str =
    "7faa3253bfddd1e0decb0906b2dc6247bbc4cf608f58345d173adb63e8b47c9f";
/// Tree hash of `nft_state_layer`.
const NFT_STATE_LAYER: &str = "a04d9f57764f54a43e4030befb4d80026e870519aaa66334aef8304f5d0393c2";
/// Tree hash of `nft_ownership_layer`.
const NFT_OWNERSHIP_LAYER: &str =
    "c5abea79afaa001b5427dfa0c8cf42ca6f38f5841b78f9b3c252733eb2de2726";

/// Errors raised while loading reference fingerprints.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read reference config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid reference config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot serialize reference config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Fingerprints identifying each layer's module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerReferences {
    /// Hash used both for the references and for fingerprinting modules.
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    /// Outer singleton wrapper.
    pub singleton_top_layer: Fingerprint,
    /// State layer carrying metadata.
    pub nft_state_layer: Fingerprint,
    /// Optional ownership/transfer layer.
    pub nft_ownership_layer: Fingerprint,
}

#[derive(Serialize, Deserialize)]
struct ConfigFile {
    references: LayerReferences,
}

impl LayerReferences {
    /// Published mainnet module hashes.
    pub fn mainnet() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            singleton_top_layer: builtin(SINGLETON_TOP_LAYER_V1_1),
            nft_state_layer: builtin(NFT_STATE_LAYER),
            nft_ownership_layer: builtin(NFT_OWNERSHIP_LAYER),
        }
    }

    /// Fingerprint the given module trees.
    pub fn from_modules(
        algorithm: HashAlgorithm,
        singleton_top_layer: &Tree,
        nft_state_layer: &Tree,
        nft_ownership_layer: &Tree,
    ) -> Self {
        Self {
            algorithm,
            singleton_top_layer: algorithm.tree_hash(singleton_top_layer),
            nft_state_layer: algorithm.tree_hash(nft_state_layer),
            nft_ownership_layer: algorithm.tree_hash(nft_ownership_layer),
        }
    }

    /// Load references from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse references from TOML text with a `[references]` table.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.references)
    }

    /// Render as a `[references]` TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let file = ConfigFile { references: *self };
        Ok(toml::to_string(&file)?)
    }
}

impl Default for LayerReferences {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Decode a compiled-in hash constant.
fn builtin(hex: &str) -> Fingerprint {
    // The constants above are 64 hex digits; a typo shows up as the zero
    // fingerprint, which matches no module.
    Fingerprint::from_hex(hex).unwrap_or_else(Fingerprint::zero)
}
