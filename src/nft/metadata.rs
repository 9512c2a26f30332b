//! NFT metadata: a sparse key/value list curried into the state layer.
//!
//! The list holds `(key . value)` pairs with short atom keys. Keys this
//! decoder does not know are skipped, so newer metadata schemes stay
//! readable. When a key repeats, the last occurrence wins.

use serde::Serialize;
use tracing::trace;

use crate::error::{DecodeError, DecodeResult};
use crate::tree::{ShapeError, Tree};

/// A recognized metadata key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    DataUris,
    DataHash,
    MetaUris,
    MetaHash,
    LicenseUris,
    LicenseHash,
    SeriesNumber,
    SeriesTotal,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 8] = [
        MetadataKey::DataUris,
        MetadataKey::DataHash,
        MetadataKey::MetaUris,
        MetadataKey::MetaHash,
        MetadataKey::LicenseUris,
        MetadataKey::LicenseHash,
        MetadataKey::SeriesNumber,
        MetadataKey::SeriesTotal,
    ];

    /// The atom bytes of this key in the metadata list.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            MetadataKey::DataUris => b"u",
            MetadataKey::DataHash => b"h",
            MetadataKey::MetaUris => b"mu",
            MetadataKey::MetaHash => b"mh",
            MetadataKey::LicenseUris => b"lu",
            MetadataKey::LicenseHash => b"lh",
            MetadataKey::SeriesNumber => b"sn",
            MetadataKey::SeriesTotal => b"st",
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_bytes() == bytes)
    }

    /// Value used when the key is absent.
    pub fn default_value(self) -> Tree {
        match self {
            MetadataKey::DataUris | MetadataKey::MetaUris | MetadataKey::LicenseUris => {
                Tree::list(Vec::new())
            }
            MetadataKey::DataHash | MetadataKey::MetaHash | MetadataKey::LicenseHash => {
                Tree::int(0)
            }
            MetadataKey::SeriesNumber | MetadataKey::SeriesTotal => Tree::int(1),
        }
    }
}

/// Metadata fields with defaults filled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NftMetadata {
    pub data_uris: Tree,
    pub data_hash: Tree,
    pub meta_uris: Tree,
    pub meta_hash: Tree,
    pub license_uris: Tree,
    pub license_hash: Tree,
    pub series_number: Tree,
    pub series_total: Tree,
}

impl Default for NftMetadata {
    fn default() -> Self {
        Self {
            data_uris: MetadataKey::DataUris.default_value(),
            data_hash: MetadataKey::DataHash.default_value(),
            meta_uris: MetadataKey::MetaUris.default_value(),
            meta_hash: MetadataKey::MetaHash.default_value(),
            license_uris: MetadataKey::LicenseUris.default_value(),
            license_hash: MetadataKey::LicenseHash.default_value(),
            series_number: MetadataKey::SeriesNumber.default_value(),
            series_total: MetadataKey::SeriesTotal.default_value(),
        }
    }
}

impl NftMetadata {
    /// Read a metadata list.
    ///
    /// Fails only if the list is improper or an entry is not a pair.
    /// Entries whose key is unknown (or not an atom) are ignored.
    pub fn decode(metadata: &Tree) -> DecodeResult<Self> {
        let malformed = |reason| DecodeError::MalformedMetadata {
            node: metadata.clone(),
            reason,
        };
        let mut fields = Self::default();
        for entry in metadata.iter_list() {
            let (key, value) = entry.and_then(Tree::decompose).map_err(malformed)?;
            match key.as_atom().and_then(|atom| MetadataKey::from_bytes(atom.as_bytes())) {
                Some(key) => *fields.slot_mut(key) = value.clone(),
                None => trace!(key = %key, "skipping unknown metadata key"),
            }
        }
        Ok(fields)
    }

    pub fn get(&self, key: MetadataKey) -> &Tree {
        match key {
            MetadataKey::DataUris => &self.data_uris,
            MetadataKey::DataHash => &self.data_hash,
            MetadataKey::MetaUris => &self.meta_uris,
            MetadataKey::MetaHash => &self.meta_hash,
            MetadataKey::LicenseUris => &self.license_uris,
            MetadataKey::LicenseHash => &self.license_hash,
            MetadataKey::SeriesNumber => &self.series_number,
            MetadataKey::SeriesTotal => &self.series_total,
        }
    }

    fn slot_mut(&mut self, key: MetadataKey) -> &mut Tree {
        match key {
            MetadataKey::DataUris => &mut self.data_uris,
            MetadataKey::DataHash => &mut self.data_hash,
            MetadataKey::MetaUris => &mut self.meta_uris,
            MetadataKey::MetaHash => &mut self.meta_hash,
            MetadataKey::LicenseUris => &mut self.license_uris,
            MetadataKey::LicenseHash => &mut self.license_hash,
            MetadataKey::SeriesNumber => &mut self.series_number,
            MetadataKey::SeriesTotal => &mut self.series_total,
        }
    }

    /// Encode as a metadata list with every key present, in `MetadataKey::ALL` order.
    pub fn to_tree(&self) -> Tree {
        Tree::list(
            MetadataKey::ALL
                .into_iter()
                .map(|key| Tree::pair(Tree::atom(key.as_bytes()), self.get(key).clone())),
        )
    }

    /// `series_number` as an integer, if it is a small non-negative atom.
    pub fn series_number_u64(&self) -> Option<u64> {
        self.series_number.as_atom()?.to_u64()
    }

    /// `series_total` as an integer, if it is a small non-negative atom.
    pub fn series_total_u64(&self) -> Option<u64> {
        self.series_total.as_atom()?.to_u64()
    }

    /// Read a URI list field as strings. Invalid UTF-8 is replaced lossily.
    pub fn uri_strings(uris: &Tree) -> Result<Vec<String>, ShapeError> {
        uris.iter_list()
            .map(|uri| -> Result<String, ShapeError> {
                let atom = uri?.atom_or_err()?;
                Ok(String::from_utf8_lossy(atom.as_bytes()).into_owned())
            })
            .collect()
    }
}
