//! Blob descriptors.

use crate::digest::Digest;
use crate::mediatypes::MediaTypes;
use std::str::FromStr;

/// A `(mediaType, size, digest)` triple identifying a blob.
///
/// Fields serialize in the order `mediaType`, `size`, `digest`, `urls`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Descriptor {
    #[serde(rename = "mediaType")]
    pub media_type: String,
    pub size: u64,
    pub digest: Digest,
    /// Locations to fetch the blob from, for foreign layers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub urls: Option<Vec<String>>,
}

impl Descriptor {
    pub fn new<S: Into<String>>(media_type: S, size: u64, digest: Digest) -> Self {
        Self {
            media_type: media_type.into(),
            size,
            digest,
            urls: None,
        }
    }

    /// Describe `blob` as content of type `media_type`.
    pub fn for_blob<S: Into<String>>(media_type: S, blob: &[u8]) -> Self {
        Self::new(media_type, blob.len() as u64, Digest::from_bytes(blob))
    }

    /// Whether this blob must be fetched from `urls` rather than the registry.
    pub fn is_foreign(&self) -> bool {
        MediaTypes::from_str(&self.media_type)
            .map(MediaTypes::is_foreign_layer)
            .unwrap_or(false)
    }
}
