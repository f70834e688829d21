//! Image manifests and schema dispatch.
//!
//! Concrete schemas live in their own modules and plug into a
//! [`SchemaRegistry`](struct.SchemaRegistry.html), which turns raw bytes plus a
//! declared media type into a polymorphic [`Manifest`](trait.Manifest.html).

use crate::descriptor::Descriptor;
use crate::errors::Result;
use std::fmt;

pub mod manifest_schema2;
pub use self::manifest_schema2::{DeserializedManifest, ManifestSchema2};

mod registry;
pub use self::registry::{Config, DecodeResult, Decoder, SchemaRegistry};

/// Schema version and media type, common to all versioned manifests.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Versioned {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u16,
    #[serde(rename = "mediaType", default, skip_serializing_if = "String::is_empty")]
    pub media_type: String,
}

/// Capabilities shared by every manifest schema.
pub trait Manifest: fmt::Debug + Send + Sync {
    /// Blobs referenced by this manifest, in stored order.
    fn references(&self) -> &[Descriptor];

    /// The blob this manifest primarily describes, if the schema has one.
    fn target(&self) -> Option<&Descriptor> {
        None
    }

    /// Media type and the exact bytes this manifest is identified by.
    ///
    /// The returned bytes are the ones to transmit, store or hash.
    fn payload(&self) -> Result<(&str, &[u8])>;
}
