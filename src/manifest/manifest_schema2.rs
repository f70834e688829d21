//! Image manifest version 2, schema 2, and its OCI equivalent.
//!
//! Specification is at https://docs.docker.com/registry/spec/manifest-v2-2/.

use super::{DecodeResult, Decoder, Manifest, Versioned};
use crate::descriptor::Descriptor;
use crate::errors::{Error, Result};
use crate::mediatypes;
use bytes::Bytes;
use serde::Serialize as _;
use std::sync::Arc;

/// Indentation of manifests serialized by this crate.
static INDENT: &'static [u8] = b"   ";

/// Version tag for manifests built by this module.
pub fn schema_version() -> Versioned {
    Versioned {
        schema_version: 2,
        media_type: mediatypes::OCI_MANIFEST.to_string(),
    }
}

/// Manifest version 2 schema 2.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManifestSchema2 {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u16,
    #[serde(rename = "mediaType", default, skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    /// Image configuration blob.
    pub config: Descriptor,
    /// Layer blobs, base layer first. Missing or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub layers: Vec<Descriptor>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Descriptor>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let layers: Option<Vec<Descriptor>> = serde::Deserialize::deserialize(deserializer)?;
    Ok(layers.unwrap_or_default())
}

impl ManifestSchema2 {
    pub fn new(versioned: Versioned, config: Descriptor, layers: Vec<Descriptor>) -> Self {
        Self {
            schema_version: versioned.schema_version,
            media_type: versioned.media_type,
            config,
            layers,
        }
    }

    /// Descriptors of all layers referenced by this manifest.
    pub fn references(&self) -> &[Descriptor] {
        &self.layers
    }

    /// Descriptor of the configuration object referenced by this manifest.
    pub fn target(&self) -> &Descriptor {
        &self.config
    }
}

/// A `ManifestSchema2` together with the bytes it was read from or
/// serialized to.
///
/// Those bytes are authoritative: they are returned for transmission and
/// hashing, and are never regenerated from the structured fields.
#[derive(Clone, Debug, Default)]
pub struct DeserializedManifest {
    inner: Option<Canonical>,
}

#[derive(Clone, Debug)]
struct Canonical {
    manifest: ManifestSchema2,
    bytes: Bytes,
}

impl DeserializedManifest {
    /// Parse `payload`, keeping a copy of it as the canonical form.
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        let mut m = Self::default();
        m.unmarshal(payload)?;
        Ok(m)
    }

    /// Serialize `manifest` and keep the result as the canonical form.
    pub fn from_struct(manifest: ManifestSchema2) -> Result<Self> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        manifest.serialize(&mut ser)?;
        Ok(Self {
            inner: Some(Canonical {
                manifest,
                bytes: Bytes::from(buf),
            }),
        })
    }

    /// Replace the content of this manifest by the decoding of `payload`.
    ///
    /// On error the previous content is kept.
    pub fn unmarshal(&mut self, payload: &[u8]) -> Result<()> {
        let bytes = Bytes::copy_from_slice(payload);
        let mut de = serde_json::Deserializer::from_slice(&bytes);
        let manifest: ManifestSchema2 = serde_ignored::deserialize(&mut de, |path| {
            debug!("Ignoring unknown manifest field {}", path);
        })?;
        de.end()?;
        self.inner = Some(Canonical { manifest, bytes });
        Ok(())
    }

    /// The canonical bytes of this manifest.
    pub fn marshal(&self) -> Result<&[u8]> {
        self.canonical().map(|c| c.bytes.as_ref())
    }

    /// The structured view, if populated.
    pub fn manifest(&self) -> Option<&ManifestSchema2> {
        self.inner.as_ref().map(|c| &c.manifest)
    }

    pub fn is_populated(&self) -> bool {
        self.inner.is_some()
    }

    /// Layer descriptors, empty if not populated.
    pub fn references(&self) -> &[Descriptor] {
        self.manifest().map(ManifestSchema2::references).unwrap_or(&[])
    }

    /// Config descriptor.
    pub fn target(&self) -> Option<&Descriptor> {
        self.manifest().map(ManifestSchema2::target)
    }

    /// Media type and canonical bytes.
    pub fn payload(&self) -> Result<(&str, &[u8])> {
        let c = self.canonical()?;
        Ok((c.manifest.media_type.as_str(), c.bytes.as_ref()))
    }

    fn canonical(&self) -> Result<&Canonical> {
        self.inner.as_ref().ok_or(Error::UninitializedRepresentation)
    }
}

impl Manifest for DeserializedManifest {
    fn references(&self) -> &[Descriptor] {
        DeserializedManifest::references(self)
    }

    fn target(&self) -> Option<&Descriptor> {
        DeserializedManifest::target(self)
    }

    fn payload(&self) -> Result<(&str, &[u8])> {
        DeserializedManifest::payload(self)
    }
}

/// Decoder for schema2 payloads, labelling descriptors with `media_type`.
///
/// The descriptor covers the input bytes exactly as given.
pub fn decoder(media_type: &str) -> Decoder {
    let media_type = media_type.to_string();
    Arc::new(move |payload: &[u8]| -> DecodeResult {
        let manifest: Arc<dyn Manifest> = Arc::new(DeserializedManifest::from_bytes(payload)?);
        let descriptor = Descriptor::for_blob(media_type.as_str(), payload);
        trace!("Decoded manifest {} ({:?})", descriptor.digest, media_type);
        Ok((manifest, descriptor))
    })
}

/// Register schema2 under both the Docker and OCI media types.
pub fn register(registry: &mut super::SchemaRegistry) -> Result<()> {
    registry.register(mediatypes::MANIFEST_V2S2, decoder(mediatypes::MANIFEST_V2S2))?;
    registry.register(mediatypes::OCI_MANIFEST, decoder(mediatypes::OCI_MANIFEST))?;
    Ok(())
}

/// Assembles a schema2 manifest from a configuration blob and its layers.
#[derive(Clone, Debug)]
pub struct Builder {
    config: Descriptor,
    layers: Vec<Descriptor>,
}

impl Builder {
    /// Start a manifest whose configuration is `config_blob`.
    pub fn new<S: Into<String>>(config_media_type: S, config_blob: &[u8]) -> Self {
        Self {
            config: Descriptor::for_blob(config_media_type, config_blob),
            layers: Vec::new(),
        }
    }

    /// Add a layer on top of the ones already appended.
    pub fn append_reference(&mut self, layer: Descriptor) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Layers appended so far.
    pub fn references(&self) -> &[Descriptor] {
        &self.layers
    }

    /// Produce a manifest labelled with `media_type`.
    pub fn build(&self, media_type: &str) -> Result<DeserializedManifest> {
        let versioned = Versioned {
            schema_version: schema_version().schema_version,
            media_type: media_type.to_string(),
        };
        let m = ManifestSchema2::new(versioned, self.config.clone(), self.layers.clone());
        DeserializedManifest::from_struct(m)
    }
}
