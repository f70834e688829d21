//! Media-types for manifests and the blobs they reference.

use crate::errors::{Error, Result};
use std::str::FromStr;

// schema2 types, see https://docs.docker.com/registry/spec/manifest-v2-2/

/// Manifest, version 2 schema 2.
pub static MANIFEST_V2S2: &'static str = "application/vnd.docker.distribution.manifest.v2+json";
/// Configuration object for a container.
pub static CONTAINER_CONFIG_V1: &'static str = "application/vnd.docker.container.image.v1+json";
/// Image layer, as a gzip-compressed tar.
pub static IMAGE_LAYER: &'static str = "application/vnd.docker.image.rootfs.diff.tar.gzip";
/// Image layer which must be fetched from the URLs in its descriptor.
pub static IMAGE_LAYER_FOREIGN: &'static str =
    "application/vnd.docker.image.rootfs.foreign.diff.tar.gzip";

// OCI equivalents, wire-compatible with schema2.

/// Image manifest conforming to the OCI image spec.
pub static OCI_MANIFEST: &'static str = "application/vnd.oci.image.manifest.v1+json";
/// Image configuration referenced by an OCI manifest.
pub static OCI_CONFIG: &'static str = "application/vnd.oci.image.serialization.config.v1+json";
/// Image layer referenced by an OCI manifest.
pub static OCI_LAYER: &'static str = "application/vnd.oci.image.serialization.rootfs.tar.gzip";

/// Known media types, with their string forms.
#[derive(EnumString, Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaTypes {
    #[strum(serialize = "application/vnd.docker.distribution.manifest.v2+json")]
    ManifestV2S2,
    #[strum(serialize = "application/vnd.docker.container.image.v1+json")]
    ContainerConfigV1,
    #[strum(serialize = "application/vnd.docker.image.rootfs.diff.tar.gzip")]
    ImageLayerTgz,
    #[strum(serialize = "application/vnd.docker.image.rootfs.foreign.diff.tar.gzip")]
    ImageLayerForeignTgz,
    #[strum(serialize = "application/vnd.oci.image.manifest.v1+json")]
    OciManifest,
    #[strum(serialize = "application/vnd.oci.image.serialization.config.v1+json")]
    OciConfig,
    #[strum(serialize = "application/vnd.oci.image.serialization.rootfs.tar.gzip")]
    OciLayerTgz,
    /// Generic JSON, as sent by registries that do not label manifests.
    #[strum(serialize = "application/json")]
    ApplicationJson,
    #[strum(serialize = "text/plain")]
    TextPlain,
}

impl MediaTypes {
    /// Map a parsed MIME type to a known media type, ignoring parameters.
    pub fn from_mime(mtype: &mime::Mime) -> Result<Self> {
        Self::from_str(mtype.essence_str())
            .map_err(|_| Error::UnsupportedMediaType(mtype.to_string()))
    }

    /// Whether this type tells nothing about the manifest schema.
    pub fn is_generic(self) -> bool {
        matches!(self, MediaTypes::ApplicationJson | MediaTypes::TextPlain)
    }

    /// Whether layers of this type live outside the registry's blob store.
    pub fn is_foreign_layer(self) -> bool {
        self == MediaTypes::ImageLayerForeignTgz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_constants() {
        assert_eq!(MediaTypes::ManifestV2S2.to_string(), MANIFEST_V2S2);
        assert_eq!(MediaTypes::OciManifest.to_string(), OCI_MANIFEST);
        assert_eq!(MediaTypes::ImageLayerForeignTgz.to_string(), IMAGE_LAYER_FOREIGN);
    }

    #[test]
    fn test_from_mime_strips_params() {
        let m: mime::Mime = "application/json; charset=utf-8".parse().unwrap();
        let mt = MediaTypes::from_mime(&m).unwrap();
        assert_eq!(mt, MediaTypes::ApplicationJson);
        assert!(mt.is_generic());
    }

    #[test]
    fn test_from_mime_unknown() {
        let m: mime::Mime = "image/png".parse().unwrap();
        assert!(MediaTypes::from_mime(&m).is_err());
    }
}
