//! Media type dispatch for manifest decoders.

use super::{manifest_schema2, Manifest, Versioned};
use crate::descriptor::Descriptor;
use crate::errors::{Error, Result};
use crate::mediatypes::{self, MediaTypes};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of decoding a manifest payload.
pub type DecodeResult = Result<(Arc<dyn Manifest>, Descriptor)>;

/// Turns raw bytes into a manifest and the descriptor of those bytes.
pub type Decoder = Arc<dyn Fn(&[u8]) -> DecodeResult + Send + Sync>;

/// Table of manifest decoders, keyed by media type.
///
/// Populated once at startup, then only read.
#[derive(Default)]
pub struct SchemaRegistry {
    decoders: HashMap<String, Decoder>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("media_types", &self.media_types())
            .finish()
    }
}

impl SchemaRegistry {
    /// Start configuring a registry with the built-in schemas.
    pub fn configure() -> Config {
        Config::default()
    }

    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `media_type` with `decoder`.
    ///
    /// Registering the same decoder twice is a no-op; a different decoder
    /// for an already known media type is rejected.
    pub fn register(&mut self, media_type: &str, decoder: Decoder) -> Result<()> {
        if let Some(existing) = self.decoders.get(media_type) {
            if Arc::ptr_eq(existing, &decoder) {
                return Ok(());
            }
            return Err(Error::DuplicateRegistration(media_type.to_string()));
        }
        trace!("Registering manifest schema for {:?}", media_type);
        self.decoders.insert(media_type.to_string(), decoder);
        Ok(())
    }

    /// Decode `payload` with the decoder registered for `media_type`.
    pub fn decode(&self, media_type: &str, payload: &[u8]) -> DecodeResult {
        let decoder = self
            .decoders
            .get(media_type)
            .ok_or_else(|| Error::UnsupportedMediaType(media_type.to_string()))?;
        trace!(
            "Decoding {} bytes as manifest {:?}",
            payload.len(),
            media_type
        );
        decoder(payload).map_err(|e| {
            debug!("Failed to decode manifest {:?}: {}", media_type, e);
            e
        })
    }

    /// Decode `payload` as announced by a `Content-Type` header value.
    ///
    /// Parameters are ignored. If the header is missing or only says
    /// "JSON", the schema is picked from the payload's own `mediaType` field.
    pub fn unmarshal_manifest(&self, content_type: &str, payload: &[u8]) -> DecodeResult {
        let content_type = content_type.trim();
        let declared = if content_type.is_empty() {
            None
        } else {
            let mtype: mime::Mime = content_type
                .parse()
                .map_err(|_| Error::UnsupportedMediaType(content_type.to_string()))?;
            let generic = MediaTypes::from_mime(&mtype)
                .map(MediaTypes::is_generic)
                .unwrap_or(false);
            if generic {
                None
            } else {
                Some(mtype.essence_str().to_string())
            }
        };

        let media_type = match declared {
            Some(mt) => mt,
            None => {
                let versioned: Versioned = serde_json::from_slice(payload)?;
                trace!("Sniffed manifest media type {:?}", versioned.media_type);
                versioned.media_type
            }
        };
        self.decode(&media_type, payload)
    }

    /// Registered media types, sorted.
    pub fn media_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

/// Configuration for a `SchemaRegistry`.
pub struct Config {
    docker_schema2: bool,
    oci: bool,
    extra: Vec<(String, Decoder)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_schema2: true,
            oci: true,
            extra: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let extra: Vec<&str> = self.extra.iter().map(|(mt, _)| mt.as_str()).collect();
        f.debug_struct("Config")
            .field("docker_schema2", &self.docker_schema2)
            .field("oci", &self.oci)
            .field("extra", &extra)
            .finish()
    }
}

impl Config {
    /// Whether to decode Docker schema2 manifests.
    pub fn docker_schema2(mut self, enable: bool) -> Self {
        self.docker_schema2 = enable;
        self
    }

    /// Whether to decode OCI image manifests with the schema2 decoder.
    pub fn oci(mut self, enable: bool) -> Self {
        self.oci = enable;
        self
    }

    /// Add a decoder for another schema.
    pub fn register(mut self, media_type: &str, decoder: Decoder) -> Self {
        self.extra.push((media_type.to_string(), decoder));
        self
    }

    /// Return a populated `SchemaRegistry`.
    ///
    /// Fails if two decoders claim the same media type. Callers at process
    /// startup are expected to treat that as fatal.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        if self.docker_schema2 {
            registry.register(
                mediatypes::MANIFEST_V2S2,
                manifest_schema2::decoder(mediatypes::MANIFEST_V2S2),
            )?;
        }
        if self.oci {
            registry.register(
                mediatypes::OCI_MANIFEST,
                manifest_schema2::decoder(mediatypes::OCI_MANIFEST),
            )?;
        }
        for (media_type, decoder) in self.extra {
            registry.register(&media_type, decoder)?;
        }
        trace!("Built schema registry: {:?}", registry);
        Ok(registry)
    }
}
