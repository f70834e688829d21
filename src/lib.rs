//! A pure-Rust library for Docker/OCI image manifests.
//!
//! Manifests are content-addressed: their identity is the digest of the exact
//! bytes stored in a registry. This crate keeps those bytes alongside the
//! structured view, so a manifest can be inspected and re-transmitted
//! without its digest drifting.
//!
//! ## Example
//!
//! ```rust
//! # fn run() -> dkmanifest::Result<()> {
//! use dkmanifest::manifest::SchemaRegistry;
//! use dkmanifest::mediatypes;
//!
//! let registry = SchemaRegistry::configure().build()?;
//!
//! let raw = br#"{
//!   "schemaVersion": 2,
//!   "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
//!   "config": {
//!     "mediaType": "application/vnd.docker.container.image.v1+json",
//!     "size": 7023,
//!     "digest": "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7"
//!   },
//!   "layers": []
//! }"#;
//!
//! let (manifest, descriptor) = registry.decode(mediatypes::MANIFEST_V2S2, raw)?;
//! assert_eq!(descriptor.size, raw.len() as u64);
//! assert_eq!(manifest.payload()?.1, &raw[..]);
//! #
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate strum_macros;

pub mod errors;
pub use errors::{Error, Result};

pub mod descriptor;
pub mod digest;
pub mod manifest;
pub mod mediatypes;
