extern crate dkmanifest;
extern crate env_logger;
extern crate spectral;
extern crate test_case;

use dkmanifest::digest::Digest;
use dkmanifest::manifest::SchemaRegistry;
use dkmanifest::{mediatypes, Error};
use spectral::prelude::*;
use std::fs;
use std::sync::Arc;
use test_case::test_case;

fn fixture(name: &str) -> Vec<u8> {
    fs::read(format!("tests/fixtures/{}", name)).expect("Missing fixture")
}

fn registry() -> SchemaRegistry {
    let _ = env_logger::try_init();
    SchemaRegistry::configure().build().unwrap()
}

#[test_case("application/vnd.docker.distribution.manifest.v2+json" ; "docker")]
#[test_case("application/vnd.oci.image.manifest.v1+json" ; "oci")]
fn test_decode_stamps_media_type(media_type: &str) {
    let raw = fixture("manifest_v2_s2.json");
    let (manif, desc) = registry().decode(media_type, &raw).unwrap();

    assert_eq!(desc.media_type, media_type);
    assert_eq!(desc.size, raw.len() as u64);
    assert_eq!(desc.digest, Digest::from_bytes(&raw));
    assert_eq!(manif.payload().unwrap().1, &raw[..]);
    assert_that(&manif.target()).is_some();
}

#[test]
fn test_decode_digest_of_input() {
    let raw = fixture("manifest_v2_s2.json");
    let (_, desc) = registry().decode(mediatypes::MANIFEST_V2S2, &raw).unwrap();
    assert_eq!(
        desc.digest.as_str(),
        "sha256:c3c6476c315cc38608127f5da9aac3ddb1273149d6ddee8a8e11824eabfb0ac4"
    );
    assert!(desc.digest.verify(&raw).unwrap());
}

#[test]
fn test_decode_unsupported() {
    let raw = fixture("manifest_v2_s2.json");
    let r = registry().decode(mediatypes::IMAGE_LAYER, &raw);
    match r {
        Err(Error::UnsupportedMediaType(mt)) => assert_eq!(mt, mediatypes::IMAGE_LAYER),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_decode_malformed() {
    let r = registry().decode(mediatypes::MANIFEST_V2S2, b"{\"schemaVersion\":");
    assert!(matches!(r, Err(Error::Json(_))));
}

#[test]
fn test_register_schema2_twice() {
    let mut reg = registry();
    let r = dkmanifest::manifest::manifest_schema2::register(&mut reg);
    assert!(matches!(r, Err(Error::DuplicateRegistration(_))));
}

#[test_case("application/vnd.docker.distribution.manifest.v2+json; charset=utf-8" ; "with parameters")]
#[test_case("application/json" ; "generic json")]
#[test_case("text/plain; charset=utf-8" ; "text")]
#[test_case("" ; "missing")]
fn test_unmarshal_manifest_content_type(content_type: &str) {
    let raw = fixture("manifest_v2_s2.json");
    let (_, desc) = registry().unmarshal_manifest(content_type, &raw).unwrap();
    assert_eq!(desc.media_type, mediatypes::MANIFEST_V2S2);
}

#[test]
fn test_unmarshal_manifest_sniffs_oci() {
    let raw = fixture("manifest_oci.json");
    let (_, desc) = registry().unmarshal_manifest("application/json", &raw).unwrap();
    assert_eq!(desc.media_type, mediatypes::OCI_MANIFEST);
}

#[test]
fn test_unmarshal_manifest_bad_content_type() {
    let raw = fixture("manifest_v2_s2.json");
    let r = registry().unmarshal_manifest("not a media type", &raw);
    assert!(matches!(r, Err(Error::UnsupportedMediaType(_))));
}

#[test]
fn test_custom_decoder() {
    let raw = fixture("manifest_v2_s2.json");
    let custom = "application/vnd.example.manifest.v1+json";
    let decoder = dkmanifest::manifest::manifest_schema2::decoder(custom);
    let reg = SchemaRegistry::configure()
        .docker_schema2(false)
        .register(custom, decoder)
        .build()
        .unwrap();

    assert_eq!(reg.media_types(), vec![custom, mediatypes::OCI_MANIFEST]);
    let (_, desc) = reg.decode(custom, &raw).unwrap();
    assert_eq!(desc.media_type, custom);
    assert_that(&reg.decode(mediatypes::MANIFEST_V2S2, &raw).is_err()).is_true();
}

#[test]
fn test_shared_across_threads() {
    let reg = Arc::new(registry());
    let raw = Arc::new(fixture("manifest_v2_s2.json"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let reg = Arc::clone(&reg);
            let raw = Arc::clone(&raw);
            std::thread::spawn(move || {
                let (manif, desc) = reg.decode(mediatypes::MANIFEST_V2S2, &raw).unwrap();
                assert_eq!(manif.payload().unwrap().1, &raw[..]);
                desc.digest
            })
        })
        .collect();

    let digests: Vec<Digest> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(digests.windows(2).all(|w| w[0] == w[1]));
}
