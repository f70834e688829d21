//! Content digests, as `<algorithm>:<encoded>` strings.
//!
//! See https://github.com/opencontainers/image-spec/blob/master/descriptor.md#digests

use crate::errors::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::Digest as _;
use std::convert::TryFrom;
use std::{fmt, str};

lazy_static! {
    // algorithm ":" encoded, per the OCI descriptor grammar.
    static ref DIGEST_RE: Regex = Regex::new(r"^[a-z0-9]+(?:[+._-][a-z0-9]+)*:[a-zA-Z0-9=_-]+$")
        .expect("Invalid digest regex.");
}

/// Algorithm used by `Digest::from_bytes`.
pub static CANONICAL_ALGORITHM: &'static str = "sha256";

/// A string which is guaranteed to be a well-formed digest.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Digest `data` with the canonical algorithm.
    pub fn from_bytes(data: &[u8]) -> Self {
        Digest(format!(
            "{}:{:x}",
            CANONICAL_ALGORITHM,
            sha2::Sha256::digest(data)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn algorithm(&self) -> &str {
        self.split().0
    }

    pub fn encoded(&self) -> &str {
        self.split().1
    }

    /// Check whether `data` hashes to this digest.
    pub fn verify(&self, data: &[u8]) -> Result<bool> {
        let computed = match self.algorithm() {
            "sha256" => format!("{:x}", sha2::Sha256::digest(data)),
            "sha384" => format!("{:x}", sha2::Sha384::digest(data)),
            "sha512" => format!("{:x}", sha2::Sha512::digest(data)),
            algo => return Err(Error::UnsupportedAlgorithm(algo.to_string())),
        };
        Ok(computed == self.encoded())
    }

    fn split(&self) -> (&str, &str) {
        // Validated on construction, a separator is always present.
        match self.0.find(':') {
            Some(i) => (&self.0[..i], &self.0[i + 1..]),
            None => (&self.0, ""),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl str::FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !DIGEST_RE.is_match(s) {
            return Err(Error::InvalidDigest(s.to_string()));
        }
        Ok(Digest(s.to_string()))
    }
}

impl TryFrom<String> for Digest {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Digest> for String {
    fn from(d: Digest) -> String {
        d.0
    }
}
