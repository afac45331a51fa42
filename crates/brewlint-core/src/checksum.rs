//! Content-addressing digests for source archives.
//!
//! A [`Checksum`] keeps the raw text exactly as it appeared in the manifest,
//! even when it is not a plausible digest, so that validation can report the
//! offending value instead of the parser rejecting the whole file.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Digest algorithm declared for a checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the manifest keyword (`sha256`, `sha512`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Number of lowercase hex characters in a digest of this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }

    /// Parses a manifest keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "sha256" => Some(Self::Sha256),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a checksum is not a plausible digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumProblem {
    /// Length differs from what the algorithm produces.
    WrongLength { expected: usize, actual: usize },
    /// Contains something other than lowercase hex digits.
    NonHex,
    /// Every digit is zero.
    AllZero,
}

impl fmt::Display for ChecksumProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, actual } => {
                write!(f, "expected {} hex characters, got {}", expected, actual)
            }
            Self::NonHex => f.write_str("contains characters outside [0-9a-f]"),
            Self::AllZero => f.write_str("all-zero digest"),
        }
    }
}

/// An expected archive digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    pub hex: String,
}

impl Checksum {
    pub fn new(algorithm: DigestAlgorithm, hex: impl Into<String>) -> Self {
        Self {
            algorithm,
            hex: hex.into(),
        }
    }

    /// Shorthand for a SHA-256 checksum.
    pub fn sha256(hex: impl Into<String>) -> Self {
        Self::new(DigestAlgorithm::Sha256, hex)
    }

    /// Checks that the text could be a digest produced by the declared algorithm.
    ///
    /// No sentinel values are recognised: placeholder strings fail like any
    /// other malformed value.
    pub fn check_format(&self) -> Result<(), ChecksumProblem> {
        let expected = self.algorithm.hex_len();
        if self.hex.len() != expected {
            return Err(ChecksumProblem::WrongLength {
                expected,
                actual: self.hex.len(),
            });
        }
        if !self
            .hex
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(ChecksumProblem::NonHex);
        }
        if self.hex.bytes().all(|b| b == b'0') {
            return Err(ChecksumProblem::AllZero);
        }
        Ok(())
    }

    /// Returns `true` if `bytes` hash to this checksum.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        compute_digest(bytes, self.algorithm) == self.hex
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

/// Computes the lowercase hex digest of `bytes`.
pub fn compute_digest(bytes: &[u8], algorithm: DigestAlgorithm) -> String {
    match algorithm {
        DigestAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        DigestAlgorithm::Sha512 => format!("{:x}", Sha512::digest(bytes)),
    }
}

/// Computes a digest incrementally from a reader.
pub fn digest_reader<R: std::io::Read>(
    mut reader: R,
    algorithm: DigestAlgorithm,
) -> std::io::Result<String> {
    let mut buf = [0u8; 8192];
    match algorithm {
        DigestAlgorithm::Sha256 => {
            let mut h = Sha256::new();
            loop {
                let n = reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                h.update(&buf[..n]);
            }
            Ok(format!("{:x}", h.finalize()))
        }
        DigestAlgorithm::Sha512 => {
            let mut h = Sha512::new();
            loop {
                let n = reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                h.update(&buf[..n]);
            }
            Ok(format!("{:x}", h.finalize()))
        }
    }
}
