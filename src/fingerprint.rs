//! Content fingerprints for tracked files.
//!
//! A fingerprint is `<algorithm-id>:<base64 digest>`. The id prefix keeps
//! values written by different algorithms distinguishable, so a lock file can
//! hold a mix of them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufReader, ErrorKind, Read};
use std::str::FromStr;
use twox_hash::xxhash3_128;

use crate::error::Error;

/// Size of each read from the source. Has no effect on the result.
pub const CHUNK_SIZE: usize = 8 * 1024;

const MURMUR3_SEED: u32 = 0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Algorithm {
    /// MurmurHash3 x64 128-bit.
    #[default]
    #[serde(rename = "m3_128")]
    Murmur3_128,
    /// XXH3 128-bit.
    #[serde(rename = "xxh3_128")]
    Xxh3_128,
}

impl Algorithm {
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Murmur3_128 => "m3_128",
            Algorithm::Xxh3_128 => "xxh3_128",
        }
    }

    /// Returns the algorithm named by a fingerprint's prefix, if known.
    pub fn of(fingerprint: &str) -> Option<Algorithm> {
        let (id, _) = fingerprint.split_once(':')?;
        id.parse().ok()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m3_128" => Ok(Algorithm::Murmur3_128),
            "xxh3_128" => Ok(Algorithm::Xxh3_128),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Fingerprinter {
    algorithm: Algorithm,
}

impl Fingerprinter {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Consumes `source` to exhaustion and returns its tagged fingerprint.
    pub fn fingerprint<R: Read>(&self, source: R) -> io::Result<String> {
        let digest = match self.algorithm {
            Algorithm::Murmur3_128 => murmur3_digest(source)?,
            Algorithm::Xxh3_128 => xxh3_digest(source)?,
        };

        Ok(format!("{}:{}", self.algorithm.id(), STANDARD.encode(digest)))
    }
}

fn murmur3_digest<R: Read>(source: R) -> io::Result<[u8; 16]> {
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, source);
    let hash = murmur3::murmur3_x64_128(&mut reader, MURMUR3_SEED)?;

    // h1 sits in the low half and is emitted first, each half big-endian.
    let mut digest = [0u8; 16];
    digest[..8].copy_from_slice(&(hash as u64).to_be_bytes());
    digest[8..].copy_from_slice(&((hash >> 64) as u64).to_be_bytes());
    Ok(digest)
}

fn xxh3_digest<R: Read>(mut source: R) -> io::Result<[u8; 16]> {
    let mut hasher = xxhash3_128::Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.write(&buf[..n]);
    }

    Ok(hasher.finish_128().to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_murmur3_known_values() -> io::Result<()> {
        let fp = Fingerprinter::default();
        assert_eq!(
            "m3_128:AAAAAAAAAAAAAAAAAAAAAA==",
            fp.fingerprint(Cursor::new(b""))?
        );
        assert_eq!(
            "m3_128:y9ins0G9mwJbHpBqSK4dGQ==",
            fp.fingerprint(Cursor::new(b"hello"))?
        );
        assert_eq!(
            "m3_128:40u8e7wHG2x6QzypxJqTRw==",
            fp.fingerprint(Cursor::new(
                b"The quick brown fox jumps over the lazy dog"
            ))?
        );
        Ok(())
    }

    #[test]
    fn test_chunking_does_not_change_fingerprint() -> io::Result<()> {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 31 % 251) as u8).collect();

        for algorithm in [Algorithm::Murmur3_128, Algorithm::Xxh3_128] {
            let fp = Fingerprinter::new(algorithm);
            let whole = fp.fingerprint(Cursor::new(&data))?;
            for step in [1, 7, 16, 1000, CHUNK_SIZE + 3] {
                let chunked = fp.fingerprint(Trickle { data: &data, step })?;
                assert_eq!(whole, chunked, "{} with step {}", algorithm, step);
            }
        }
        Ok(())
    }

    #[test]
    fn test_single_byte_change_changes_fingerprint() -> io::Result<()> {
        let original = b"line one\nline two\n".to_vec();
        let mut edited = original.clone();
        edited[5] ^= 0x01;

        for algorithm in [Algorithm::Murmur3_128, Algorithm::Xxh3_128] {
            let fp = Fingerprinter::new(algorithm);
            assert_ne!(
                fp.fingerprint(Cursor::new(&original))?,
                fp.fingerprint(Cursor::new(&edited))?
            );
        }
        Ok(())
    }

    #[test]
    fn test_xxh3_is_tagged() -> io::Result<()> {
        let value = Fingerprinter::new(Algorithm::Xxh3_128).fingerprint(Cursor::new(b"hello"))?;
        assert!(value.starts_with("xxh3_128:"));
        assert_eq!(Some(Algorithm::Xxh3_128), Algorithm::of(&value));
        // 16 digest bytes encode to 24 base64 characters.
        assert_eq!("xxh3_128:".len() + 24, value.len());
        Ok(())
    }

    #[test]
    fn test_algorithm_of() {
        assert_eq!(
            Some(Algorithm::Murmur3_128),
            Algorithm::of("m3_128:AAAAAAAAAAAAAAAAAAAAAA==")
        );
        assert_eq!(None, Algorithm::of("sha256:abc"));
        assert_eq!(None, Algorithm::of(""));
        assert!(matches!(
            "md5".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm(name)) if name == "md5"
        ));
    }

    #[test]
    fn test_read_error_is_returned() {
        let err = Fingerprinter::default().fingerprint(Broken).unwrap_err();
        assert_eq!("disk on fire", err.to_string());

        let err = Fingerprinter::new(Algorithm::Xxh3_128)
            .fingerprint(Broken)
            .unwrap_err();
        assert_eq!("disk on fire", err.to_string());
    }
}
