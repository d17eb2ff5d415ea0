use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ValueEnum;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use tokio_util::sync::CancellationToken;

use crate::probe::{run_session, session_progress_bar, ProbeOutcome};
use crate::types::CrackFinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

/// Map a hex digest length to the algorithm that produces it.
///
/// Ambiguous for algorithms sharing a digest length; callers override with an
/// explicit algorithm when the guess is wrong.
pub fn detect_algorithm(hash: &str) -> Option<Algorithm> {
    match hash.len() {
        32 => Some(Algorithm::Md5),
        40 => Some(Algorithm::Sha1),
        56 => Some(Algorithm::Sha224),
        64 => Some(Algorithm::Sha256),
        96 => Some(Algorithm::Sha384),
        128 => Some(Algorithm::Sha512),
        _ => None,
    }
}

/// Hex digest of `salt + word` (salt prepended when present).
pub fn hash_candidate(algo: Algorithm, word: &str, salt: Option<&str>) -> String {
    let input = match salt {
        Some(s) => format!("{s}{word}"),
        None => word.to_string(),
    };
    let bytes = input.as_bytes();
    match algo {
        Algorithm::Md5 => hex::encode(Md5::digest(bytes)),
        Algorithm::Sha1 => hex::encode(Sha1::digest(bytes)),
        Algorithm::Sha224 => hex::encode(Sha224::digest(bytes)),
        Algorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        Algorithm::Sha384 => hex::encode(Sha384::digest(bytes)),
        Algorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    }
}

/// Load wordlist candidates, one per line, tolerating non-UTF-8 bytes.
///
/// A missing wordlist is fatal before any cracking starts.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("wordlist not found: {}", path.display()))?;
    let mut words: Vec<String> = bytes
        .split(|&b| b == b'\n')
        .map(|line| String::from_utf8_lossy(line).trim().to_string())
        .collect();
    // Trailing newline produces one empty candidate; drop it.
    if words.last().is_some_and(|w| w.is_empty()) {
        words.pop();
    }
    Ok(words)
}

/// Try every wordlist candidate against one hash, stopping on the first match.
///
/// The first match by wordlist line always wins: dispatch follows input
/// order and every dispatched candidate runs to completion, so any line
/// earlier than the match that cancelled the session is also checked.
/// Repeated runs with the same inputs therefore return the same result.
pub async fn crack(
    hash: &str,
    words: &[String],
    algo: Algorithm,
    salt: Option<&str>,
    workers: usize,
) -> Option<CrackFinding> {
    let target = hash.to_ascii_lowercase();
    let hash_owned = hash.to_string();
    let salt_owned = salt.map(str::to_string);

    let items: Vec<(u64, String)> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (i as u64 + 1, w.clone()))
        .collect();

    let pb = session_progress_bar(items.len() as u64);
    let report = run_session(
        items,
        workers,
        CancellationToken::new(),
        Some(pb),
        move |(line, word)| {
            let target = target.clone();
            let hash = hash_owned.clone();
            let salt = salt_owned.clone();
            async move {
                if hash_candidate(algo, &word, salt.as_deref()) == target {
                    ProbeOutcome::Finding(CrackFinding {
                        hash,
                        plaintext: word,
                        line,
                    })
                } else {
                    ProbeOutcome::NoFinding
                }
            }
        },
        // First match stops further dispatch.
        |_| true,
    )
    .await;

    report.findings.into_iter().min_by_key(|f| f.line)
}

/// Hash a fixed word `iterations` times and return the hashes/sec rate.
pub fn benchmark(algo: Algorithm, iterations: u64) -> f64 {
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = hash_candidate(algo, "benchmark", None);
    }
    let elapsed = start.elapsed().as_secs_f64().max(f64::EPSILON);
    iterations as f64 / elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_length() {
        assert_eq!(
            detect_algorithm("5f4dcc3b5aa765d61d8327deb882cf99"),
            Some(Algorithm::Md5)
        );
        assert_eq!(
            detect_algorithm(
                "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
            ),
            Some(Algorithm::Sha256)
        );
        assert_eq!(detect_algorithm(&"a".repeat(40)), Some(Algorithm::Sha1));
        assert_eq!(detect_algorithm(&"a".repeat(56)), Some(Algorithm::Sha224));
        assert_eq!(detect_algorithm(&"a".repeat(96)), Some(Algorithm::Sha384));
        assert_eq!(detect_algorithm(&"a".repeat(128)), Some(Algorithm::Sha512));
        assert_eq!(detect_algorithm("deadbeef"), None);
    }

    #[test]
    fn known_digests() {
        assert_eq!(
            hash_candidate(Algorithm::Md5, "password", None),
            "5f4dcc3b5aa765d61d8327deb882cf99"
        );
        assert_eq!(
            hash_candidate(Algorithm::Sha1, "password", None),
            "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8"
        );
        assert_eq!(
            hash_candidate(Algorithm::Sha256, "password", None),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn salt_is_prepended() {
        // md5("abcdef"), with the salt supplying the "abc" prefix.
        assert_eq!(
            hash_candidate(Algorithm::Md5, "def", Some("abc")),
            "e80b5017098950fc58aad83c8c14978e"
        );
    }
}
