use sec_audit_rs::hashcrack::{self, Algorithm};

fn wordlist(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

// md5("password")
const MD5_PASSWORD: &str = "5f4dcc3b5aa765d61d8327deb882cf99";
// sha256("password")
const SHA256_PASSWORD: &str = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

#[tokio::test]
async fn cracks_known_md5() {
    let words = wordlist(&["letmein", "qwerty", "password", "hunter2"]);
    let finding = hashcrack::crack(MD5_PASSWORD, &words, Algorithm::Md5, None, 4)
        .await
        .expect("match found");
    assert_eq!(finding.plaintext, "password");
    assert_eq!(finding.line, 3);
}

#[tokio::test]
async fn cracks_known_sha256_with_auto_detected_algorithm() {
    let algo = hashcrack::detect_algorithm(SHA256_PASSWORD).expect("detectable");
    assert_eq!(algo, Algorithm::Sha256);

    let words = wordlist(&["password"]);
    let finding = hashcrack::crack(SHA256_PASSWORD, &words, algo, None, 2)
        .await
        .expect("match found");
    assert_eq!(finding.plaintext, "password");
}

#[tokio::test]
async fn hash_comparison_ignores_case() {
    let words = wordlist(&["password"]);
    let upper = MD5_PASSWORD.to_uppercase();
    let finding = hashcrack::crack(&upper, &words, Algorithm::Md5, None, 2)
        .await
        .expect("match found");
    assert_eq!(finding.plaintext, "password");
}

#[tokio::test]
async fn no_match_returns_none() {
    let words = wordlist(&["letmein", "qwerty"]);
    assert!(hashcrack::crack(MD5_PASSWORD, &words, Algorithm::Md5, None, 4)
        .await
        .is_none());
}

#[tokio::test]
async fn cracking_is_idempotent() {
    let words = wordlist(&["aaa", "bbb", "password", "ccc", "password"]);
    let first = hashcrack::crack(MD5_PASSWORD, &words, Algorithm::Md5, None, 4).await;
    let second = hashcrack::crack(MD5_PASSWORD, &words, Algorithm::Md5, None, 4).await;
    assert_eq!(first, second);
    // Duplicate candidates always resolve to the earliest matching line.
    assert_eq!(first.expect("match found").line, 3);
}

#[tokio::test]
async fn salted_crack_matches_salted_digest() {
    // md5("abcdef") with salt "abc" and candidate "def".
    let words = wordlist(&["xyz", "def"]);
    let finding = hashcrack::crack(
        "e80b5017098950fc58aad83c8c14978e",
        &words,
        Algorithm::Md5,
        Some("abc"),
        2,
    )
    .await
    .expect("match found");
    assert_eq!(finding.plaintext, "def");
}

#[test]
fn missing_wordlist_is_fatal() {
    let err = hashcrack::load_wordlist(std::path::Path::new("/nonexistent/rockyou.txt"));
    assert!(err.is_err());
}
