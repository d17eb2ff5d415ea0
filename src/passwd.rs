use once_cell::sync::Lazy;
use regex::Regex;

static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("valid regex"));
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid regex"));
static SPECIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("valid regex"));

/// Local demo breach list; stands in for a real breach corpus.
const BREACHED_PASSWORDS: &[&str] = &["123456", "password", "admin", "qwerty", "letmein", "focus"];

pub const DISCLAIMER: &str =
    "This result is based on a local test list and may not reflect real-world breach data.";

/// Check a password against the five weakness categories. An empty Vec means
/// no weakness was found.
pub fn check_password_strength(password: &str) -> Vec<&'static str> {
    let mut weaknesses = Vec::new();
    if password.len() < 8 {
        weaknesses.push("Too short");
    }
    if !LOWERCASE.is_match(password) {
        weaknesses.push("Missing lowercase");
    }
    if !UPPERCASE.is_match(password) {
        weaknesses.push("Missing uppercase");
    }
    if !DIGITS.is_match(password) {
        weaknesses.push("Missing digits");
    }
    if !SPECIAL.is_match(password) {
        weaknesses.push("Missing special char");
    }
    weaknesses
}

/// Case-insensitive lookup in the local breach list.
pub fn is_breached(password: &str) -> bool {
    let lower = password.to_lowercase();
    BREACHED_PASSWORDS.iter().any(|p| *p == lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_has_no_weaknesses() {
        assert!(check_password_strength("Abc12345!").is_empty());
    }

    #[test]
    fn short_lowercase_password_hits_every_other_category() {
        let weaknesses = check_password_strength("abc");
        assert_eq!(
            weaknesses,
            vec![
                "Too short",
                "Missing uppercase",
                "Missing digits",
                "Missing special char"
            ]
        );
    }

    #[test]
    fn empty_password_hits_all_five_categories() {
        assert_eq!(check_password_strength("").len(), 5);
    }

    #[test]
    fn each_category_detected_independently() {
        assert!(check_password_strength("ABC12345!").contains(&"Missing lowercase"));
        assert!(check_password_strength("abc12345!").contains(&"Missing uppercase"));
        assert!(check_password_strength("Abcdefgh!").contains(&"Missing digits"));
        assert!(check_password_strength("Abc12345").contains(&"Missing special char"));
        assert!(check_password_strength("Ab1!").contains(&"Too short"));
    }

    #[test]
    fn breach_lookup_is_case_insensitive() {
        assert!(is_breached("password"));
        assert!(is_breached("PassWord"));
        assert!(!is_breached("Abc12345!"));
    }
}
