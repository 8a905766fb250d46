//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Similarity ratio at or above which a password is considered too close to
/// one of the user's attributes.
const MAX_SIMILARITY: f64 = 0.7;

/// Frequently used passwords, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "123456", "123456789", "12345678", "password", "qwerty", "123123", "111111", "12345",
    "1234567890", "1234567", "qwerty123", "000000", "1q2w3e", "aa12345678", "abc123",
    "password1", "1234", "qwertyuiop", "123321", "password123", "1q2w3e4r5t", "iloveyou",
    "654321", "666666", "987654321", "123", "123456a", "qwe123", "1q2w3e4r", "7777777",
    "1qaz2wsx", "123qwe", "zxcvbnm", "121212", "asdasd", "a123456", "555555", "dragon",
    "112233", "123123123", "monkey", "11111111", "qazwsx", "159753", "asdfghjkl", "222222",
    "1234qwer", "qwerty1", "123654", "123abc", "asdfgh", "777777", "aaaaaa", "myspace1",
    "88888888", "fuckyou", "123456789a", "999999", "888888", "football", "princess",
    "sunshine", "letmein", "welcome", "welcome1", "admin", "admin123", "login", "master",
    "baseball", "shadow", "superman", "trustno1", "passw0rd", "starwars", "whatever",
    "charlie", "michael", "jennifer", "hello123", "freedom", "computer", "internet",
    "football1", "iloveyou1", "basketball", "michelle", "jordan23", "loveme", "hunter2",
    "changeme", "secret", "test1234", "qwerty12", "abcd1234", "q1w2e3r4", "zaq12wsx",
    "kpop1234", "saranghae", "bts12345", "blackpink", "army1234",
];

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check a candidate password against the strength policy.
///
/// Every failed rule contributes one message, so the caller can report them
/// all at once:
///
/// - at least [`MIN_PASSWORD_LENGTH`] characters
/// - not entirely numeric
/// - not a commonly used password
/// - not too similar to the username, the email, or any word within them
pub fn validate_password_strength(
    password: &str,
    username: &str,
    email: &str,
) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if let Some(attribute) = [("username", username), ("email address", email)]
        .into_iter()
        .find(|(_, value)| too_similar(password, value))
        .map(|(name, _)| name)
    {
        problems.push(format!("The password is too similar to the {attribute}."));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }

    let normalized = password.trim().to_lowercase();
    if COMMON_PASSWORDS.contains(&normalized.as_str()) {
        problems.push("This password is too common.".to_string());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Compare the password against the attribute as a whole and against each
/// of its word-separated parts.
fn too_similar(password: &str, attribute: &str) -> bool {
    let password = password.to_lowercase();
    let attribute = attribute.to_lowercase();
    let password_len = password.chars().count();

    attribute
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .chain(std::iter::once(attribute.as_str()))
        .filter(|part| !part.is_empty())
        .any(|part| {
            let part_len = part.chars().count();
            // A password that dwarfs the value cannot be "too similar" to it.
            let dwarfed = password_len >= 10 * part_len
                && (part_len as f64) < MAX_SIMILARITY / 2.0 * password_len as f64;
            !dwarfed && similarity_upper_bound(&password, part) >= MAX_SIMILARITY
        })
}

/// Ratio of shared characters (as multisets) to total length, `2M / T`.
///
/// This is an upper bound on the Ratcliff/Obershelp similarity of the two
/// strings and is the figure the similarity rule compares against.
fn similarity_upper_bound(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let mut available: std::collections::HashMap<char, usize> = std::collections::HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }
    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(n) = available.get_mut(&c) {
            if *n > 0 {
                *n -= 1;
                matches += 1;
            }
        }
    }
    2.0 * matches as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(validate_password_strength("Lightstick#2024", "yeji", "yeji@example.com").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let problems = validate_password_strength("Xy7#", "yeji", "yeji@example.com").unwrap_err();
        assert!(problems.iter().any(|p| p.contains("at least 8 characters")));
    }

    #[test]
    fn test_numeric_password_rejected() {
        let problems =
            validate_password_strength("90817263", "yeji", "yeji@example.com").unwrap_err();
        assert!(problems.iter().any(|p| p.contains("entirely numeric")));
    }

    #[test]
    fn test_common_password_rejected_case_insensitively() {
        let problems =
            validate_password_strength("PassWord123", "yeji", "yeji@example.com").unwrap_err();
        assert_eq!(problems, vec!["This password is too common.".to_string()]);
    }

    #[test]
    fn test_password_similar_to_username_rejected() {
        let problems =
            validate_password_strength("collector99", "collector9", "x@example.com").unwrap_err();
        assert!(problems[0].contains("username"));
    }

    #[test]
    fn test_password_similar_to_email_part_rejected() {
        let problems =
            validate_password_strength("yejihwang!", "midzy", "yejihwang@kpop.io").unwrap_err();
        assert!(problems[0].contains("email"));
    }

    #[test]
    fn test_multiple_problems_are_all_reported() {
        let problems = validate_password_strength("123456", "yeji", "yeji@example.com").unwrap_err();
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn test_similarity_upper_bound() {
        assert_eq!(similarity_upper_bound("abc", "abc"), 1.0);
        assert_eq!(similarity_upper_bound("abc", "xyz"), 0.0);
        assert_eq!(similarity_upper_bound("aab", "ab"), 0.8);
    }
}
