use sha2::{Digest, Sha256};

pub const DEFAULT_USERNAME: &str = "student";
/// SHA-256 of the default password, `learn123`.
const PASSWORD_SHA256: &str = "478cff657390f9bc8800ac47ec169f930ff64cab9c08207c8fa4ceb6d3917548";

pub const LOGIN_FAILED: &str = "Invalid credentials! Please try again.";

pub fn hash_password(pw: &str) -> String {
    let mut h = Sha256::new();
    h.update(pw.as_bytes());
    hex::encode(h.finalize())
}

pub fn verify_login(username: &str, pw: &str) -> bool {
    username.trim() == DEFAULT_USERNAME && hash_password(pw) == PASSWORD_SHA256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_stored_value() {
        assert_eq!(hash_password("learn123"), PASSWORD_SHA256);
    }

    #[test]
    fn only_the_fixed_pair_is_accepted() {
        assert!(verify_login("student", "learn123"));
        assert!(verify_login(" student ", "learn123"));
        assert!(!verify_login("student", "learn1234"));
        assert!(!verify_login("Student", "learn123"));
        assert!(!verify_login("", ""));
    }
}
