use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Checks `password` against a stored digest. Every byte is compared
/// whatever the first mismatch, so timing does not leak the prefix.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let computed = hash_password(password);
    computed.len() == digest.len()
        && computed
            .bytes()
            .zip(digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn verify_matches_only_the_same_password() {
        let digest = hash_password("password");
        assert!(verify_password("password", &digest));
        assert!(!verify_password("passwore", &digest));
        assert!(!verify_password("password", &digest[..63]));
        assert!(!verify_password("password", ""));
    }
}
