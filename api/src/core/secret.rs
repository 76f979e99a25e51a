use sha2::{Digest, Sha256};

/// Compares the raw `X-Gitlab-Token` bytes against the configured secret.
///
/// Both sides are hashed to fixed-size digests, which are then folded
/// without early exit, so timing depends on neither length nor content.
/// Header bytes are not required to be visible ASCII, so a UTF-8 secret
/// sent verbatim still matches. A missing header never matches.
pub fn token_matches(provided: Option<&[u8]>, expected: &[u8]) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    let a = Sha256::digest(provided);
    let b = Sha256::digest(expected);
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        assert!(token_matches(Some(b"T"), b"T"));
        assert!(!token_matches(Some(b"t"), b"T"));
        assert!(!token_matches(Some(b"T "), b"T"));
        assert!(!token_matches(Some(b""), b"T"));
        assert!(!token_matches(None, b"T"));
    }

    #[test]
    fn non_ascii_secret_matches_its_utf8_bytes() {
        let secret = "clave-ñ";
        assert!(token_matches(Some(secret.as_bytes()), secret.as_bytes()));
        assert!(!token_matches(Some("clave-n".as_bytes()), secret.as_bytes()));
    }
}
