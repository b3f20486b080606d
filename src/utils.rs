use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 128 characters, the maximum verifier length RFC 7636 allows.
pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

/// S256 challenge: base64url without padding of SHA-256(verifier).
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Anti-CSRF value sent with the authorization request and expected back on
/// the callback.
pub fn generate_state() -> String {
    random_alphanumeric(16)
}
