use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Returns (raw token, sha256 hex). Only the hash is stored; the raw token
/// goes out in the invite email and comes back on acceptance.
pub fn generate_invite_token() -> (String, String) {
    let token = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect::<String>();

    let hash = hash_token(&token);
    (token, hash)
}

pub fn hash_token(val: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(val.as_bytes());

    format!("{:x}", hasher.finalize())
}
