use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

const TOKEN_LEN: usize = 30;

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Tokens are only ever stored hashed.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

pub fn last_4(token: &str) -> String {
    let start = token.len().saturating_sub(4);
    token[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_alphanumeric() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn hash_is_stable_hex() {
        let h = hash_token("secret");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_token("secret"));
        assert_eq!(last_4("abcdef"), "cdef");
        assert_eq!(last_4("ab"), "ab");
    }
}
