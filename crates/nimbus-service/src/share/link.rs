//! Share link token generation.

use rand::RngCore;

/// Random bytes per token; hex-encoded, so tokens are twice this long.
const TOKEN_BYTES: usize = 32;

/// Generates opaque bearer tokens for share links.
#[derive(Debug, Clone, Default)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// A fresh token from the thread-local CSPRNG.
    pub fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let link = LinkService::new();
        let a = link.generate_token();
        let b = link.generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
