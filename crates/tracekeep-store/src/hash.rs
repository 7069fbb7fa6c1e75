use sha2::{Digest, Sha256};

/// SHA-256 of `content`, lowercase hex
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
