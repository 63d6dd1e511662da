//! Analysis request and cache key derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An analysis request: a content-hashed image plus the user's prompt.
///
/// Two requests with the same image bytes and prompt produce the same
/// [`cache_key`](AnalysisRequest::cache_key) regardless of timestamp,
/// which is what makes the recipe cache content-addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// SHA-256 hex digest of the image byte stream.
    pub image_hash: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRequest {
    /// Build a request by hashing the image bytes.
    pub fn from_image(image: &[u8], prompt: impl Into<String>) -> Self {
        Self {
            image_hash: sha256_hex(image),
            prompt: prompt.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build a request from an already-computed image hash.
    pub fn from_hash(image_hash: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            image_hash: image_hash.into(),
            prompt: prompt.into(),
            timestamp: Utc::now(),
        }
    }

    /// Derive the cache key for this request.
    ///
    /// `sha256(image_hash + ":" + sha256(prompt))`, hex-encoded. The prompt
    /// is hashed separately so arbitrarily long prompts cannot construct
    /// colliding concatenations with crafted image hashes.
    pub fn cache_key(&self) -> String {
        let prompt_hash = sha256_hex(self.prompt.as_bytes());
        let mut hasher = Sha256::new();
        hasher.update(self.image_hash.as_bytes());
        hasher.update(b":");
        hasher.update(prompt_hash.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// SHA-256 hex digest of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
