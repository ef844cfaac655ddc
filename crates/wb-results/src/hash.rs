//! Content hashing for build identity.

use sha2::{Digest, Sha256};
use wb_config::WellbeingConfig;

pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Identity of a build: raw extract hash, configuration and tool version.
pub fn compute_build_id(
    source_hash: &str,
    config: &WellbeingConfig,
    tool_version: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_hash.as_bytes());

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    hasher.update(tool_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let config = WellbeingConfig::default();
        let a = compute_build_id("abc", &config, "v1");
        let b = compute_build_id("abc", &config, "v1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let config = WellbeingConfig::default();
        let mut other = config.clone();
        other.transform.max_missing_fraction = 0.4;

        assert_ne!(
            compute_build_id("abc", &config, "v1"),
            compute_build_id("abd", &config, "v1")
        );
        assert_ne!(
            compute_build_id("abc", &config, "v1"),
            compute_build_id("abc", &other, "v1")
        );
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
