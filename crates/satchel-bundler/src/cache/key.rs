//! Content-addressed keys and bundle hashes using BLAKE3.

use std::path::Path;

use blake3::Hasher;
use satchel_config::BundleOptions;

use crate::error::Result;

/// Length in bytes of the truncated bundle hash (32 hex characters).
const BUNDLE_HASH_BYTES: usize = 16;

/// Compute the memoization key for one `generate_bundle` call.
///
/// The key covers the entry exactly as the caller passed it plus the full
/// serialized options, so any option change produces a different key.
pub fn compute_cache_key(entry: &Path, options: &BundleOptions) -> Result<String> {
    let mut hasher = Hasher::new();
    hasher.update(entry.to_string_lossy().as_bytes());
    // Separator so that entry/options boundaries cannot collide
    hasher.update(&[0]);
    hasher.update(options.to_json()?.as_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}

/// Hash of the final bundle text as 32 lowercase hex characters.
pub fn content_hash(code: &str) -> String {
    let hash = blake3::hash(code.as_bytes());
    hash.as_bytes()[..BUNDLE_HASH_BYTES]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_config::Target;

    #[test]
    fn test_cache_key_is_deterministic() {
        let options = BundleOptions::default();
        let a = compute_cache_key(Path::new("src/index.js"), &options).unwrap();
        let b = compute_cache_key(Path::new("src/index.js"), &options).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_cache_key_changes_with_inputs() {
        let options = BundleOptions::default();
        let base = compute_cache_key(Path::new("src/index.js"), &options).unwrap();

        let other_entry = compute_cache_key(Path::new("src/main.js"), &options).unwrap();
        let minified =
            compute_cache_key(Path::new("src/index.js"), &options.clone().with_minify(true)).unwrap();
        let server = compute_cache_key(
            Path::new("src/index.js"),
            &options.with_target(Target::Server),
        )
        .unwrap();

        assert_ne!(base, other_entry);
        assert_ne!(base, minified);
        assert_ne!(base, server);
    }

    #[test]
    fn test_content_hash_shape() {
        let hash = content_hash("console.log(1);");
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, content_hash("console.log(1);"));
        assert_ne!(hash, content_hash("console.log(2);"));
    }

    #[test]
    fn test_content_hash_matches_blake3_prefix() {
        let full = blake3::hash(b"abc").to_hex().to_string();
        assert_eq!(content_hash("abc"), full[..32]);
    }
}
