//! Random per-run window class name.
//!
//! The terminal is started with this tag as its X class name so the window
//! search only ever matches the window this run created, even with other
//! terminals (or other termshot runs) on the same display.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use std::fmt;

/// Bytes of randomness behind a tag
pub const TAG_ENTROPY_BYTES: usize = 6;

/// Alphanumeric window class tag, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTag(String);

impl ClassTag {
    /// Generate a fresh random tag
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        loop {
            let mut bytes = [0u8; TAG_ENTROPY_BYTES];
            rng.fill(&mut bytes);
            if let Some(tag) = Self::from_bytes(&bytes) {
                return tag;
            }
        }
    }

    /// Base64-encode `bytes` and keep only ASCII alphanumerics.
    ///
    /// Returns `None` when nothing survives the filter.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let tag: String = STANDARD
            .encode(bytes)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if tag.is_empty() { None } else { Some(Self(tag)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_bytes_filters_symbols() {
        // 0xfb 0xff 0xbf encodes to "+/+/"
        assert_eq!(ClassTag::from_bytes(&[0xfb, 0xff, 0xbf]), None);

        let tag = ClassTag::from_bytes(b"termsh").unwrap();
        assert_eq!(tag.as_str(), "dGVybXNo");
    }

    #[test]
    fn test_generated_tag_is_alphanumeric() {
        for _ in 0..100 {
            let tag = ClassTag::generate();
            assert!(!tag.as_str().is_empty());
            assert!(tag.as_str().len() <= 8);
            assert!(tag.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generated_tags_do_not_collide() {
        let tags: HashSet<ClassTag> = (0..1000).map(|_| ClassTag::generate()).collect();
        assert_eq!(tags.len(), 1000);
    }
}
