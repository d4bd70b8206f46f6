//! Display-style tags for computed lookup columns.

use sha2::{Digest, Sha256};

/// Tones a computed column can be tagged with.
const LOOKUP_TONES: &[&str] = &[
    "amber", "azure", "coral", "jade", "lilac", "sand", "slate", "teal",
];

/// Deterministic style tag for a column name.
///
/// The same column always gets the same tag, across rows and runs.
pub fn style_tag(column: &str) -> String {
    let digest = Sha256::digest(column.as_bytes());
    let tone = LOOKUP_TONES[usize::from(digest[0]) % LOOKUP_TONES.len()];
    format!("lookup-{}", tone)
}
