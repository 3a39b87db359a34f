use serde::{Deserialize, Serialize};

/// One image in a post's gallery.
///
/// `priority` is the 1-based rank within the owning sequence. The operations
/// in [`crate::gallery`] keep it equal to position + 1 at all times, so for a
/// sequence of length N the priorities are exactly 1..=N with no gaps or
/// duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub priority: i64,
}
