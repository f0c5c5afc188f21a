// ============================================================
// Layer 3 — Article Domain Type
// ============================================================
// Represents a single news article loaded from the corpus.
// The ANAD corpus is organised as platform/topic/article.txt,
// so every article carries the platform and topic it was
// discovered under in addition to its full text content.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One raw news article from the corpus tree.
/// Created once during the corpus walk and never mutated
/// afterwards — downstream steps derive new values instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// First-level directory name (the publishing platform)
    pub platform: String,

    /// Second-level directory name (the article's topic)
    pub topic: String,

    /// The full UTF-8 text content of the article file
    pub content: String,
}

impl Article {
    /// Create a new Article.
    /// Uses impl Into<String> so callers can pass &str or String —
    /// this is idiomatic Rust for flexible string arguments.
    pub fn new(
        platform: impl Into<String>,
        topic: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            topic:    topic.into(),
            content:  content.into(),
        }
    }
}
