// ============================================================
// Layer 3 — QaPair Domain Type
// ============================================================
// A derived (question, answer) pair built from one Article.
//
// The corpus carries no labelled questions, so the question is
// synthesised from the topic with a fixed Arabic interrogative
// template, and the answer is the article content capped at a
// fixed number of characters. Both steps are deterministic:
// the same article always yields the same pair.
//
// Example:
//   topic   = "الرياضة"
//   question = "ماذا تعرف عن الرياضة؟"   ("What do you know about sports?")
//   answer   = first 512 characters of the article
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

use crate::domain::article::Article;

/// The fixed interrogative template prefix. The topic is appended
/// verbatim, followed by the Arabic question mark.
pub const QUESTION_PREFIX: &str = "ماذا تعرف عن ";

/// A (question, answer) training pair in domain terms.
/// Never stored — built on demand from an Article row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPair {
    /// Templated question: prefix + topic + "؟"
    pub question: String,

    /// Article content truncated to a fixed character cap.
    /// Character truncation, not token truncation — a second,
    /// token-level cut to max_length happens during encoding.
    pub answer: String,
}

impl QaPair {
    /// Build the pair for one article. `answer_chars` is the
    /// character cap applied to the content (counted in Unicode
    /// scalar values, so Arabic text is never split mid-character).
    pub fn from_article(article: &Article, answer_chars: usize) -> Self {
        let question = format!("{}{}؟", QUESTION_PREFIX, article.topic);
        let answer: String = article.content.chars().take(answer_chars).collect();
        Self { question, answer }
    }
}
