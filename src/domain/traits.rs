// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CorpusLoader implements ArticleSource
//   - a fixture source in tests also implements ArticleSource
//   - the application layer only sees ArticleSource
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::article::Article;

// ─── ArticleSource ────────────────────────────────────────────────────────────
/// Any component that can produce the article corpus.
///
/// Implementations:
///   - CorpusLoader → walks the platform/topic/*.txt tree on disk
///   - in-memory fixtures in tests
pub trait ArticleSource {
    /// Load all available articles from this source.
    fn load_all(&self) -> Result<Vec<Article>>;
}

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// The tokenizer capability surface the pipeline depends on.
///
/// Implementations:
///   - HfTextEncoder → wraps a HuggingFace `tokenizers` Tokenizer
///   - deterministic fakes in dataset/trainer tests
///
/// Both operations must be deterministic: the same text always
/// encodes to the same id sequence.
pub trait TextEncoder {
    /// Convert text to token ids, without special tokens.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Convert token ids back to text, stripping special tokens.
    fn decode(&self, ids: &[u32]) -> Result<String>;
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Any component that can answer natural language questions.
///
/// Implementations:
///   - AskUseCase → runs the fine-tuned model's generation loop
pub trait QuestionAnswerer {
    /// Given a question string, return the generated answer text.
    fn answer(&self, question: &str) -> Result<String>;
}
