// ============================================================
// Layer 4 — Content Preprocessor
// ============================================================
// Condenses raw article content before pair building.
//
// News articles in the corpus run to thousands of words, but
// only their opening carries the answer text we fine-tune on.
// Condensing does two things in one pass:
//   1. Collapses all whitespace runs (newlines, tabs, repeated
//      spaces) into single spaces
//   2. Caps the content at the first `max_words` words
//
// The later 512-character and max_length token cuts still apply;
// this step just keeps the table small and the text uniform.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor {
    /// Word cap applied to every article's content
    max_words: usize,
}

impl Preprocessor {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    /// Collapse whitespace and keep the first `max_words` words.
    /// split_whitespace() treats any Unicode whitespace run as one
    /// separator, so tabs and newlines disappear for free.
    pub fn condense(&self, text: &str) -> String {
        text.split_whitespace()
            .take(self.max_words)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// These tests run with `cargo test` and verify the condensing logic.
// Reference: Rust Book §11 (Writing Automated Tests)
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        let p = Preprocessor::new(100);
        assert_eq!(p.condense("خبر   عاجل\n\nمن\tالعاصمة"), "خبر عاجل من العاصمة");
    }

    #[test]
    fn test_caps_word_count() {
        let p = Preprocessor::new(3);
        assert_eq!(p.condense("واحد اثنان ثلاثة أربعة خمسة"), "واحد اثنان ثلاثة");
    }

    #[test]
    fn test_short_text_unchanged() {
        let p = Preprocessor::new(100);
        assert_eq!(p.condense("خبر قصير"), "خبر قصير");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new(100);
        assert_eq!(p.condense(""), "");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new(100);
        assert_eq!(p.condense("  نص  "), "نص");
    }
}
