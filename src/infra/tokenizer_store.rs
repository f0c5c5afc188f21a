// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Manages tokenizer building, saving, and loading.
//
// When the model directory already holds a tokenizer.json it is
// loaded as-is, so training and inference always share one
// vocabulary. Otherwise a word-level Arabic vocabulary is built
// from the corpus and written in the HuggingFace tokenizer JSON
// format, which Tokenizer::from_file() reads back directly —
// this sidesteps the train_from_files ModelWrapper type mismatch
// in tokenizers 0.15 entirely.
//
// Arabic has no letter case and its diacritics are meaningful,
// so the normalizer neither lowercases nor strips accents.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::data::dataset::{CLS_ID, MASK_ID, PAD_ID, SEP_ID, UNK_ID};
use crate::domain::traits::TextEncoder;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load existing tokenizer or build a new one from texts
    pub fn load_or_build(
        &self,
        texts:      &[String],
        vocab_size: usize,
    ) -> Result<Tokenizer> {
        let tok_path = self.dir.join("tokenizer.json");
        if tok_path.exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    /// Build a word-level vocabulary from corpus texts and write a
    /// valid tokenizer JSON directly.
    fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir).ok();

        // ── Step 1: Build vocabulary from word frequencies ────────────────────
        use std::collections::HashMap;
        let mut freq: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for word in text.split_whitespace() {
                // Strip punctuation from edges; is_alphanumeric() is
                // Unicode-aware, so Arabic letters survive intact.
                let w = word.trim_matches(|c: char| !c.is_alphanumeric());
                if !w.is_empty() {
                    *freq.entry(w.to_string()).or_insert(0) += 1;
                }
            }
        }

        // Sort by frequency descending, take top vocab_size - 5
        // (reserve 5 slots for special tokens)
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let max_words = vocab_size.saturating_sub(5);
        words.truncate(max_words);

        // ── Step 2: Build vocab JSON ──────────────────────────────────────────
        // Special tokens get fixed ids matching BERT convention
        let mut vocab = serde_json::json!({
            "[PAD]":  PAD_ID,
            "[UNK]":  UNK_ID,
            "[CLS]":  CLS_ID,
            "[SEP]":  SEP_ID,
            "[MASK]": MASK_ID,
        });

        let mut next_id = (MASK_ID + 1) as usize;
        for (word, _) in &words {
            // Skip if already a special token
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        // This format is what Tokenizer::from_file() expects
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PAD_ID,  "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": UNK_ID,  "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": CLS_ID,  "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": SEP_ID,  "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": MASK_ID, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": false,
                "lowercase": false
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.dir.join("tokenizer.json");
        std::fs::write(
            &tok_path,
            serde_json::to_string_pretty(&tokenizer_json)?
        ).with_context(|| "Cannot write tokenizer JSON")?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            next_id,
            tok_path.display()
        );

        // Load back as a proper Tokenizer instance
        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow::anyhow!("Cannot reload tokenizer: {e}"))
    }
}

// ─── HfTextEncoder ────────────────────────────────────────────────────────────
/// Adapts the HuggingFace Tokenizer to the domain TextEncoder
/// seam, so the dataset and generator never see tokenizers types.
pub struct HfTextEncoder {
    inner: Tokenizer,
}

impl HfTextEncoder {
    pub fn new(inner: Tokenizer) -> Self {
        Self { inner }
    }
}

impl TextEncoder for HfTextEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self.inner.encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(enc.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner.decode(ids, true)
            .map_err(|e| anyhow::anyhow!("Decode error: {e}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn arabic_texts() -> Vec<String> {
        vec![
            "ماذا تعرف عن الرياضة".to_string(),
            "الرياضة مفيدة للصحة والجسم".to_string(),
            "الاقتصاد العالمي في نمو".to_string(),
        ]
    }

    #[test]
    fn test_build_then_encode_known_words() {
        let tmp = TempDir::new().unwrap();
        let store = TokenizerStore::new(tmp.path());
        let tok = store.load_or_build(&arabic_texts(), 1000).unwrap();
        let encoder = HfTextEncoder::new(tok);

        let ids = encoder.encode("الرياضة مفيدة").unwrap();
        assert_eq!(ids.len(), 2);
        // Corpus words never map to [UNK]
        assert!(ids.iter().all(|&id| id != UNK_ID));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let store = TokenizerStore::new(tmp.path());
        let tok = store.load_or_build(&arabic_texts(), 1000).unwrap();
        let encoder = HfTextEncoder::new(tok);

        let a = encoder.encode("الاقتصاد العالمي").unwrap();
        let b = encoder.encode("الاقتصاد العالمي").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_word_maps_to_unk() {
        let tmp = TempDir::new().unwrap();
        let store = TokenizerStore::new(tmp.path());
        let tok = store.load_or_build(&arabic_texts(), 1000).unwrap();
        let encoder = HfTextEncoder::new(tok);

        let ids = encoder.encode("كلمةغيرموجودة").unwrap();
        assert_eq!(ids, vec![UNK_ID]);
    }

    #[test]
    fn test_decode_strips_special_tokens() {
        let tmp = TempDir::new().unwrap();
        let store = TokenizerStore::new(tmp.path());
        let tok = store.load_or_build(&arabic_texts(), 1000).unwrap();
        let encoder = HfTextEncoder::new(tok);

        let mut ids = vec![CLS_ID];
        ids.extend(encoder.encode("الرياضة مفيدة").unwrap());
        ids.push(SEP_ID);

        let text = encoder.decode(&ids).unwrap();
        assert!(!text.contains("[CLS]"));
        assert!(!text.contains("[SEP]"));
        assert!(text.contains("الرياضة"));
    }

    #[test]
    fn test_reload_reuses_saved_vocabulary() {
        let tmp = TempDir::new().unwrap();
        let store = TokenizerStore::new(tmp.path());
        let tok_a = store.load_or_build(&arabic_texts(), 1000).unwrap();
        let ids_a = HfTextEncoder::new(tok_a).encode("الرياضة").unwrap();

        // Second call loads the saved JSON instead of rebuilding
        let tok_b = store.load_or_build(&[], 1000).unwrap();
        let ids_b = HfTextEncoder::new(tok_b).encode("الرياضة").unwrap();
        assert_eq!(ids_a, ids_b);
    }
}
