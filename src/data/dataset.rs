// ============================================================
// Layer 4 — Chat Dataset
// ============================================================
// Maps article rows to tokenized training samples on demand.
//
// Each access builds the (question, answer) pair for one row,
// encodes both sides, and assembles the masked-modeling input:
//
//   [CLS] question tokens [SEP] answer tokens [SEP] [PAD]...
//
// All three sequences are exactly `max_length` long, and the
// labels are a copy of the input ids — the model's objective is
// to reproduce every token of the pair. Encoding is fully
// deterministic: the same (row, encoder, max_length) always
// yields bit-identical samples.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Devlin et al. (2019) BERT — input format

use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::article::Article;
use crate::domain::qa_pair::QaPair;
use crate::domain::traits::TextEncoder;

// Special token ids, BERT convention. The TokenizerStore writes the
// same ids into every tokenizer.json it builds.
pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const CLS_ID: u32 = 101;
pub const SEP_ID: u32 = 102;
pub const MASK_ID: u32 = 103;

/// One fully tokenised and padded training sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub labels:         Vec<u32>,
}

/// Lazily tokenizing dataset over the article table.
/// Generic over the encoder so tests can substitute a fake.
pub struct ChatDataset<E> {
    rows:         Vec<Article>,
    encoder:      Arc<E>,
    max_length:   usize,
    answer_chars: usize,
}

impl<E: TextEncoder + Send + Sync> ChatDataset<E> {
    pub fn new(
        rows:         Vec<Article>,
        encoder:      Arc<E>,
        max_length:   usize,
        answer_chars: usize,
    ) -> Self {
        Self { rows, encoder, max_length, answer_chars }
    }

    /// Build the sample for one row. Fallible variant of `get` —
    /// encoder errors propagate instead of vanishing.
    pub fn sample(&self, index: usize) -> Result<ChatSample> {
        let row = self.rows.get(index)
            .with_context(|| format!("Row index {index} out of range"))?;

        let pair = QaPair::from_article(row, self.answer_chars);
        let question_ids = self.encoder.encode(&pair.question)?;
        let answer_ids   = self.encoder.encode(&pair.answer)?;

        // [CLS] question [SEP] answer [SEP]
        let mut input_ids = vec![CLS_ID];
        input_ids.extend_from_slice(&question_ids);
        input_ids.push(SEP_ID);
        input_ids.extend_from_slice(&answer_ids);
        input_ids.push(SEP_ID);

        // Token-level truncation to the fixed model width
        input_ids.truncate(self.max_length);

        // Attention mask: 1 for real tokens, 0 for padding
        let mut attention_mask = vec![1u32; input_ids.len()];

        while input_ids.len() < self.max_length {
            input_ids.push(PAD_ID);
            attention_mask.push(0);
        }

        // Masked-modeling setup: the model learns to reproduce
        // the input, so labels are a straight copy.
        let labels = input_ids.clone();

        Ok(ChatSample { input_ids, attention_mask, labels })
    }
}

impl<E: TextEncoder + Send + Sync> Dataset<ChatSample> for ChatDataset<E> {
    fn get(&self, index: usize) -> Option<ChatSample> {
        self.sample(index)
            .map_err(|e| tracing::error!("Cannot build sample {index}: {e}"))
            .ok()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    /// Deterministic fake encoder: one id per whitespace-separated
    /// word, derived from its bytes. Ids land above the special range.
    struct FakeEncoder;

    impl TextEncoder for FakeEncoder {
        fn encode(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text
                .split_whitespace()
                .map(|w| {
                    let sum: u32 = w.bytes().map(u32::from).sum();
                    200 + sum % 800
                })
                .collect())
        }

        fn decode(&self, ids: &[u32]) -> Result<String> {
            Ok(ids.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" "))
        }
    }

    fn dataset(rows: Vec<Article>, max_length: usize) -> ChatDataset<FakeEncoder> {
        ChatDataset::new(rows, Arc::new(FakeEncoder), max_length, 512)
    }

    fn short_row() -> Article {
        Article::new("منصة", "الرياضة", "خبر رياضي قصير")
    }

    fn long_row() -> Article {
        Article::new("منصة", "الاقتصاد", "كلمة ".repeat(600))
    }

    #[test]
    fn test_sequences_have_exact_fixed_length() {
        let ds = dataset(vec![short_row(), long_row()], 128);
        for idx in 0..ds.len() {
            let s = ds.get(idx).unwrap();
            assert_eq!(s.input_ids.len(), 128);
            assert_eq!(s.attention_mask.len(), 128);
            assert_eq!(s.labels.len(), 128);
        }
    }

    #[test]
    fn test_labels_equal_input_ids() {
        let ds = dataset(vec![short_row(), long_row()], 64);
        for idx in 0..ds.len() {
            let s = ds.get(idx).unwrap();
            assert_eq!(s.labels, s.input_ids);
        }
    }

    #[test]
    fn test_sample_starts_with_cls() {
        let ds = dataset(vec![short_row()], 32);
        let s = ds.get(0).unwrap();
        assert_eq!(s.input_ids[0], CLS_ID);
    }

    #[test]
    fn test_padding_is_masked_out() {
        let ds = dataset(vec![short_row()], 128);
        let s = ds.get(0).unwrap();
        // A short sample must end in padding
        assert_eq!(*s.input_ids.last().unwrap(), PAD_ID);
        assert_eq!(*s.attention_mask.last().unwrap(), 0);
        // Mask is 1 exactly where ids are real tokens
        let real = s.attention_mask.iter().filter(|&&m| m == 1).count();
        assert!(real > 0 && real < 128);
        for (id, m) in s.input_ids.iter().zip(&s.attention_mask) {
            if *m == 0 {
                assert_eq!(*id, PAD_ID);
            }
        }
    }

    #[test]
    fn test_long_content_is_truncated_not_rejected() {
        let ds = dataset(vec![long_row()], 16);
        let s = ds.get(0).unwrap();
        assert_eq!(s.input_ids.len(), 16);
        // Fully occupied, no padding
        assert!(s.attention_mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_same_index_is_bit_identical() {
        let ds = dataset(vec![short_row(), long_row()], 48);
        let a = ds.get(1).unwrap();
        let b = ds.get(1).unwrap();
        assert_eq!(a.input_ids, b.input_ids);
        assert_eq!(a.attention_mask, b.attention_mask);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn test_len_matches_row_count() {
        let ds = dataset(vec![short_row(), long_row(), short_row()], 32);
        assert_eq!(ds.len(), 3);
        assert!(ds.get(3).is_none());
    }
}
