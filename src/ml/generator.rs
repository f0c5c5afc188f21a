// ============================================================
// Layer 5 — Generation Helper
// ============================================================
// Greedy autoregressive decoding on top of the fine-tuned model.
//
// Given a free-text question:
//   1. encode it as [CLS] question [SEP]
//   2. repeatedly run the model and append the most probable
//      next token, skipping any token that would repeat a
//      2-gram already present in the sequence
//   3. stop at [SEP], at the length bound, or when every
//      candidate is banned
//   4. decode the whole sequence with special tokens stripped
//
// Greedy decoding with a single returned sequence makes the
// output deterministic for a given model and question.

use anyhow::Result;
use burn::prelude::*;
use std::collections::HashSet;

use crate::data::dataset::{CLS_ID, PAD_ID, SEP_ID};
use crate::domain::traits::TextEncoder;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{MaskedLmConfig, MaskedLmModel};

type InferenceBackend = burn::backend::Wgpu;

pub struct Generator {
    model:       MaskedLmModel<InferenceBackend>,
    max_seq_len: usize,
    device:      burn::backend::wgpu::WgpuDevice,
}

impl Generator {
    /// Rebuild the trained model from the saved config + weights.
    /// Dropout is forced to 0.0 — inference is deterministic.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;
        let model_cfg = MaskedLmConfig::new(
            cfg.vocab_size, cfg.max_length, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, 0.0,
        );
        let model: MaskedLmModel<InferenceBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, max_seq_len: cfg.max_length, device })
    }

    /// Generate an answer for `question`, bounded by `max_length`
    /// total tokens (prompt included) and by the model's own
    /// position-embedding width.
    pub fn generate<E: TextEncoder>(
        &self,
        question:   &str,
        encoder:    &E,
        max_length: usize,
    ) -> Result<String> {
        let limit = max_length.min(self.max_seq_len);

        // Prompt: [CLS] question [SEP]
        let mut ids: Vec<u32> = vec![CLS_ID];
        ids.extend(encoder.encode(question)?);
        ids.push(SEP_ID);
        ids.truncate(limit);

        while ids.len() < limit {
            let banned = banned_next_tokens(&ids);
            match self.next_token(&ids, &banned) {
                Some(next) => {
                    ids.push(next);
                    if next == SEP_ID {
                        break;
                    }
                }
                // Every candidate banned — nothing left to say
                None => break,
            }
        }

        encoder.decode(&ids)
    }

    /// One greedy decoding step: forward the whole prefix, take the
    /// argmax of the last position's logits over the allowed tokens.
    fn next_token(&self, ids: &[u32], banned: &HashSet<u32>) -> Option<u32> {
        let seq_len = ids.len();

        let input_flat: Vec<i32> = ids.iter().map(|&x| x as i32).collect();
        let input_ids = Tensor::<InferenceBackend, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device,
        ).unsqueeze::<2>();
        // The prefix has no padding, so the mask is all ones
        let attention_mask = Tensor::<InferenceBackend, 1, Int>::from_ints(
            vec![1i32; seq_len].as_slice(), &self.device,
        ).unsqueeze::<2>();

        let logits = self.model.forward(input_ids, attention_mask);
        let [_batch, _seq, vocab] = logits.dims();

        // Last position scores as a plain Vec<f32>
        let last: Vec<f32> = logits
            .slice([0..1, (seq_len - 1)..seq_len, 0..vocab])
            .reshape([vocab])
            .into_data()
            .value;

        let mut best: Option<(u32, f32)> = None;
        for (token, &score) in last.iter().enumerate() {
            let token = token as u32;
            // PAD and CLS are never valid continuations
            if token == PAD_ID || token == CLS_ID || banned.contains(&token) {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((token, score));
            }
        }
        best.map(|(token, _)| token)
    }
}

/// Tokens that would repeat an existing 2-gram if appended now.
/// For every earlier occurrence of the current last token, the
/// token that followed it is banned (no_repeat_ngram_size = 2).
fn banned_next_tokens(ids: &[u32]) -> HashSet<u32> {
    let mut banned = HashSet::new();
    let Some(&last) = ids.last() else {
        return banned;
    };
    for window in ids.windows(2) {
        if window[0] == last {
            banned.insert(window[1]);
        }
    }
    banned
}
