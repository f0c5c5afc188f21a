// ============================================================
// Layer 4 — Chat Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ChatSample>
// into device-ready tensors.
//
// How batching works here:
//   Input:  Vec of N ChatSamples, each with sequences of length L
//   Output: ChatBatch with tensors of shape [N, L]
//
//   We flatten each field into one long Vec, then reshape:
//   [s1_t1, ..., s1_tL, s2_t1, ..., sN_tL] → [N, L]
//
// All sequences are already padded to the same length by the
// dataset, so no dynamic padding is needed at this stage.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ChatSample;

// ─── ChatBatch ────────────────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct ChatBatch<B: Backend> {
    /// Token id sequences — shape: [batch_size, max_length]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape: [batch_size, max_length]
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Target token ids — shape: [batch_size, max_length]
    /// Identical to input_ids in this masked-modeling setup.
    pub labels: Tensor<B, 2, Int>,
}

// ─── ChatBatcher ──────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct ChatBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ChatBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<ChatSample, ChatBatch<B>> for ChatBatcher<B> {
    fn batch(&self, items: Vec<ChatSample>) -> ChatBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len = items[0].input_ids.len();

        // Burn uses i32 for Int tensors, so each u32 field is
        // flattened and converted in one pass.
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let label_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.labels.iter().map(|&x| x as i32))
            .collect();

        // Tensor::from_ints creates a 1D tensor from a slice,
        // then .reshape() gives it the correct [batch, seq] shape.
        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device,
        ).reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device,
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            label_flat.as_slice(), &self.device,
        ).reshape([batch_size, seq_len]);

        ChatBatch { input_ids, attention_mask, labels }
    }
}
