// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — except the data
// layer's Dataset/Batcher impls, which exist for this one.
//
// What's in this layer:
//
//   model.rs     — The transformer encoder with a language-model
//                  head. Token + positional embeddings, multi-head
//                  self-attention with pad masking, GELU
//                  feed-forward blocks, layer norm, residuals, and
//                  a Linear projection to vocabulary logits. The
//                  masked-modeling loss lives next to the forward
//                  pass.
//
//   trainer.rs   — The epoch loop: forward pass, loss and token
//                  accuracy, backward pass, AdamW step, then a
//                  gradient-free validation sweep; four averaged
//                  metrics per epoch.
//
//   generator.rs — Greedy bounded generation with a no-repeat
//                  2-gram constraint, used by the ask flow.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Transformer encoder masked-LM architecture
pub mod model;

/// Full training loop with validation and metrics
pub mod trainer;

/// Greedy generation on top of a trained checkpoint
pub mod generator;
