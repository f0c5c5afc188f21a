// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs      — Saving and loading model weights
//                        Uses Burn's CompactRecorder to
//                        serialise model parameters to disk.
//                        Also saves/loads TrainConfig as JSON
//                        so inference can rebuild the model.
//
//   tokenizer_store.rs — Tokenizer persistence
//                        Builds a word-level Arabic vocabulary
//                        from the corpus if none exists, or loads
//                        a previously saved one. Ensures the same
//                        vocabulary is used for training and
//                        inference. Also adapts the HuggingFace
//                        Tokenizer to the TextEncoder seam.
//
//   metrics.rs         — Epoch metrics
//                        Four parallel loss/accuracy sequences
//                        plus a CSV sidecar for later analysis.
//
//   charts.rs          — Learning-curve rendering
//                        Two side-by-side character-grid line
//                        charts (loss and accuracy over epochs).
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here
//   prevents duplication and keeps other layers focused
//   on their core logic.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Epoch metrics history and CSV logger
pub mod metrics;

/// Character-grid learning-curve charts
pub mod charts;
