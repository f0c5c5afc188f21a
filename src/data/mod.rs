// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw corpus files
// all the way to device-ready tensor batches.
//
// The pipeline flows in this order:
//
//   platform/topic/*.txt
//       │
//       ▼
//   CorpusLoader      → walks the tree, reads UTF-8 articles,
//       │               applies the prefix cap
//       ▼
//   Preprocessor      → collapses whitespace, caps word count
//       │
//       ▼
//   ChatDataset       → builds (question, answer) pairs and
//       │               tokenizes them lazily per index
//       ▼
//   ChatBatcher       → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Walks the corpus tree and loads articles
pub mod corpus;

/// Condenses article content before pairing
pub mod preprocessor;

/// Implements Burn's Dataset trait for tokenized QA samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
