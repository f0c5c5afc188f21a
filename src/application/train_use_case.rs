// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full fine-tuning pipeline in order:
//
//   Step 1: Load the article corpus     (Layer 4 - data)
//   Step 2: Condense article content    (Layer 4 - data)
//   Step 3: Build / load tokenizer      (Layer 6 - infra)
//   Step 4: Split train/validation      (Layer 4 - data)
//   Step 5: Build datasets              (Layer 4 - data)
//   Step 6: Save config                 (Layer 6 - infra)
//   Step 7: Run training loop           (Layer 5 - ml)
//   Step 8: Render learning curves      (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

use crate::data::{
    corpus::CorpusLoader,
    dataset::ChatDataset,
    preprocessor::Preprocessor,
    splitter::split_train_val,
};
use crate::domain::article::Article;
use crate::domain::qa_pair::QaPair;
use crate::domain::traits::ArticleSource;
use crate::infra::{
    charts::render_learning_curves,
    checkpoint::CheckpointManager,
    tokenizer_store::{HfTextEncoder, TokenizerStore},
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs for a training run, both pipeline and architecture.
// Serialisable so it can be saved to disk and reloaded for
// inference — `ask` rebuilds the model from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_dir:     String,
    pub model_dir:      String,
    /// Fixed token width of every training example
    pub max_length:     usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    /// Prefix cap on the article table
    pub max_articles:   usize,
    /// Character cap on the answer side of each pair
    pub answer_chars:   usize,
    /// Word cap applied to article content before pairing
    pub content_words:  usize,
    pub train_fraction: f64,
    pub seed:           u64,
    pub d_model:        usize,
    pub num_heads:      usize,
    pub num_layers:     usize,
    pub d_ff:           usize,
    pub dropout:        f64,
    pub vocab_size:     usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_dir:     "ANAD-Arabic-News-Article-Dataset".to_string(),
            model_dir:      "arabic_chatbot_model".to_string(),
            max_length:     128,
            batch_size:     32,
            epochs:         2,
            lr:             5e-5,
            max_articles:   49_000,
            answer_chars:   512,
            content_words:  100,
            train_fraction: 0.8,
            seed:           42,
            d_model:        256,
            num_heads:      8,
            num_layers:     6,
            d_ff:           1024,
            dropout:        0.1,
            vocab_size:     30_522,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    /// Returns the rendered learning curves so the CLI layer can
    /// decide how to display them.
    pub fn execute(&self) -> Result<String> {
        let cfg = &self.config;

        // ── Step 1: Load the article corpus ──────────────────────────────────
        // CorpusLoader walks platform/topic/*.txt and applies the
        // prefix cap.
        tracing::info!("Loading corpus from '{}'", cfg.corpus_dir);
        let loader   = CorpusLoader::new(&cfg.corpus_dir, cfg.max_articles);
        let articles = loader.load_all()?;
        tracing::info!("Loaded {} articles", articles.len());

        // ── Step 2: Condense article content ──────────────────────────────────
        // Collapse whitespace and keep the opening words; the rest
        // of each article never reaches the model anyway.
        let preprocessor = Preprocessor::new(cfg.content_words);
        let rows: Vec<Article> = articles
            .into_iter()
            .map(|a| {
                let content = preprocessor.condense(&a.content);
                Article { content, ..a }
            })
            .collect();

        // ── Step 3: Build / load tokenizer ────────────────────────────────────
        // The vocabulary must cover both the answers (article
        // content) and the templated questions (topic names).
        let mut texts: Vec<String> = rows.iter().map(|a| a.content.clone()).collect();
        texts.extend(rows.iter().map(|a| QaPair::from_article(a, cfg.answer_chars).question));

        let tok_store = TokenizerStore::new(&cfg.model_dir);
        let tokenizer = tok_store.load_or_build(&texts, cfg.vocab_size)?;
        let encoder   = Arc::new(HfTextEncoder::new(tokenizer));

        // ── Step 4: Train / validation split ──────────────────────────────────
        // Seeded shuffle so the same run is reproducible
        let (train_rows, val_rows) = split_train_val(rows, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_rows.len(),
            val_rows.len()
        );

        // ── Step 5: Build Burn datasets ───────────────────────────────────────
        // ChatDataset tokenizes lazily: each access builds the
        // (question, answer) pair and encodes it on the spot.
        let train_dataset = ChatDataset::new(
            train_rows, Arc::clone(&encoder), cfg.max_length, cfg.answer_chars,
        );
        let val_dataset = ChatDataset::new(
            val_rows, Arc::clone(&encoder), cfg.max_length, cfg.answer_chars,
        );

        // ── Step 6: Save config for inference ─────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.model_dir);
        ckpt_manager.save_config(cfg)?;

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        let history = run_training(cfg, train_dataset, val_dataset, &ckpt_manager)?;

        // ── Step 8: Render learning curves ────────────────────────────────────
        let curves = render_learning_curves(&history);

        let curves_path = Path::new(&cfg.model_dir).join("learning_curves.txt");
        std::fs::write(&curves_path, &curves)
            .with_context(|| format!("Cannot write '{}'", curves_path.display()))?;
        tracing::info!("Learning curves written to '{}'", curves_path.display());

        Ok(curves)
    }
}
