// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved in the model directory:
//   1. model.mpk           — all learned parameters
//   2. train_config.json   — run + architecture configuration
//   3. tokenizer.json      — written by the TokenizerStore
//
// Why save the config separately?
//   When loading for inference, we need to know the exact
//   model architecture (d_model, num_layers, etc.) to rebuild
//   the model before loading the weights into it.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::MaskedLmModel;

const MODEL_FILE: &str = "model";

/// Manages saving and loading of the trained model.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// True when the directory already holds saved weights —
    /// training then resumes from them instead of starting fresh.
    pub fn has_model(&self) -> bool {
        self.dir.join(format!("{MODEL_FILE}.mpk")).exists()
    }

    /// Save the model weights. The recorder adds the file extension.
    pub fn save_model<B: Backend>(&self, model: &MaskedLmModel<B>) -> Result<()> {
        let path = self.dir.join(MODEL_FILE);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save model to '{}'", path.display())
            })?;

        tracing::debug!("Saved model weights to '{}'", path.display());
        Ok(())
    }

    /// Load saved weights into a freshly built model.
    /// The model must have the architecture recorded in
    /// train_config.json or loading fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  MaskedLmModel<B>,
        device: &B::Device,
    ) -> Result<MaskedLmModel<B>> {
        let path = self.dir.join(MODEL_FILE);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model '{}'. Have you trained it first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    /// Called before training starts so `ask` can rebuild the
    /// exact model architecture later.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'ask'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_round_trip() {
        let tmp  = TempDir::new().unwrap();
        let ckpt = CheckpointManager::new(tmp.path());

        let mut cfg = TrainConfig::default();
        cfg.epochs = 7;
        cfg.max_length = 64;

        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();

        assert_eq!(loaded.epochs, 7);
        assert_eq!(loaded.max_length, 64);
        assert_eq!(loaded.vocab_size, cfg.vocab_size);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let tmp  = TempDir::new().unwrap();
        let ckpt = CheckpointManager::new(tmp.path());
        assert!(ckpt.load_config().is_err());
    }

    #[test]
    fn test_has_model_false_on_empty_dir() {
        let tmp  = TempDir::new().unwrap();
        let ckpt = CheckpointManager::new(tmp.path());
        assert!(!ckpt.has_model());
    }

    #[test]
    fn test_model_save_load_round_trip() {
        use crate::ml::model::MaskedLmConfig;
        type B = burn::backend::NdArray;

        let tmp    = TempDir::new().unwrap();
        let ckpt   = CheckpointManager::new(tmp.path());
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let model_cfg = MaskedLmConfig::new(128, 16, 16, 2, 1, 32, 0.0);
        let model: MaskedLmModel<B> = model_cfg.init(&device);

        ckpt.save_model(&model).unwrap();
        assert!(ckpt.has_model());

        let fresh: MaskedLmModel<B> = model_cfg.init(&device);
        let loaded = ckpt.load_model(fresh, &device);
        assert!(loaded.is_ok());
    }
}
