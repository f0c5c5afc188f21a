// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and AdamW.
//
// Each epoch runs two phases:
//   - train:      shuffled batches, forward + loss + accuracy,
//                 backward, one optimizer step per batch
//   - validation: model.valid() on the inner backend, fixed batch
//                 order, same statistics, no gradient work
//
// Per-batch token accuracy is the fraction of positions where the
// argmax prediction equals the label — including padding positions,
// which matches how the metric was historically computed here and
// overstates accuracy once the model learns to echo PAD.
//
// Key Burn insight:
//   - Training uses Autodiff<Wgpu> for gradients
//   - model.valid() returns the model on the inner backend (Wgpu)
//   - the validation batcher must also use the inner backend
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ChatBatcher, dataset::ChatDataset};
use crate::domain::traits::TextEncoder;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsHistory, MetricsLogger};
use crate::ml::model::{MaskedLmConfig, MaskedLmModel};

type TrainingBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Wgpu entry point: build (or resume) the model, run the epoch
/// loop, persist the final weights and the metrics CSV.
pub fn run_training<E>(
    cfg:           &TrainConfig,
    train_dataset: ChatDataset<E>,
    val_dataset:   ChatDataset<E>,
    ckpt_manager:  &CheckpointManager,
) -> Result<MetricsHistory>
where
    E: TextEncoder + Send + Sync + 'static,
{
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    let model_cfg = MaskedLmConfig::new(
        cfg.vocab_size, cfg.max_length, cfg.d_model,
        cfg.num_heads, cfg.num_layers, cfg.d_ff, cfg.dropout,
    );
    let mut model: MaskedLmModel<TrainingBackend> = model_cfg.init(&device);

    // Fine-tuning: continue from existing weights when the model
    // directory already holds a checkpoint.
    if ckpt_manager.has_model() {
        tracing::info!("Resuming from existing checkpoint");
        model = ckpt_manager.load_model(model, &device)?;
    }

    let (model, history) = train_loop(cfg, model, train_dataset, val_dataset, device)?;

    ckpt_manager.save_model(&model)?;
    tracing::info!("Final model saved");

    let logger = MetricsLogger::new(&cfg.model_dir)?;
    for m in history.epochs() {
        logger.log(&m)?;
    }

    Ok(history)
}

/// Backend-generic epoch loop. Kept separate from the Wgpu entry
/// point so it can run on the NdArray backend in tests.
pub fn train_loop<B, E>(
    cfg:           &TrainConfig,
    mut model:     MaskedLmModel<B>,
    train_dataset: ChatDataset<E>,
    val_dataset:   ChatDataset<E>,
    device:        B::Device,
) -> Result<(MaskedLmModel<B>, MetricsHistory)>
where
    B: AutodiffBackend,
    E: TextEncoder + Send + Sync + 'static,
{
    // ── AdamW optimizer ───────────────────────────────────────────────────────
    // Decoupled weight decay; one step per batch. The functional
    // optimizer API consumes the gradients of exactly one backward
    // pass, so nothing leaks between batches.
    let optim_cfg = AdamWConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = ChatBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — fixed order, no autodiff) ──────
    let val_batcher = ChatBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut history = MetricsHistory::new();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_acc_sum  = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, logits) = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels.clone(),
            );

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_acc_sum  += token_accuracy(logits, batch.labels);
            train_batches  += 1;

            // Backward pass + AdamW update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = average(train_loss_sum, train_batches);
        let avg_train_acc  = average(train_acc_sum,  train_batches);

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → MaskedLmModel<B::InnerBackend>
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_acc_sum  = 0.0f64;
        let mut val_batches  = 0usize;

        for batch in val_loader.iter() {
            let (loss, logits) = model_valid.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels.clone(),
            );

            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_acc_sum  += token_accuracy(logits, batch.labels);
            val_batches  += 1;
        }

        let avg_val_loss = average(val_loss_sum, val_batches);
        let avg_val_acc  = average(val_acc_sum,  val_batches);

        // ── Epoch end: record + report ────────────────────────────────────────
        history.record(EpochMetrics::new(
            epoch, avg_train_loss, avg_train_acc, avg_val_loss, avg_val_acc,
        ));

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} train_acc={:.4} | val_loss={:.4} val_acc={:.4}",
            epoch, cfg.epochs, avg_train_loss, avg_train_acc, avg_val_loss, avg_val_acc,
        );
    }

    tracing::info!("Training complete!");
    Ok((model, history))
}

/// Fraction of positions where the argmax prediction equals the
/// label, over every position in the batch (padding included).
fn token_accuracy<B: Backend>(logits: Tensor<B, 3>, labels: Tensor<B, 2, Int>) -> f64 {
    let [batch_size, seq_len, _vocab] = logits.dims();

    // argmax over the vocab axis gives [batch, seq, 1]
    let predictions = logits.argmax(2).reshape([batch_size, seq_len]);

    let correct: i64 = predictions
        .equal(labels)
        .int().sum().into_scalar().elem::<i64>();

    correct as f64 / (batch_size * seq_len) as f64
}

fn average(sum: f64, batches: usize) -> f64 {
    if batches > 0 { sum / batches as f64 } else { f64::NAN }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::splitter::split_train_val;
    use crate::domain::article::Article;
    use std::sync::Arc;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    /// Word-level fake with ids confined to [104, 124) so a tiny
    /// vocabulary covers them alongside the special tokens.
    struct TinyEncoder;

    impl TextEncoder for TinyEncoder {
        fn encode(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text
                .split_whitespace()
                .map(|w| {
                    let sum: u32 = w.bytes().map(u32::from).sum();
                    104 + sum % 20
                })
                .collect())
        }

        fn decode(&self, ids: &[u32]) -> Result<String> {
            Ok(ids.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" "))
        }
    }

    fn tiny_config() -> TrainConfig {
        TrainConfig {
            max_length: 16,
            batch_size: 2,
            epochs:     1,
            lr:         1e-3,
            vocab_size: 128,
            d_model:    16,
            num_heads:  2,
            num_layers: 1,
            d_ff:       32,
            dropout:    0.0,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_one_epoch_on_tiny_corpus() {
        let cfg = tiny_config();

        // Ten synthetic sports articles with short content
        let rows: Vec<Article> = (0..10)
            .map(|i| Article::new("منصة", "الرياضة", format!("خبر رياضي رقم {i}")))
            .collect();
        let (train_rows, val_rows) = split_train_val(rows, 0.8, cfg.seed);

        let encoder = Arc::new(TinyEncoder);
        let train_ds = ChatDataset::new(train_rows, Arc::clone(&encoder), cfg.max_length, cfg.answer_chars);
        let val_ds   = ChatDataset::new(val_rows,   Arc::clone(&encoder), cfg.max_length, cfg.answer_chars);

        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model_cfg = MaskedLmConfig::new(
            cfg.vocab_size, cfg.max_length, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, cfg.dropout,
        );
        let model: MaskedLmModel<TestBackend> = model_cfg.init(&device);

        let (_model, history) = train_loop(&cfg, model, train_ds, val_ds, device).unwrap();

        // Exactly one entry per metrics sequence after one epoch
        assert_eq!(history.len(), 1);
        let m = &history.epochs()[0];
        assert!(m.train_loss.is_finite() && m.train_loss >= 0.0);
        assert!(m.val_loss.is_finite() && m.val_loss >= 0.0);
        assert!((0.0..=1.0).contains(&m.train_accuracy));
        assert!((0.0..=1.0).contains(&m.val_accuracy));
    }

    #[test]
    fn test_metrics_sequence_matches_epoch_count() {
        let mut cfg = tiny_config();
        cfg.epochs = 2;

        let rows: Vec<Article> = (0..6)
            .map(|i| Article::new("منصة", "التقنية", format!("مقال {i}")))
            .collect();
        let (train_rows, val_rows) = split_train_val(rows, 0.8, cfg.seed);

        let encoder = Arc::new(TinyEncoder);
        let train_ds = ChatDataset::new(train_rows, Arc::clone(&encoder), cfg.max_length, cfg.answer_chars);
        let val_ds   = ChatDataset::new(val_rows,   Arc::clone(&encoder), cfg.max_length, cfg.answer_chars);

        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model_cfg = MaskedLmConfig::new(
            cfg.vocab_size, cfg.max_length, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, cfg.dropout,
        );
        let model: MaskedLmModel<TestBackend> = model_cfg.init(&device);

        let (_model, history) = train_loop(&cfg, model, train_ds, val_ds, device).unwrap();
        assert_eq!(history.len(), 2);
    }
}
