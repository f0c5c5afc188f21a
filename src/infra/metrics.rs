// ============================================================
// Layer 6 — Metrics History and CSV Logger
// ============================================================
// Records one row of scalar metrics per completed epoch.
//
// Metrics recorded per epoch:
//   - epoch:          the epoch number (1, 2, 3, ...)
//   - train_loss:     average MLM cross-entropy on the training set
//   - train_accuracy: average per-batch token accuracy (training)
//   - val_loss:       average MLM cross-entropy on the validation set
//   - val_accuracy:   average per-batch token accuracy (validation)
//
// The history holds four parallel, append-only sequences — after
// a successful run each has exactly as many entries as there were
// epochs. The CSV sidecar (metrics.csv in the model directory)
// makes the learning curves easy to open in a spreadsheet.
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If val_loss rises while train_loss falls → overfitting
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Average token accuracy over all training batches.
    /// Range: [0.0, 1.0]; padding positions are counted.
    pub train_accuracy: f64,

    /// Average cross-entropy loss on the validation set.
    /// Should track train_loss — divergence indicates overfitting.
    pub val_loss: f64,

    /// Average token accuracy on the validation set
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:          usize,
        train_loss:     f64,
        train_accuracy: f64,
        val_loss:       f64,
        val_accuracy:   f64,
    ) -> Self {
        Self { epoch, train_loss, train_accuracy, val_loss, val_accuracy }
    }
}

// ─── MetricsHistory ───────────────────────────────────────────────────────────
/// Four parallel epoch-indexed sequences, one entry appended per
/// completed epoch. Pure accumulation — never mutated after append.
#[derive(Debug, Clone, Default)]
pub struct MetricsHistory {
    train_loss:     Vec<f64>,
    train_accuracy: Vec<f64>,
    val_loss:       Vec<f64>,
    val_accuracy:   Vec<f64>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one epoch's metrics to all four sequences at once,
    /// so they can never drift out of step.
    pub fn record(&mut self, m: EpochMetrics) {
        self.train_loss.push(m.train_loss);
        self.train_accuracy.push(m.train_accuracy);
        self.val_loss.push(m.val_loss);
        self.val_accuracy.push(m.val_accuracy);
    }

    /// Number of completed epochs
    pub fn len(&self) -> usize {
        self.train_loss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train_loss.is_empty()
    }

    pub fn train_loss(&self) -> &[f64]     { &self.train_loss }
    pub fn train_accuracy(&self) -> &[f64] { &self.train_accuracy }
    pub fn val_loss(&self) -> &[f64]       { &self.val_loss }
    pub fn val_accuracy(&self) -> &[f64]   { &self.val_accuracy }

    /// Reassemble per-epoch rows (epoch numbers start at 1)
    pub fn epochs(&self) -> Vec<EpochMetrics> {
        (0..self.len())
            .map(|i| EpochMetrics::new(
                i + 1,
                self.train_loss[i],
                self.train_accuracy[i],
                self.val_loss[i],
                self.val_accuracy[i],
            ))
            .collect()
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write the header only if the file is new, so metrics
        // append across runs instead of being overwritten.
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,train_acc,val_loss,val_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.train_accuracy,
            m.val_loss,
            m.val_accuracy,
        )?;

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sequences_stay_parallel() {
        let mut h = MetricsHistory::new();
        h.record(EpochMetrics::new(1, 3.2, 0.1, 3.1, 0.12));
        h.record(EpochMetrics::new(2, 2.8, 0.2, 2.9, 0.18));

        assert_eq!(h.len(), 2);
        assert_eq!(h.train_loss().len(), 2);
        assert_eq!(h.train_accuracy().len(), 2);
        assert_eq!(h.val_loss().len(), 2);
        assert_eq!(h.val_accuracy().len(), 2);
    }

    #[test]
    fn test_epochs_round_trip() {
        let mut h = MetricsHistory::new();
        h.record(EpochMetrics::new(1, 3.2, 0.1, 3.1, 0.12));

        let rows = h.epochs();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].epoch, 1);
        assert!((rows[0].val_accuracy - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_csv_rows_append() {
        let tmp = TempDir::new().unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();

        logger.log(&EpochMetrics::new(1, 3.2, 0.1, 3.1, 0.12)).unwrap();
        logger.log(&EpochMetrics::new(2, 2.8, 0.2, 2.9, 0.18)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert_eq!(lines[0], "epoch,train_loss,train_acc,val_loss,val_acc");
        assert!(lines[1].starts_with("1,3.2"));
        assert!(lines[2].starts_with("2,2.8"));
    }
}
