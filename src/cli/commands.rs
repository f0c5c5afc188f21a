// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `ask`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fine-tune the chatbot on the ANAD article corpus
    Train(TrainArgs),

    /// Ask a question using a trained model directory
    Ask(AskArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus root containing platform/topic/*.txt article files
    #[arg(long, default_value = "ANAD-Arabic-News-Article-Dataset")]
    pub corpus_dir: String,

    /// Directory for the saved model, tokenizer and metrics
    #[arg(long, default_value = "arabic_chatbot_model")]
    pub model_dir: String,

    /// Fixed token width per example:
    /// [CLS] question [SEP] answer [SEP] + padding
    #[arg(long, default_value_t = 128)]
    pub max_length: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 2)]
    pub epochs: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 5e-5)]
    pub lr: f64,

    /// Hard prefix cap on the article table
    #[arg(long, default_value_t = 49_000)]
    pub max_articles: usize,

    /// Character cap on the answer side of each pair
    #[arg(long, default_value_t = 512)]
    pub answer_chars: usize,

    /// Word cap applied to article content before pairing
    #[arg(long, default_value_t = 100)]
    pub content_words: usize,

    /// Proportion of rows used for training (rest validates)
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Seed for the train/validation shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Hidden dimension of the transformer (d_model in the paper)
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// Number of attention heads in multi-head attention.
    /// d_model must be divisible by num_heads
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 6)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network,
    /// typically 4x d_model
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    /// Dropout probability — randomly zeroes activations during
    /// training to prevent overfitting
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Total number of unique tokens the model can recognise
    #[arg(long, default_value_t = 30_522)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_dir:     a.corpus_dir,
            model_dir:      a.model_dir,
            max_length:     a.max_length,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            max_articles:   a.max_articles,
            answer_chars:   a.answer_chars,
            content_words:  a.content_words,
            train_fraction: a.train_fraction,
            seed:           a.seed,
            d_model:        a.d_model,
            num_heads:      a.num_heads,
            num_layers:     a.num_layers,
            d_ff:           a.d_ff,
            dropout:        a.dropout,
            vocab_size:     a.vocab_size,
        }
    }
}

/// All arguments for the `ask` command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    /// Directory where the model was saved during training
    #[arg(long, default_value = "arabic_chatbot_model")]
    pub model_dir: String,

    /// Maximum generated sequence length, prompt included
    #[arg(long, default_value_t = 150)]
    pub max_length: usize,
}
