// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train` — fine-tunes the chatbot on the article corpus
//   2. `ask`   — loads the saved model and answers a question
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AskArgs, Commands, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "anad-chatbot",
    version = "0.1.0",
    about = "Fine-tune a masked-language transformer on the ANAD Arabic news corpus, then ask it questions."
)]
pub struct Cli {
    /// The subcommand to run (train or ask)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Ask(args)   => Self::run_ask(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus: {}", args.corpus_dir);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        let curves   = use_case.execute()?;

        println!("\n{curves}\n");
        println!("Training complete. Model and tokenizer saved.");
        Ok(())
    }

    /// Handles the `ask` subcommand.
    /// Loads the model from the saved directory and prints the answer.
    fn run_ask(args: AskArgs) -> Result<()> {
        use crate::application::ask_use_case::AskUseCase;
        use crate::domain::traits::QuestionAnswerer;

        let use_case = AskUseCase::new(args.model_dir.clone(), args.max_length)?;

        // Run generation and print the result
        let answer = use_case.answer(&args.question)?;
        println!("\nQuestion: {}", args.question);
        println!("Response: {}", answer);
        Ok(())
    }
}
