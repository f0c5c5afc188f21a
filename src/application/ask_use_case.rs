// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// Loads the trained artifacts and answers free-text questions:
//   1. Read train_config.json to rebuild the architecture
//   2. Load the saved tokenizer (same vocabulary as training)
//   3. Load the model weights into a fresh model
//   4. Run bounded greedy generation for each question

use anyhow::Result;

use crate::domain::traits::QuestionAnswerer;
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer_store::{HfTextEncoder, TokenizerStore},
};
use crate::ml::generator::Generator;

pub struct AskUseCase {
    encoder:    HfTextEncoder,
    generator:  Generator,
    /// Upper bound on generated sequence length (prompt included)
    max_length: usize,
}

impl AskUseCase {
    pub fn new(model_dir: String, max_length: usize) -> Result<Self> {
        let tok_store = TokenizerStore::new(&model_dir);
        let encoder   = HfTextEncoder::new(tok_store.load()?);

        let ckpt      = CheckpointManager::new(&model_dir);
        let generator = Generator::from_checkpoint(&ckpt)?;

        Ok(Self { encoder, generator, max_length })
    }
}

impl QuestionAnswerer for AskUseCase {
    fn answer(&self, question: &str) -> Result<String> {
        self.generator.generate(question, &self.encoder, self.max_length)
    }
}
