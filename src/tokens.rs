use crate::errors::BundleError;
use tiktoken_rs::{get_bpe_from_model, CoreBPE};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Maps text to a token count. Aggregation treats it as opaque.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn for_model(model: &str) -> Result<Self, BundleError> {
        debug!("Loading tokenizer for model {}", model);
        let bpe =
            get_bpe_from_model(model).map_err(|e| BundleError::TokenizerError(e.to_string()))?;
        Ok(TiktokenCounter { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
