//! Token-budgeted prompt construction.
//!
//! The synthesizer accepts a fixed number of tokens including its implicit
//! start/end markers. The preamble is always kept whole; the caption gets
//! whatever is left and is cut at a token boundary.

use taleweave_core::error::TokenizerError;
use taleweave_core::Tokenizer;
use tracing::debug;

/// A prompt ready for the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    /// Caption tokens kept in the prompt.
    pub caption_tokens: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct TokenBudget {
    preamble: String,
    max_total_tokens: usize,
    reserved_tokens: usize,
}

impl TokenBudget {
    pub fn new(preamble: impl Into<String>, max_total_tokens: usize, reserved_tokens: usize) -> Self {
        Self {
            preamble: preamble.into(),
            max_total_tokens,
            reserved_tokens,
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Tokens left for the caption once the preamble and markers are counted.
    /// Zero when the preamble alone fills the budget.
    pub fn caption_budget(&self, tokenizer: &dyn Tokenizer) -> Result<usize, TokenizerError> {
        let preamble_tokens = tokenizer.tokenize(&self.preamble)?.len();
        Ok(self
            .max_total_tokens
            .saturating_sub(preamble_tokens)
            .saturating_sub(self.reserved_tokens))
    }

    /// Build `preamble + " " + caption`, trimming the caption to the budget.
    pub fn build(&self, caption: &str, tokenizer: &dyn Tokenizer) -> Result<Prompt, TokenizerError> {
        let budget = self.caption_budget(tokenizer)?;
        let tokens = tokenizer.tokenize(caption)?;

        let (kept, caption_tokens, truncated) = if budget == 0 {
            (String::new(), 0, !tokens.is_empty())
        } else if tokens.len() > budget {
            (tokenizer.detokenize(&tokens[..budget]), budget, true)
        } else {
            (caption.to_string(), tokens.len(), false)
        };

        if truncated {
            debug!(
                budget,
                caption_tokens = tokens.len(),
                "Caption truncated to fit the prompt budget"
            );
        }

        let text = match (self.preamble.is_empty(), kept.is_empty()) {
            (_, true) => self.preamble.clone(),
            (true, false) => kept,
            (false, false) => format!("{} {}", self.preamble, kept),
        };

        Ok(Prompt {
            text,
            caption_tokens,
            truncated,
        })
    }
}
