//! Prompt tokenizers.
//!
//! - [`WordTokenizer`]: built in, no vocabulary. Splits text the way CLIP
//!   pre-tokenizes it (lowercase; letter runs, single digits, punctuation),
//!   then cuts each letter run into pieces of at most [`MAX_PIECE_BYTES`]
//!   UTF-8 bytes and each punctuation run into single characters. A whole
//!   word counts as one CLIP token at best but often several, so counting
//!   words alone under-estimates; the piece count errs high instead.
//! - [`HfTokenizer`]: a real Hugging Face `tokenizer.json` (e.g. the CLIP
//!   tokenizer), behind the `hf-tokenizer` feature. Exact, where the word
//!   tokenizer is an estimate.

use std::sync::Arc;
use taleweave_core::error::TokenizerError;
use taleweave_core::Tokenizer;

/// Build a tokenizer from its config value: `"word"` or `"hf:<repo-or-path>"`.
pub fn build_tokenizer(name: &str) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    match name.trim() {
        "" | "word" => Ok(Arc::new(WordTokenizer)),
        other => match other.strip_prefix("hf:") {
            Some(source) => load_hf(source),
            None => Err(TokenizerError::Unavailable(format!(
                "unknown tokenizer '{other}' (expected \"word\" or \"hf:<repo-or-path>\")"
            ))),
        },
    }
}

#[cfg(feature = "hf-tokenizer")]
fn load_hf(source: &str) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    Ok(Arc::new(HfTokenizer::load(source)?))
}

#[cfg(not(feature = "hf-tokenizer"))]
fn load_hf(source: &str) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    Err(TokenizerError::Unavailable(format!(
        "'{source}' needs the hf-tokenizer feature"
    )))
}

/// Longest piece a letter run is cut into.
pub const MAX_PIECE_BYTES: usize = 3;

/// Marks the last piece of a word, as CLIP's vocabulary does.
const WORD_END: &str = "</w>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Space,
    Symbol,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c.is_alphabetic() {
        CharClass::Letter
    } else if c.is_numeric() {
        CharClass::Digit
    } else {
        CharClass::Symbol
    }
}

/// Vocabulary-free tokenizer that over-counts BPE tokens.
///
/// Tokens are word pieces; the last piece of each word ends in `</w>`.
/// `detokenize` glues pieces back into words and words with single spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    fn push_word(word: &str, class: CharClass, tokens: &mut Vec<String>) {
        let mut piece = String::new();
        for c in word.chars() {
            let full = match class {
                CharClass::Letter => piece.len() + c.len_utf8() > MAX_PIECE_BYTES,
                _ => true,
            };
            if full && !piece.is_empty() {
                tokens.push(std::mem::take(&mut piece));
            }
            piece.push(c);
        }
        if !piece.is_empty() {
            piece.push_str(WORD_END);
            tokens.push(piece);
        }
    }
}

impl Tokenizer for WordTokenizer {
    fn name(&self) -> &str {
        "word"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut word = String::new();
        let mut word_class = CharClass::Space;

        for c in lowered.chars() {
            let class = classify(c);
            // Digits are always single words; letters and symbols form runs.
            let continues = class == word_class && class != CharClass::Digit;
            if !continues && !word.is_empty() {
                Self::push_word(&word, word_class, &mut tokens);
                word.clear();
            }
            if class != CharClass::Space {
                word.push(c);
            }
            word_class = class;
        }
        if !word.is_empty() {
            Self::push_word(&word, word_class, &mut tokens);
        }
        Ok(tokens)
    }

    fn detokenize(&self, tokens: &[String]) -> String {
        tokens.concat().replace(WORD_END, " ").trim().to_string()
    }
}

/// A Hugging Face tokenizer loaded from a local `tokenizer.json` or a hub repo.
#[cfg(feature = "hf-tokenizer")]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    source: String,
}

#[cfg(feature = "hf-tokenizer")]
impl HfTokenizer {
    /// `source` is a path to a `tokenizer.json` file or a hub repo id
    /// such as `openai/clip-vit-base-patch32`.
    pub fn load(source: &str) -> Result<Self, TokenizerError> {
        let path = std::path::Path::new(source);
        let file = if path.is_file() {
            path.to_path_buf()
        } else {
            let api = hf_hub::api::sync::Api::new()
                .map_err(|e| TokenizerError::Unavailable(format!("hub client: {e}")))?;
            api.model(source.to_string())
                .get("tokenizer.json")
                .map_err(|e| TokenizerError::Unavailable(format!("download '{source}': {e}")))?
        };
        let inner = tokenizers::Tokenizer::from_file(&file)
            .map_err(|e| TokenizerError::Unavailable(format!("load {}: {e}", file.display())))?;
        tracing::info!(source, "Hugging Face tokenizer loaded");
        Ok(Self {
            inner,
            source: source.to_string(),
        })
    }
}

#[cfg(feature = "hf-tokenizer")]
impl Tokenizer for HfTokenizer {
    fn name(&self) -> &str {
        &self.source
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizerError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }

    /// CLIP marks word ends with `</w>`; joining and replacing it restores spacing.
    fn detokenize(&self, tokens: &[String]) -> String {
        tokens.concat().replace(WORD_END, " ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str) -> Vec<String> {
        WordTokenizer.tokenize(text).unwrap()
    }

    #[test]
    fn splits_words_digits_and_punctuation() {
        assert_eq!(
            tok("Once upon a time, 12 wolves!"),
            vec![
                "onc", "e</w>", "upo", "n</w>", "a</w>", "tim", "e</w>", ",</w>", "1</w>", "2</w>",
                "wol", "ves</w>", "!</w>"
            ]
        );
    }

    #[test]
    fn punctuation_runs_count_every_character() {
        assert_eq!(tok("?!..."), vec!["?", "!", ".", ".", ".</w>"]);
    }

    #[test]
    fn pieces_respect_multibyte_letters() {
        // 'ş' and 'ı' are two bytes each.
        assert_eq!(tok("Şişli"), vec!["şi", "şl", "i</w>"]);
        for token in tok("Kırmızı Başlıklı Kız büyükannesine gitti") {
            assert!(token.trim_end_matches(WORD_END).len() <= MAX_PIECE_BYTES, "{token}");
        }
    }

    #[test]
    fn rare_long_words_cost_several_tokens() {
        assert_eq!(tok("unbeknownst").len(), 4);
        assert_eq!(tok("melancholically").len(), 5);
    }

    #[test]
    fn empty_and_whitespace_only() {
        assert!(tok("").is_empty());
        assert!(tok("  \n ").is_empty());
    }

    #[test]
    fn detokenize_rebuilds_words() {
        let text = "the wolf (grey) ran 3 miles.";
        assert_eq!(WordTokenizer.detokenize(&tok(text)), "the wolf ( grey ) ran 3 miles .");
    }

    #[test]
    fn detokenized_prefix_keeps_its_token_count() {
        let tokens = tok("The girl's red hood... and the melancholy wolf (grey) ran 3 miles.");
        for cut in 0..=tokens.len() {
            let text = WordTokenizer.detokenize(&tokens[..cut]);
            assert_eq!(tok(&text).len(), cut, "cut at {cut}: {text}");
        }
    }

    #[test]
    fn word_name_builds_word_tokenizer() {
        assert_eq!(build_tokenizer("word").unwrap().name(), "word");
        assert_eq!(build_tokenizer("").unwrap().name(), "word");
    }

    #[test]
    fn unknown_tokenizer_rejected() {
        assert!(build_tokenizer("sentencepiece").is_err());
    }

    #[cfg(not(feature = "hf-tokenizer"))]
    #[test]
    fn hf_without_feature_is_unavailable() {
        assert!(matches!(
            build_tokenizer("hf:openai/clip-vit-base-patch32"),
            Err(TokenizerError::Unavailable(_))
        ));
    }

    /// Needs a CLIP `tokenizer.json` on disk, named by `TALEWEAVE_CLIP_TOKENIZER`.
    #[cfg(feature = "hf-tokenizer")]
    #[test]
    fn word_count_bounds_clip_bpe_count() {
        let Ok(path) = std::env::var("TALEWEAVE_CLIP_TOKENIZER") else {
            eprintln!("TALEWEAVE_CLIP_TOKENIZER not set; skipping");
            return;
        };
        let clip = HfTokenizer::load(&path).unwrap();
        let samples = [
            "A happy watercolor illustration of a children's fairy tale",
            "Unbeknownst to her, the wolf waited melancholically by the cottage.",
            "The huntsman arrived, defeated the wolf and everyone was saved!",
            "Little Red Riding Hood walks through the forest to her grandmother's house.",
            "Kırmızı Başlıklı Kız büyükannesine gitmek için ormana girer.",
        ];
        for sample in samples {
            let estimate = WordTokenizer.tokenize(sample).unwrap().len();
            let exact = clip.tokenize(sample).unwrap().len();
            assert!(estimate >= exact, "{estimate} < {exact} for {sample:?}");
        }
    }
}
