//! Input documents.
//!
//! A document is the raw narrative text a pipeline run starts from. It is
//! immutable once accepted; validation happens before any model is invoked.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions accepted as document uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// Where a document came from. Inline text and files are bounded differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// Text typed or piped in directly; bounded by character count.
    Inline,
    /// A text file; bounded by size on disk.
    File { file_name: String },
}

/// Size limits applied before a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    pub max_text_chars: usize,
    pub max_file_bytes: u64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_text_chars: 10_000,
            max_file_bytes: 16 * 1024 * 1024,
        }
    }
}

/// A narrative text accepted for processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Human-facing title stored with the digest row.
    pub title: String,

    /// Base used for every artifact name derived from this document.
    pub base_name: String,

    /// The full text.
    pub text: String,

    pub source: DocumentSource,
}

impl Document {
    /// Build a document from inline text.
    pub fn inline(
        text: impl Into<String>,
        title: impl Into<String>,
        base_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            base_name: base_name.into(),
            text: text.into(),
            source: DocumentSource::Inline,
        }
    }

    /// Read a document from a `.txt` file. Title and base name are the file stem.
    ///
    /// `pdf` is a recognised upload type but text extraction is not part of
    /// this crate, so it is rejected as unsupported.
    pub fn from_file(path: &Path, limits: &InputLimits) -> Result<Self, ValidationError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ValidationError::Unreadable(path.display().to_string()))?
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationError::UnsupportedFormat(format!(
                "'{file_name}' (allowed: {})",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if extension == "pdf" {
            return Err(ValidationError::UnsupportedFormat(
                "PDF text extraction is not available; convert to .txt first".into(),
            ));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ValidationError::Unreadable(format!("{}: {e}", path.display())))?;
        if metadata.len() > limits.max_file_bytes {
            return Err(ValidationError::FileTooLarge {
                bytes: metadata.len(),
                max: limits.max_file_bytes,
            });
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::Unreadable(format!("{}: {e}", path.display())))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&file_name)
            .to_string();

        let document = Self {
            title: stem.clone(),
            base_name: stem,
            text,
            source: DocumentSource::File { file_name },
        };
        document.validate(limits)?;
        Ok(document)
    }

    /// Check the document against the configured limits.
    ///
    /// Every document must contain non-whitespace text. Inline text is also
    /// capped by the character count of its trimmed content; files were
    /// already bounded by size.
    pub fn validate(&self, limits: &InputLimits) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        if self.source == DocumentSource::Inline {
            let chars = self.text.trim().chars().count();
            if chars > limits.max_text_chars {
                return Err(ValidationError::TooLong {
                    chars,
                    max: limits.max_text_chars,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_within_limit_is_valid() {
        let doc = Document::inline("Bir zamanlar...", "Kullanıcı Metni", "user_text_1");
        assert!(doc.validate(&InputLimits::default()).is_ok());
    }

    #[test]
    fn whitespace_only_is_empty() {
        let doc = Document::inline("  \n\t ", "t", "b");
        assert_eq!(
            doc.validate(&InputLimits::default()),
            Err(ValidationError::Empty)
        );
    }

    #[test]
    fn inline_cap_counts_characters_not_bytes() {
        let limits = InputLimits {
            max_text_chars: 5,
            ..InputLimits::default()
        };
        // 5 chars, 10 bytes
        assert!(Document::inline("ğüşıç", "t", "b").validate(&limits).is_ok());
        assert_eq!(
            Document::inline("ğüşıçö", "t", "b").validate(&limits),
            Err(ValidationError::TooLong { chars: 6, max: 5 })
        );
    }

    #[test]
    fn inline_cap_ignores_surrounding_whitespace() {
        let limits = InputLimits {
            max_text_chars: 5,
            ..InputLimits::default()
        };
        let padded = format!("{}kurt{}", " ".repeat(20), "\n".repeat(20));
        assert!(Document::inline(padded, "t", "b").validate(&limits).is_ok());
        assert_eq!(
            Document::inline("  kurtlar  ", "t", "b").validate(&limits),
            Err(ValidationError::TooLong { chars: 7, max: 5 })
        );
    }

    #[test]
    fn file_uses_stem_as_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kirmizi_baslikli_kiz.txt");
        std::fs::write(&path, "Bir zamanlar bir kız varmış.").unwrap();

        let doc = Document::from_file(&path, &InputLimits::default()).unwrap();
        assert_eq!(doc.title, "kirmizi_baslikli_kiz");
        assert_eq!(doc.base_name, "kirmizi_baslikli_kiz");
        assert!(matches!(doc.source, DocumentSource::File { .. }));
    }

    #[test]
    fn file_is_not_bounded_by_character_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.txt");
        std::fs::write(&path, "a".repeat(20)).unwrap();
        let limits = InputLimits {
            max_text_chars: 5,
            max_file_bytes: 1024,
        };
        assert!(Document::from_file(&path, &limits).is_ok());
    }

    #[test]
    fn oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "a".repeat(100)).unwrap();
        let limits = InputLimits {
            max_text_chars: 10_000,
            max_file_bytes: 10,
        };
        assert_eq!(
            Document::from_file(&path, &limits).unwrap_err(),
            ValidationError::FileTooLarge { bytes: 100, max: 10 }
        );
    }

    #[test]
    fn unsupported_extensions_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["story.docx", "story.pdf"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "text").unwrap();
            assert!(matches!(
                Document::from_file(&path, &InputLimits::default()),
                Err(ValidationError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   ").unwrap();
        assert_eq!(
            Document::from_file(&path, &InputLimits::default()).unwrap_err(),
            ValidationError::Empty
        );
    }
}
