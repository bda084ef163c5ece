//! Digest domain types.
//!
//! A digest is the three-section summary produced for one document:
//! introduction, development and conclusion. Everything downstream of the
//! summarizer (captions, prompts, images) is keyed by [`SectionKind`] and
//! carried in a [`Sections`] triple so that no stage can drop or reorder a
//! section.

use crate::error::SummarizationError;
use serde::{Deserialize, Serialize};

/// One of the three digest sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Introduction,
    Development,
    Conclusion,
}

impl SectionKind {
    /// All sections in document order.
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Introduction,
        SectionKind::Development,
        SectionKind::Conclusion,
    ];

    /// Short qualifier used in artifact names.
    pub fn qualifier(&self) -> &'static str {
        match self {
            SectionKind::Introduction => "intro",
            SectionKind::Development => "development",
            SectionKind::Conclusion => "conclusion",
        }
    }

    /// Heading used in the labelled text format.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Introduction => "Giriş",
            SectionKind::Development => "Gelişme",
            SectionKind::Conclusion => "Sonuç",
        }
    }

    /// Share of the source text this section summarizes.
    pub fn share(&self) -> f32 {
        match self {
            SectionKind::Introduction => 0.3,
            SectionKind::Development => 0.4,
            SectionKind::Conclusion => 0.3,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.qualifier())
    }
}

/// A value for each of the three sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections<T> {
    pub introduction: T,
    pub development: T,
    pub conclusion: T,
}

impl<T> Sections<T> {
    pub fn new(introduction: T, development: T, conclusion: T) -> Self {
        Self {
            introduction,
            development,
            conclusion,
        }
    }

    pub fn get(&self, kind: SectionKind) -> &T {
        match kind {
            SectionKind::Introduction => &self.introduction,
            SectionKind::Development => &self.development,
            SectionKind::Conclusion => &self.conclusion,
        }
    }

    /// Iterate `(kind, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, &T)> {
        SectionKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn map<U>(self, mut f: impl FnMut(SectionKind, T) -> U) -> Sections<U> {
        Sections {
            introduction: f(SectionKind::Introduction, self.introduction),
            development: f(SectionKind::Development, self.development),
            conclusion: f(SectionKind::Conclusion, self.conclusion),
        }
    }
}

/// The output of the summarization stage. Every section is non-empty.
///
/// Serializes as its bare sections; deserializing goes through
/// [`Digest::new`] so blank sections are rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Sections<String>", into = "Sections<String>")]
pub struct Digest {
    sections: Sections<String>,
}

impl Digest {
    /// Build a digest, rejecting blank sections.
    pub fn new(
        introduction: impl Into<String>,
        development: impl Into<String>,
        conclusion: impl Into<String>,
    ) -> Result<Self, SummarizationError> {
        let sections = Sections::new(
            introduction.into().trim().to_string(),
            development.into().trim().to_string(),
            conclusion.into().trim().to_string(),
        );
        for (kind, text) in sections.iter() {
            if text.is_empty() {
                return Err(SummarizationError::EmptySection(kind.label().to_string()));
            }
        }
        Ok(Self { sections })
    }

    pub fn introduction(&self) -> &str {
        &self.sections.introduction
    }

    pub fn development(&self) -> &str {
        &self.sections.development
    }

    pub fn conclusion(&self) -> &str {
        &self.sections.conclusion
    }

    pub fn sections(&self) -> &Sections<String> {
        &self.sections
    }

    /// Render as labelled plain text:
    ///
    /// ```text
    /// Giriş:
    /// ...
    ///
    /// Gelişme:
    /// ...
    /// ```
    pub fn to_labelled_text(&self) -> String {
        let mut out = String::new();
        for (kind, text) in self.sections.iter() {
            out.push_str(kind.label());
            out.push_str(":\n");
            out.push_str(text);
            out.push_str("\n\n");
        }
        out
    }

    /// Parse the labelled text format back into a digest.
    ///
    /// A section starts right after `Label:` and runs to the next blank line
    /// (or end of text). Labels may appear in any order.
    pub fn parse_labelled(content: &str) -> Result<Self, SummarizationError> {
        let mut parsed: Vec<String> = Vec::with_capacity(3);
        for kind in SectionKind::ALL {
            let marker = format!("{}:", kind.label());
            let start = content
                .find(&marker)
                .ok_or_else(|| SummarizationError::MissingSection(kind.label().to_string()))?;
            let body_start = start + marker.len();
            let end = content[start..]
                .find("\n\n")
                .map(|offset| start + offset)
                .unwrap_or(content.len())
                .max(body_start);
            parsed.push(content[body_start..end].trim().to_string());
        }
        let conclusion = parsed.pop().unwrap_or_default();
        let development = parsed.pop().unwrap_or_default();
        let introduction = parsed.pop().unwrap_or_default();
        Self::new(introduction, development, conclusion)
    }
}

impl TryFrom<Sections<String>> for Digest {
    type Error = SummarizationError;

    fn try_from(sections: Sections<String>) -> Result<Self, Self::Error> {
        let Sections {
            introduction,
            development,
            conclusion,
        } = sections;
        Self::new(introduction, development, conclusion)
    }
}

impl From<Digest> for Sections<String> {
    fn from(digest: Digest) -> Self {
        digest.sections
    }
}

/// The translated form of one digest section.
///
/// On translation failure the caption carries the original section text
/// and `translated` is false; it is never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub translated: bool,
}

impl Caption {
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translated: true,
        }
    }

    pub fn untranslated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translated: false,
        }
    }
}

/// A stored image, addressed by a URL-friendly relative path
/// (e.g. `images/title_intro_model_20240101120000.png`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Digest {
        Digest::new("Bir kız varmış.", "Kurt gelmiş.", "Avcı kurtarmış.").unwrap()
    }

    #[test]
    fn blank_section_rejected() {
        let err = Digest::new("a", "  ", "c").unwrap_err();
        assert!(matches!(err, SummarizationError::EmptySection(s) if s == "Gelişme"));
    }

    #[test]
    fn deserializing_checks_sections() {
        let digest: Digest = serde_json::from_str(
            r#"{"introduction":" Bir kız varmış. ","development":"Kurt gelmiş.","conclusion":"Avcı kurtarmış."}"#,
        )
        .unwrap();
        assert_eq!(digest, sample());
        assert_eq!(
            serde_json::to_value(&digest).unwrap()["conclusion"],
            "Avcı kurtarmış."
        );

        let blank = serde_json::from_str::<Digest>(
            r#"{"introduction":"a","development":"","conclusion":"c"}"#,
        );
        assert!(blank.unwrap_err().to_string().contains("Gelişme"));
    }

    #[test]
    fn labelled_text_layout() {
        let text = sample().to_labelled_text();
        assert_eq!(
            text,
            "Giriş:\nBir kız varmış.\n\nGelişme:\nKurt gelmiş.\n\nSonuç:\nAvcı kurtarmış.\n\n"
        );
    }

    #[test]
    fn parse_labelled_recovers_sections() {
        let digest = sample();
        let parsed = Digest::parse_labelled(&digest.to_labelled_text()).unwrap();
        assert_eq!(parsed, digest);
    }

    #[test]
    fn parse_labelled_tolerates_preamble_and_order() {
        let content = "İşte özet:\n\nSonuç: Mutlu son.\n\nGiriş: Başlangıç.\n\nGelişme: Orta kısım.";
        let parsed = Digest::parse_labelled(content).unwrap();
        assert_eq!(parsed.introduction(), "Başlangıç.");
        assert_eq!(parsed.development(), "Orta kısım.");
        assert_eq!(parsed.conclusion(), "Mutlu son.");
    }

    #[test]
    fn parse_labelled_reports_missing_section() {
        let err = Digest::parse_labelled("Giriş: a\n\nSonuç: c").unwrap_err();
        assert!(matches!(err, SummarizationError::MissingSection(s) if s == "Gelişme"));
    }

    #[test]
    fn sections_iterate_in_document_order() {
        let kinds: Vec<_> = sample().sections().iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
    }

    #[test]
    fn shares_sum_to_one() {
        let total: f32 = SectionKind::ALL.iter().map(|k| k.share()).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }
}
