//! Chat-model summarizer.
//!
//! Asks a chat model for an extractive fairy-tale digest split into the three
//! labelled sections, then parses the labels back out of the reply.

use async_trait::async_trait;
use std::sync::Arc;
use taleweave_core::digest::{Digest, SectionKind};
use taleweave_core::error::SummarizationError;
use taleweave_core::Summarizer;
use tracing::debug;

use crate::openai_compat::OpenAiCompatClient;

pub struct ChatSummarizer {
    client: Arc<OpenAiCompatClient>,
    model: String,
    language: String,
}

impl ChatSummarizer {
    pub fn new(client: Arc<OpenAiCompatClient>, model: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            language: language.into(),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "You summarize stories in {} using a storyteller's voice.",
            self.language
        )
    }

    /// Build the instruction block followed by the story.
    fn user_prompt(&self, text: &str) -> String {
        let [intro, dev, conc] = SectionKind::ALL;
        let pct = |k: SectionKind| (k.share() * 100.0).round() as u32;
        format!(
            "Write a summary of the fairy tale below. Rules:\n\
             1. The summary is extractive: stay with the given story, add no outside information or invented phrasing.\n\
             2. Do not change the events; tell them as they happen.\n\
             3. Keep a fairy-tale tone without exaggeration.\n\
             4. Reuse dialogue and the characters' direct reactions from the text.\n\
             5. Avoid stock endings such as \"and so the tale ends\".\n\
             6. Preserve the order of events and the plot; draw no unnecessary conclusions.\n\n\
             Split the story into three parts: {il} ({ip}%), {dl} ({dp}%) and {cl} ({cp}%). \
             Present each part under the headings '{il}:', '{dl}:' and '{cl}:' separated by a blank line. \
             The total length should be about one sixth of the story. Write in {lang}.\n\n\
             Story:\n{text}",
            il = intro.label(),
            ip = pct(intro),
            dl = dev.label(),
            dp = pct(dev),
            cl = conc.label(),
            cp = pct(conc),
            lang = self.language,
        )
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    fn name(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, text: &str) -> Result<Digest, SummarizationError> {
        let reply = self
            .client
            .chat(&self.model, &self.system_prompt(), &self.user_prompt(text), 0.3)
            .await?;
        debug!(model = %self.model, reply_chars = reply.len(), "Summary received");
        Digest::parse_labelled(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer() -> ChatSummarizer {
        let client = Arc::new(OpenAiCompatClient::new("test", "http://localhost:1", "", None).unwrap());
        ChatSummarizer::new(client, "gpt-4", "Turkish")
    }

    #[test]
    fn prompt_names_all_headings_and_shares() {
        let prompt = summarizer().user_prompt("Bir zamanlar...");
        assert!(prompt.contains("'Giriş:'"));
        assert!(prompt.contains("Gelişme (40%)"));
        assert!(prompt.contains("Sonuç (30%)"));
        assert!(prompt.ends_with("Story:\nBir zamanlar..."));
    }

    #[test]
    fn name_is_model() {
        assert_eq!(summarizer().name(), "gpt-4");
    }
}
