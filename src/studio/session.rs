//! Session state machine
//!
//! Holds the single working document and routes each instruction to the
//! right producer: template fast path, keyword routing, fresh synthesis,
//! incremental patching, or the remote generator when one is attached.
//! The buffer only changes when the chosen producer succeeds.

use crate::catalog::TemplateCatalog;
use crate::core::error::{ForgeError, Result};
use crate::extract::{extract, KeywordClassifier};
use crate::generate::{patch, synthesize};
use crate::llm::GeneratorClient;

/// One interactive editing session over a single document buffer.
pub struct Session {
    catalog: TemplateCatalog,
    classifier: KeywordClassifier,
    remote: Option<GeneratorClient>,
    current: Option<String>,
}

impl Session {
    /// Create a session backed entirely by the local pipeline.
    pub fn new(catalog: TemplateCatalog) -> Self {
        let classifier = catalog.classifier();
        Self {
            catalog,
            classifier,
            remote: None,
            current: None,
        }
    }

    /// Attach a remote generator. With a remote attached, synthesis
    /// fallback and patching are delegated to the service; template
    /// routing stays local.
    pub fn with_remote(mut self, remote: GeneratorClient) -> Self {
        self.remote = Some(remote);
        self
    }

    /// The current document text, if any instruction has succeeded yet.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The curated template entries, for listing in a UI.
    pub fn templates(&self) -> &[crate::catalog::TemplateEntry] {
        self.catalog.entries()
    }

    /// Discard the working document.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Process one instruction and return the updated document.
    ///
    /// On any error the working document is left exactly as it was.
    pub async fn submit(&mut self, instruction: &str) -> Result<&str> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(ForgeError::InvalidInstruction(
                "instruction is empty".into(),
            ));
        }

        let next = match &self.current {
            None => self.produce_fresh(instruction).await?,
            Some(current) => self.produce_patched(current, instruction).await?,
        };

        self.current = Some(next);
        Ok(self.current.as_deref().unwrap_or_default())
    }

    /// No working document yet: template fast path, then keyword routing,
    /// then synthesis (or the remote service).
    async fn produce_fresh(&self, instruction: &str) -> Result<String> {
        if let Some(entry) = self.catalog.by_description(instruction) {
            tracing::debug!(template = entry.id, "routing: exact template description");
            return Ok(entry.document.to_string());
        }

        if let Some(id) = self.classifier.classify(instruction) {
            if let Some(document) = self.catalog.document_for(id) {
                tracing::debug!(template = id, "routing: keyword match");
                return Ok(document.to_string());
            }
        }

        if let Some(remote) = &self.remote {
            tracing::debug!("routing: remote generation");
            return remote.generate(instruction, None).await;
        }

        tracing::debug!("routing: local synthesis");
        Ok(synthesize(&extract(instruction)))
    }

    /// A document exists: edit it, locally or via the remote service.
    async fn produce_patched(&self, current: &str, instruction: &str) -> Result<String> {
        if let Some(remote) = &self.remote {
            tracing::debug!("routing: remote patch");
            return remote.generate(instruction, Some(current)).await;
        }

        tracing::debug!("routing: local patch");
        patch(current, instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(TemplateCatalog::builtin())
    }

    #[tokio::test]
    async fn test_empty_instruction_rejected() {
        let mut s = session();
        let err = s.submit("   ").await.unwrap_err();
        assert!(matches!(err, ForgeError::InvalidInstruction(_)));
        assert!(s.current().is_none());
    }

    #[tokio::test]
    async fn test_description_fast_path_verbatim() {
        let catalog = TemplateCatalog::builtin();
        let entry = catalog.entries()[0].clone();
        let mut s = Session::new(catalog);
        let doc = s.submit(entry.description).await.unwrap();
        assert_eq!(doc, entry.document);
    }

    #[tokio::test]
    async fn test_keyword_routing_picks_template() {
        let catalog = TemplateCatalog::builtin();
        let expected = catalog.document_for("birthday").unwrap();
        let mut s = Session::new(catalog);
        let doc = s.submit("track birthdays of my friends").await.unwrap();
        assert_eq!(doc, expected);
    }

    #[tokio::test]
    async fn test_synthesis_fallback() {
        let mut s = session();
        let doc = s.submit("notes with tag #quux as cards").await.unwrap();
        assert!(doc.contains("file.hasTag(\"quux\")"));
        assert!(doc.contains("type: cards"));
    }

    #[tokio::test]
    async fn test_second_instruction_patches() {
        let mut s = session();
        s.submit("notes with tag #quux").await.unwrap();
        let doc = s.submit("sort by size desc").await.unwrap();
        assert!(doc.contains("file.hasTag(\"quux\")"));
        assert!(doc.contains("property: file.size"));
        assert!(doc.contains("direction: DESC"));
    }

    #[tokio::test]
    async fn test_reset_returns_to_routing() {
        let catalog = TemplateCatalog::builtin();
        let expected = catalog.document_for("map").unwrap();
        let mut s = Session::new(catalog);
        s.submit("notes with tag #quux").await.unwrap();
        s.reset();
        assert!(s.current().is_none());
        // After reset a travel instruction routes to the template again
        // instead of patching the old buffer.
        let doc = s.submit("plot my travel trips on a map").await.unwrap();
        assert_eq!(doc, expected);
    }

    #[tokio::test]
    async fn test_error_leaves_buffer_unchanged() {
        let mut s = session();
        s.submit("notes with tag #quux").await.unwrap();
        let before = s.current().unwrap().to_string();
        assert!(s.submit("").await.is_err());
        assert_eq!(s.current().unwrap(), before);
    }
}
