//! End-to-end question answering.
//!
//! [`build`] assembles the pipeline once at startup: corpus files are
//! loaded, split into segments, and embedded into an in-memory index.
//! Each [`AnswerPipeline::answer`] call then runs the fixed sequence
//!
//! ```text
//! embed question -> retrieve segments -> render prompt
//!     -> audit record -> model call -> answer text
//! ```
//!
//! The audit step sits between prompt rendering and the model call; if it
//! fails, the model is never contacted.

use std::sync::Arc;

use tracing::info;

use crate::audit::{AuditSink, PangeaAudit};
use crate::chat::{ChatMessage, ChatModel, Invocation, OpenAiChat};
use crate::chunk;
use crate::config::{Config, Credentials};
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::error::Result;
use crate::loader;
use crate::prompt;
use crate::store::{MemoryVectorStore, Retriever};

/// A ready-to-serve question answering pipeline.
pub struct AnswerPipeline {
    retriever: Retriever,
    chat: Arc<dyn ChatModel>,
    audit: Arc<dyn AuditSink>,
}

impl AnswerPipeline {
    pub fn new(
        retriever: Retriever,
        chat: Arc<dyn ChatModel>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            retriever,
            chat,
            audit,
        }
    }

    /// Answer a question over the indexed corpus.
    ///
    /// The exact prompt sent to the model is what the audit sink saw; an
    /// audit failure aborts the call before the model is contacted.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let segments = self.retriever.retrieve(question).await?;
        let rendered = prompt::render(question, &segments);

        let invocation = Invocation {
            name: self.chat.name().to_string(),
            messages: vec![ChatMessage::user(rendered)],
        };

        self.audit.on_invocation_start(&invocation).await?;
        self.chat.complete(&invocation.messages).await
    }
}

/// Build the pipeline from configuration and credentials.
///
/// The audit client is constructed before anything else so that an
/// unusable audit channel stops the run before any file or network I/O.
/// Corpus loading, splitting, or indexing failures are fatal here; there
/// is no serving with a partial index.
pub async fn build(config: &Config, credentials: &Credentials) -> Result<AnswerPipeline> {
    config.validate()?;

    let audit: Arc<dyn AuditSink> = Arc::new(PangeaAudit::new(
        credentials.audit_token.clone(),
        &config.audit,
    )?);

    let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(
        &config.embedding,
        credentials.openai_api_key.clone(),
    )?);
    let chat: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
        &config.chat,
        credentials.openai_api_key.clone(),
    )?);
    info!(
        embedding = embedder.model_name(),
        chat = chat.name(),
        "initialized model clients"
    );

    let documents = loader::load_corpus(&config.corpus)?;
    info!(
        documents = documents.len(),
        dir = %config.corpus.dir.display(),
        "loaded corpus"
    );

    let segments = chunk::split_documents(&documents, &config.chunking);
    info!(segments = segments.len(), "split corpus into segments");

    let store =
        MemoryVectorStore::build(embedder.as_ref(), segments, config.embedding.batch_size).await?;
    info!(entries = store.len(), "built in-memory vector index");

    let retriever = Retriever::new(store, embedder, config.retrieval.top_k);

    Ok(AnswerPipeline::new(retriever, chat, audit))
}
