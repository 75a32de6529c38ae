//! Error taxonomy for the answering pipeline.
//!
//! Each variant corresponds to one pipeline phase. [`Error::Config`],
//! [`Error::Load`], and [`Error::Embedding`] only occur while the pipeline
//! is being built and terminate the run. [`Error::Retrieval`],
//! [`Error::Audit`], and [`Error::Model`] occur per question and leave the
//! built index usable for further questions.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or credentials, caught before any I/O.
    #[error("config error: {0}")]
    Config(String),

    /// Corpus directory or file could not be read.
    #[error("load error: {0}")]
    Load(String),

    /// Embedding provider failed while the index was being built.
    /// The index is discarded; a partial index is never kept.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Query-time failure while embedding or scoring a question.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Audit record could not be delivered. The model call it was meant
    /// to precede must not run.
    #[error("audit error: {0}")]
    Audit(String),

    /// Chat model call failed after its audit record was delivered.
    #[error("model error: {0}")]
    Model(String),
}
