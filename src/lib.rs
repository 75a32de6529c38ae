//! # Audit QA
//!
//! Retrieval-augmented question answering over local markdown with audited
//! model calls.
//!
//! Audit QA loads a directory of markdown files, splits them into
//! overlapping segments, and embeds them into an in-memory vector index at
//! startup. Questions are answered by retrieving the most similar segments,
//! rendering them into a prompt, and sending that prompt to a chat model.
//! Every model call is preceded by an audit record delivered to Pangea
//! Secure Audit Log; if the record cannot be delivered, the model is not
//! called.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Corpus  │──▶│   Chunk +   │──▶│  In-memory   │
//! │ (*.md)  │   │   Embed     │   │ vector index │
//! └─────────┘   └─────────────┘   └──────┬───────┘
//!                                        │
//!                ┌───────────────────────┘
//!                ▼
//!   question ─▶ retrieve ─▶ prompt ─▶ audit ─▶ model ─▶ answer
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export PANGEA_AUDIT_TOKEN=pts_...
//! export OPENAI_API_KEY=sk-...
//! aqa "What is our refund policy?"
//! aqa --model gpt-4o "What changed last quarter?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credentials |
//! | [`models`] | Core data types |
//! | [`loader`] | Corpus file loading |
//! | [`chunk`] | Recursive text splitting |
//! | [`embedding`] | Embedding provider client and similarity |
//! | [`store`] | In-memory vector index and retriever |
//! | [`prompt`] | Prompt rendering |
//! | [`audit`] | Fail-closed audit logging |
//! | [`chat`] | Chat model client |
//! | [`pipeline`] | End-to-end assembly |
//! | [`error`] | Error taxonomy |

pub mod audit;
pub mod chat;
pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod store;
