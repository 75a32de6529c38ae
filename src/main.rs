//! # Audit QA CLI (`aqa`)
//!
//! One-shot question answering over a local markdown corpus, with every
//! model call audited first.
//!
//! ## Usage
//!
//! ```bash
//! aqa [--auditConfigId <id>] [--model <name>] [--config <path>] "<question>"
//! ```
//!
//! ## Environment
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `PANGEA_AUDIT_TOKEN` | Pangea Secure Audit Log token. When unset the CLI warns and exits 0 without doing any work. |
//! | `PANGEA_DOMAIN` | Pangea service domain. Default `aws.us.pangea.cloud`. |
//! | `OPENAI_API_KEY` | Provider API key, passed through to OpenAI unchecked. |
//!
//! A `.env` file in the working directory is honored. Logs go to stderr;
//! stdout carries nothing but the answer.
//!
//! ## Examples
//!
//! ```bash
//! # Answer a question over ./data/*.md
//! aqa "What is our refund policy?"
//!
//! # Pick the chat model and attach an audit config id
//! aqa --model gpt-4o --auditConfigId pci_xxxx "What changed last quarter?"
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use audit_qa::config::{self, Config, Credentials};
use audit_qa::pipeline;

/// Ask a question over local markdown, with every model call audited first.
///
/// Settings come from an optional TOML file (`--config`); flags override
/// it. See `config/aqa.example.toml` for the full set.
#[derive(Parser)]
#[command(
    name = "aqa",
    about = "Ask a question over local markdown, with every model call audited first",
    version
)]
struct Cli {
    /// The question to answer.
    question: String,

    /// Audit-log configuration id attached to each logged event.
    #[arg(long = "auditConfigId")]
    audit_config_id: Option<String>,

    /// Chat model to use (default: gpt-4o-mini).
    #[arg(long)]
    model: Option<String>,

    /// Path to a TOML configuration file. Built-in defaults apply when
    /// omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // An absent or empty audit token is the one soft failure: warn and
    // exit cleanly before touching config, corpus, or network.
    let audit_token = std::env::var("PANGEA_AUDIT_TOKEN").unwrap_or_default();
    if audit_token.is_empty() {
        warn!("PANGEA_AUDIT_TOKEN is not set.");
        return Ok(());
    }

    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    if let Some(model) = cli.model {
        cfg.chat.model = model;
    }
    if cli.audit_config_id.is_some() {
        cfg.audit.config_id = cli.audit_config_id;
    }
    if let Ok(domain) = std::env::var("PANGEA_DOMAIN") {
        if !domain.is_empty() {
            cfg.audit.domain = domain;
        }
    }

    let credentials = Credentials {
        audit_token,
        openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
    };

    let pipeline = pipeline::build(&cfg, &credentials).await?;
    let answer = pipeline.answer(&cli.question).await?;

    println!("{}", answer);
    Ok(())
}
