//! Fail-closed audit logging for model invocations.
//!
//! Every model call is preceded by exactly one audit record describing the
//! prompt about to be sent. The [`AuditSink`] trait is the single
//! observation point; [`PangeaAudit`] delivers records to the Pangea
//! Secure Audit Log service. Delivery failure is an error the caller must
//! honor by not making the model call.
//!
//! Delivery is at-least-once: 429/5xx and network errors are retried with
//! the same backoff discipline as the provider clients, other 4xx fail
//! immediately.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::chat::Invocation;
use crate::config::AuditConfig;
use crate::error::{Error, Result};

/// Event type recorded for prompts sent to a model.
pub const EVENT_TYPE_USER_PROMPT: &str = "inference:user_prompt";

/// Observer notified before each model invocation.
///
/// An `Err` from [`on_invocation_start`](AuditSink::on_invocation_start)
/// vetoes the invocation: the caller must not contact the model.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn on_invocation_start(&self, invocation: &Invocation) -> Result<()>;
}

/// One audit record describing the inputs of a model invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    /// All message contents of the invocation, in their original order.
    pub event_input: Vec<String>,
    /// Name of the invoked component.
    pub event_tools: String,
    pub event_type: String,
}

/// Build the audit record for an invocation.
///
/// Returns `None` for an invocation without messages; those are not
/// audit-worthy and nothing is logged for them.
pub fn build_event(invocation: &Invocation) -> Option<AuditEvent> {
    if invocation.messages.is_empty() {
        return None;
    }
    Some(AuditEvent {
        event_input: invocation
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect(),
        event_tools: invocation.name.clone(),
        event_type: EVENT_TYPE_USER_PROMPT.to_string(),
    })
}

/// Audit sink backed by the Pangea Secure Audit Log bulk endpoint.
#[derive(Debug)]
pub struct PangeaAudit {
    token: String,
    config_id: Option<String>,
    base_url: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl PangeaAudit {
    /// Create a Pangea audit client.
    ///
    /// `domain` from the config is a bare service domain (e.g.
    /// `aws.us.pangea.cloud`) that gets the `audit.` host prefix; a value
    /// already carrying an `http://` or `https://` scheme is used verbatim
    /// as the base URL.
    ///
    /// # Errors
    ///
    /// Fails when the token is empty. An unusable audit channel must stop
    /// the pipeline before any work happens.
    pub fn new(token: String, config: &AuditConfig) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::Config("audit token must not be empty".to_string()));
        }

        let base_url = if config.domain.starts_with("http://")
            || config.domain.starts_with("https://")
        {
            config.domain.trim_end_matches('/').to_string()
        } else {
            format!("https://audit.{}", config.domain)
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token,
            config_id: config.config_id.clone(),
            base_url,
            max_retries: config.max_retries,
            client,
        })
    }

    /// Deliver a batch of audit records in one bulk call.
    async fn log_bulk(&self, events: &[AuditEvent]) -> Result<()> {
        let wrapped: Vec<serde_json::Value> = events
            .iter()
            .map(|event| serde_json::json!({ "event": event }))
            .collect();

        let mut body = serde_json::json!({ "events": wrapped });
        if let Some(ref config_id) = self.config_id {
            body["config_id"] = serde_json::Value::String(config_id.clone());
        }

        let url = format!("{}/v2/log", self.base_url);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(());
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(Error::Audit(format!(
                            "audit API error {}: {}",
                            status, body_text
                        )));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    return Err(Error::Audit(format!(
                        "audit API error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(Error::Audit(format!("audit request failed: {}", e)));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| Error::Audit("audit delivery failed after retries".to_string())))
    }
}

#[async_trait]
impl AuditSink for PangeaAudit {
    async fn on_invocation_start(&self, invocation: &Invocation) -> Result<()> {
        let Some(event) = build_event(invocation) else {
            return Ok(());
        };
        self.log_bulk(&[event]).await
    }
}
