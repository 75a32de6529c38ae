//! Prompt assembly for retrieval-augmented answering.
//!
//! The instruction wording is part of the system's external contract and
//! must not drift: answer quality baselines and audit records both assume
//! this exact text.

use crate::models::Segment;

/// Render the full prompt for a question and its retrieved context.
///
/// Segment texts are joined in retrieval order with a blank line and
/// substituted verbatim; nothing is truncated or reformatted. An empty
/// segment list yields an empty context block, and the model is expected
/// to answer that it does not know.
pub fn render(question: &str, segments: &[Segment]) -> String {
    let context = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an assistant for question-answering tasks. \
         Use the following pieces of retrieved context to answer the question. \
         If you don't know the answer, just say that you don't know. \
         Use three sentences maximum and keep the answer concise.\n\
         Question: {question}\n\
         Context: {context}\n\
         Answer:"
    )
}
