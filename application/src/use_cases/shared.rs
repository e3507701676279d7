//! Shared utilities for use cases.
//!
//! Every agent call goes through [`ask_agent`]: one fresh session per call,
//! a hard timeout, and a transcript entry for the prompt and the outcome.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::{AgentProfile, GatewayError, LlmGateway};
use namesmith_domain::SessionId;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// One prompt sent to one agent role
pub(crate) struct AgentRequest<'a> {
    pub session: &'a SessionId,
    /// Role label for logs (e.g. "question", "CreatorA")
    pub role: &'a str,
    pub profile: &'a AgentProfile,
    pub system: &'a str,
    pub prompt: &'a str,
}

/// Send a single prompt and return the raw response text.
///
/// Timeouts surface as [`GatewayError::Timeout`]. Callers decide the safe
/// default for failures.
pub(crate) async fn ask_agent<G: LlmGateway + ?Sized>(
    gateway: &G,
    logger: &dyn ConversationLogger,
    request: AgentRequest<'_>,
    timeout: Duration,
) -> Result<String, GatewayError> {
    let AgentRequest {
        session,
        role,
        profile,
        system,
        prompt,
    } = request;

    logger.log(
        ConversationEvent::new(
            "llm_prompt",
            json!({
                "role": role,
                "model": profile.model.to_string(),
                "temperature": profile.temperature,
                "system": system,
                "prompt": prompt,
            }),
        )
        .for_session(session),
    );

    let call = async {
        let llm = gateway
            .create_session_with_system_prompt(profile, system)
            .await?;
        llm.send(prompt).await
    };

    let result = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    };

    match &result {
        Ok(text) => {
            debug!(session = %session, role, "raw response: {}", text);
            logger.log(
                ConversationEvent::new(
                    "llm_response",
                    json!({
                        "role": role,
                        "model": profile.model.to_string(),
                        "bytes": text.len(),
                        "text": text,
                    }),
                )
                .for_session(session),
            );
        }
        Err(e) => {
            logger.log(
                ConversationEvent::new(
                    "llm_error",
                    json!({
                        "role": role,
                        "model": profile.model.to_string(),
                        "error": e.to_string(),
                    }),
                )
                .for_session(session),
            );
        }
    }

    result
}
