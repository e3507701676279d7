//! Hand-written port doubles shared by the use case tests.

use crate::ports::availability_oracle::{AvailabilityOracle, OracleError};
use crate::ports::llm_gateway::{AgentProfile, GatewayError, LlmGateway, LlmSession};
use crate::ports::session_store::{SessionStore, StoreError};
use async_trait::async_trait;
use namesmith_domain::{DomainName, Model, OracleVerdict, Session, SessionId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = dyn Fn(&AgentProfile, &str, &str) -> Result<String, GatewayError> + Send + Sync;

/// One call observed by [`ScriptedGateway`]
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub model: Model,
    pub system: String,
    pub prompt: String,
}

/// Gateway whose answers come from a closure over (profile, system, prompt)
#[derive(Clone)]
pub(crate) struct ScriptedGateway {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Duration,
}

impl ScriptedGateway {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&AgentProfile, &str, &str) -> Result<String, GatewayError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Hold every answer back by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Gateway that always fails
    pub fn failing() -> Self {
        Self::new(|_, _, _| Err(GatewayError::RequestFailed("scripted failure".to_string())))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

struct ScriptedSession {
    profile: AgentProfile,
    system: String,
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Duration,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &Model {
        &self.profile.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: self.profile.model.clone(),
            system: self.system.clone(),
            prompt: content.to_string(),
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)(&self.profile, &self.system, content)
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session_with_system_prompt(
        &self,
        profile: &AgentProfile,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ScriptedSession {
            profile: profile.clone(),
            system: system_prompt.to_string(),
            responder: Arc::clone(&self.responder),
            calls: Arc::clone(&self.calls),
            delay: self.delay,
        }))
    }
}

type Verdicts = dyn Fn(&DomainName) -> Result<OracleVerdict, OracleError> + Send + Sync;

/// Oracle whose verdicts come from a closure
pub(crate) struct ScriptedOracle {
    verdicts: Box<Verdicts>,
    checks: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new<F>(verdicts: F) -> Self
    where
        F: Fn(&DomainName) -> Result<OracleVerdict, OracleError> + Send + Sync + 'static,
    {
        Self {
            verdicts: Box::new(verdicts),
            checks: AtomicUsize::new(0),
        }
    }

    pub fn always(verdict: OracleVerdict) -> Self {
        Self::new(move |_| Ok(verdict))
    }

    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn check(&self, name: &DomainName) -> Result<OracleVerdict, OracleError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        (self.verdicts)(name)
    }
}

/// In-process store counting writes
#[derive(Default)]
pub(crate) struct TestStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    saves: AtomicUsize,
}

impl TestStore {
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for TestStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }
}

pub(crate) fn domains_json(names: &[String]) -> String {
    serde_json::json!({ "domains": names }).to_string()
}

pub(crate) fn test_session_id() -> SessionId {
    SessionId::from_parts(1_700_000_000, "abc123")
}
