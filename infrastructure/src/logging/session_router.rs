//! Per-session transcript files
//!
//! Events tagged with a session go to `<logs_dir>/session_<id>.jsonl`;
//! untagged events go to `<logs_dir>/namesmith.jsonl`. Files are opened on
//! first use and kept open.

use super::JsonlConversationLogger;
use namesmith_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use namesmith_domain::SessionId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct SessionLogRouter {
    logs_dir: PathBuf,
    loggers: Mutex<HashMap<Option<SessionId>, Option<Arc<JsonlConversationLogger>>>>,
}

impl SessionLogRouter {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            loggers: Mutex::new(HashMap::new()),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn path_for(&self, session: Option<&SessionId>) -> PathBuf {
        match session {
            Some(id) => self.logs_dir.join(format!("session_{}.jsonl", id)),
            None => self.logs_dir.join("namesmith.jsonl"),
        }
    }

    fn logger_for(&self, session: Option<&SessionId>) -> Option<Arc<JsonlConversationLogger>> {
        let mut loggers = self.loggers.lock().ok()?;
        loggers
            .entry(session.cloned())
            // A file that cannot be opened is remembered as `None` and not retried
            .or_insert_with(|| JsonlConversationLogger::new(self.path_for(session)).map(Arc::new))
            .clone()
    }
}

impl ConversationLogger for SessionLogRouter {
    fn log(&self, event: ConversationEvent) {
        if let Some(logger) = self.logger_for(event.session.as_ref()) {
            logger.log(event);
        }
    }
}
