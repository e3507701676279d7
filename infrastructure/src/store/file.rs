//! JSON-file session store
//!
//! One file per session, `session_<id>.json`, under a single directory.
//! Writes go to a temp file that is synced and renamed over the target, so
//! a reader never sees a half-written session.

use async_trait::async_trait;
use namesmith_application::ports::session_store::{SessionStore, StoreError};
use namesmith_domain::{Session, SessionId};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the directory and drop temp files left by interrupted writes
    pub async fn init(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        self.recover_interrupted_writes().await;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_path(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("session_{}.json", id))
    }

    async fn write_atomic(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, content).await?;

        let tmp_path_clone = tmp_path.clone();
        match tokio::task::spawn_blocking(move || {
            std::fs::File::open(&tmp_path_clone).and_then(|file| file.sync_all())
        })
        .await
        {
            Err(e) => warn!(error = %e, "Failed to sync temp file to disk"),
            Ok(Err(e)) => warn!(error = %e, "Failed to sync temp file to disk"),
            Ok(Ok(())) => {}
        }

        fs::rename(&tmp_path, path).await?;
        debug!(path = %path.display(), "Atomic write completed");
        Ok(())
    }

    async fn recover_interrupted_writes(&self) {
        if let Ok(mut entries) = fs::read_dir(&self.dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "tmp") {
                    debug!(path = %path.display(), "Removing interrupted write");
                    let _ = fs::remove_file(&path).await;
                }
            }
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let path = self.session_path(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(session)?;
        self.write_atomic(&self.session_path(&session.id), &content)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namesmith_domain::{Availability, DomainName, Partition};

    fn session() -> Session {
        Session::start(SessionId::from_parts(1_700_000_000, "a1b2c3"), "eco bakery").unwrap()
    }

    #[tokio::test]
    async fn test_roundtrip_keeps_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions"));
        store.init().await.unwrap();

        let mut session = session();
        let name = DomainName::parse("leafly.io").unwrap();
        session.register_generated([&name]);
        let mut partition = Partition::new();
        partition.insert(name.clone(), "CreatorA".into(), Availability::Available);
        session.record_classified(&partition);
        store.save(&session).await.unwrap();

        let loaded = store.load(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded, session);
        assert!(loaded.seen.contains(&name));
        assert!(
            store
                .session_path(&session.id)
                .ends_with("session_1700000000_a1b2c3.json")
        );
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let id = SessionId::from_parts(1, "ffffff");
        assert!(store.load(&id).await.unwrap().is_none());
        assert!(store.load_or_empty(&id).await.unwrap().seen.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let id = SessionId::from_parts(1, "ffffff");
        std::fs::write(store.session_path(&id), "{not json").unwrap();

        assert!(matches!(
            store.load(&id).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_init_removes_leftover_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let leftover = dir.path().join("session_1_ffffff.json.tmp");
        std::fs::write(&leftover, "partial").unwrap();

        FileSessionStore::new(dir.path()).init().await.unwrap();
        assert!(!leftover.exists());
    }
}
