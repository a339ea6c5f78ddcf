use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::Cloudy;
use crate::model::account::{Session, User};
use crate::model::config::Config;
use crate::model::errors::{CloudErrKind, CloudResult, Unexpected};

pub static SESSION_FILE: &str = "session.json";

/// Holds the authenticated session, if any. A "remembered" session is also
/// written to disk under the writeable path so it survives the process; a
/// session without `remember` lives here only, the way the browser kept it in
/// sessionStorage rather than localStorage.
#[derive(Default, Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn session_path(config: &Config) -> PathBuf {
        PathBuf::from(&config.writeable_path).join(SESSION_FILE)
    }

    /// Rehydrates a remembered session from disk. A missing file means signed
    /// out; an unreadable one is treated the same way rather than wedging
    /// startup.
    pub fn restore(config: &Config) -> Self {
        let path = Self::session_path(config);
        let current = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => Some(session),
                Err(err) => {
                    warn!("discarding unreadable session file: {err}");
                    None
                }
            },
            Err(_) => None,
        };

        Self { current: Arc::new(RwLock::new(current)) }
    }

    pub async fn get(&self) -> CloudResult<Session> {
        self.current
            .read()
            .await
            .clone()
            .ok_or_else(|| CloudErrKind::AccountNonexistent.into())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }
}

impl Cloudy {
    pub async fn get_session(&self) -> CloudResult<Session> {
        self.session.get().await
    }

    pub async fn get_user(&self) -> CloudResult<User> {
        Ok(self.session.get().await?.user)
    }

    /// The bearer token for an outgoing request. Every call counts as user
    /// activity for the idle watcher.
    pub(crate) async fn bearer(&self) -> CloudResult<String> {
        self.idle.record_activity().await;
        Ok(self.session.get().await?.token)
    }

    #[doc(hidden)]
    pub async fn cache_session(&self, session: Session) -> CloudResult<()> {
        if session.remember {
            let bytes = serde_json::to_vec_pretty(&session).map_unexpected()?;
            fs::write(SessionStore::session_path(&self.config), bytes)?;
        }
        *self.session.current.write().await = Some(session);
        Ok(())
    }

    /// Drops the session from memory and disk; returns what was dropped.
    pub(crate) async fn forget_session(&self) -> Option<Session> {
        let dropped = self.session.current.write().await.take();
        let path = SessionStore::session_path(&self.config);
        if path.exists() {
            fs::remove_file(&path).log_and_ignore();
        }
        dropped
    }
}
