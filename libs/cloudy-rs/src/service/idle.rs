use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::Cloudy;

/// How long a session may sit with no activity before it is ended.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// How often the watcher looks at the idle clock.
const IDLE_POLL: Duration = Duration::from_secs(10);

/// Tracks when the user last did anything. Every library operation stamps the
/// clock; the background watcher ends sessions that sit idle past the
/// timeout, the way the browser client force-logged-out an untouched tab.
#[derive(Clone)]
pub struct IdleWatcher {
    last_activity: Arc<RwLock<Instant>>,
    pub timeout: Duration,
}

impl Default for IdleWatcher {
    fn default() -> Self {
        Self::new(IDLE_TIMEOUT)
    }
}

impl IdleWatcher {
    pub fn new(timeout: Duration) -> Self {
        Self { last_activity: Arc::new(RwLock::new(Instant::now())), timeout }
    }

    pub async fn record_activity(&self) {
        *self.last_activity.write().await = Instant::now();
    }

    pub async fn idle_for(&self) -> Duration {
        self.last_activity.read().await.elapsed()
    }

    pub async fn expired(&self) -> bool {
        self.idle_for().await >= self.timeout
    }
}

impl Cloudy {
    /// Spawns the idle watcher. Fires at most one forced logout per session:
    /// once the session is gone there is nothing left to expire until the
    /// next sign-in stamps the clock again.
    pub fn setup_idle_watch(&self) {
        let bg = self.clone();

        tokio::spawn(async move {
            // poll at a fraction of the timeout, never slower than the
            // default cadence
            let period = IDLE_POLL
                .min(bg.idle.timeout)
                .max(Duration::from_millis(10));
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if bg.session.is_signed_in().await && bg.idle.expired().await {
                    warn!("session idle for {:?}, signing out", bg.idle.timeout);
                    bg.logout().await;
                    bg.events.session_expired();
                }
            }
        });
    }
}
