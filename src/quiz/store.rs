use std::{sync::Arc, time::Duration};

use chrono::Utc;
use dashmap::DashMap;
use tokio::{
    sync::broadcast::{self, Receiver, Sender},
    time::Instant,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::quiz::{
    bank::QuestionBank,
    models::{
        Outcome, QuizEvent, QuizResults, ReviewEntry, SessionEvent, SessionResponse,
        SessionSnapshot,
    },
    notifier::Toast,
    session::QuizSession,
};

const EVENT_BUFFER: usize = 256;
const MAX_CLEANUP_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Quiz session {0} does not exist")]
    NotFound(Uuid),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

#[derive(Debug)]
struct TrackedSession {
    session: QuizSession,
    last_seen: Instant,
}

impl TrackedSession {
    fn new(session: QuizSession) -> Self {
        Self {
            session,
            last_seen: Instant::now(),
        }
    }
}

/// In-memory quiz sessions, one per active quiz view.
///
/// Views that go away without deleting their session are evicted once they
/// have been idle for `idle_timeout`, see [`SessionStore::spawn_cleanup`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    bank: Arc<QuestionBank>,
    sessions: Arc<DashMap<Uuid, TrackedSession>>,
    events: Sender<SessionEvent>,
    reveal_window: Duration,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(bank: Arc<QuestionBank>, reveal_window: Duration, idle_timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            bank,
            sessions: Arc::new(DashMap::new()),
            events,
            reveal_window,
            idle_timeout,
        }
    }

    pub fn reveal_window(&self) -> Duration {
        self.reveal_window
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn create(&self, category: Option<&str>) -> Result<SessionSnapshot, SessionError> {
        let mut session = QuizSession::new(self.bank.clone());

        if let Some(category) = category {
            self.ensure_category(category)?;
            session.select_category(category);
        }

        let snapshot = session.snapshot();
        info!(
            "Created quiz session {} for category '{}' with {} questions",
            snapshot.id, snapshot.selected_category, snapshot.total_questions
        );
        self.sessions
            .insert(snapshot.id, TrackedSession::new(session));

        Ok(snapshot)
    }

    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .remove(&id)
            .map(|_| info!("Discarded quiz session {}", id))
            .ok_or(SessionError::NotFound(id))
    }

    pub fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        self.read(id, |s| s.snapshot())
    }

    pub fn results(&self, id: Uuid) -> Result<QuizResults, SessionError> {
        self.read(id, |s| s.results())
    }

    pub fn review(&self, id: Uuid) -> Result<Vec<ReviewEntry>, SessionError> {
        self.read(id, |s| s.review())
    }

    pub fn select_option(&self, id: Uuid, index: usize) -> Result<SessionResponse, SessionError> {
        self.apply(id, |s| s.select_option(index))
    }

    pub fn select_category(
        &self,
        id: Uuid,
        category: &str,
    ) -> Result<SessionResponse, SessionError> {
        self.ensure_category(category)?;
        self.apply(id, |s| s.select_category(category))
    }

    pub fn reset(&self, id: Uuid) -> Result<SessionResponse, SessionError> {
        self.apply(id, |s| s.reset())
    }

    /// Commits the pending answer and schedules the end of its reveal window.
    pub fn commit(&self, id: Uuid) -> Result<SessionResponse, SessionError> {
        let mut ticket = None;
        let response = self.apply(id, |s| {
            ticket = s.commit_answer();
            match ticket {
                Some(_) => Outcome::Applied,
                None => Outcome::Ignored,
            }
        })?;

        if let Some(ticket) = ticket {
            let store = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(store.reveal_window).await;
                match store.apply(id, |s| s.close_reveal(ticket)) {
                    Ok(response) => debug!(
                        "Reveal window closed for session {}: {:?}",
                        id, response.outcome
                    ),
                    Err(e) => debug!("Reveal window expired without a session: {}", e),
                }
            });
        }

        Ok(response)
    }

    /// Drops every session nobody has touched within the idle timeout.
    pub fn evict_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, tracked| tracked.last_seen.elapsed() < self.idle_timeout);
        let removed = before.saturating_sub(self.sessions.len());

        if removed > 0 {
            info!("Evicted {} idle quiz sessions", removed);
        }

        removed
    }

    pub fn spawn_cleanup(&self) {
        let mut interval = tokio::time::interval(self.idle_timeout.min(MAX_CLEANUP_PERIOD));
        let store = self.clone();

        tokio::spawn(async move {
            loop {
                interval.tick().await;
                debug!("SessionStore is cleaning up idle sessions");
                store.evict_idle();
            }
        });
    }

    fn ensure_category(&self, category: &str) -> Result<(), SessionError> {
        match self.bank.has_category(category) {
            true => Ok(()),
            false => Err(SessionError::UnknownCategory(category.to_string())),
        }
    }

    fn read<T>(&self, id: Uuid, f: impl FnOnce(&QuizSession) -> T) -> Result<T, SessionError> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;

        entry.last_seen = Instant::now();
        Ok(f(&entry.session))
    }

    fn apply(
        &self,
        id: Uuid,
        op: impl FnOnce(&mut QuizSession) -> Outcome,
    ) -> Result<SessionResponse, SessionError> {
        let (outcome, events, session) = {
            let mut entry = self
                .sessions
                .get_mut(&id)
                .ok_or(SessionError::NotFound(id))?;

            let tracked = entry.value_mut();
            tracked.last_seen = Instant::now();
            let outcome = op(&mut tracked.session);
            (
                outcome,
                tracked.session.take_events(),
                tracked.session.snapshot(),
            )
        };

        let notifications = self.publish(id, events);
        Ok(SessionResponse {
            outcome,
            session,
            notifications,
        })
    }

    fn publish(&self, session_id: Uuid, events: Vec<QuizEvent>) -> Vec<Toast> {
        events
            .into_iter()
            .map(|event| {
                let toast = Toast::from_event(&event);
                // No subscribers is fine, the toast still goes back to the caller.
                let _ = self.events.send(SessionEvent {
                    session_id,
                    event,
                    emitted_at: Utc::now(),
                });
                toast
            })
            .collect()
    }
}
