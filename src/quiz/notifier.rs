use serde::Serialize;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{info, warn};

use crate::quiz::models::{QuizEvent, SessionEvent};

const TOAST_DURATION_MS: u64 = 1500;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastStatus {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub status: ToastStatus,
    pub duration_ms: u64,
}

impl Toast {
    pub fn from_event(event: &QuizEvent) -> Self {
        let (title, description, status) = match event {
            QuizEvent::AnsweredCorrectly { .. } => {
                ("Correct! 🎉".to_string(), "Great job!".to_string(), ToastStatus::Success)
            }
            QuizEvent::AnsweredIncorrectly { .. } => (
                "Not quite right".to_string(),
                "Keep learning!".to_string(),
                ToastStatus::Warning,
            ),
            QuizEvent::QuizCompleted { score, total } => (
                "Quiz complete!".to_string(),
                format!("You scored {} / {}", score, total),
                ToastStatus::Info,
            ),
        };

        Self {
            title,
            description,
            status,
            duration_ms: TOAST_DURATION_MS,
        }
    }
}

/// Drains the session event feed until every sender is gone.
pub fn spawn_notifier(mut events: Receiver<SessionEvent>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent {
                    session_id,
                    event,
                    emitted_at,
                }) => {
                    let toast = Toast::from_event(&event);
                    info!(
                        "[{}] session {}: {} - {}",
                        emitted_at.to_rfc3339(),
                        session_id,
                        toast.title,
                        toast.description
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Notifier lagged behind, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
