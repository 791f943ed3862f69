use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    common::server_error::ServerError,
    config::config::AppConfig,
    quiz::{bank::QuestionBank, store::SessionStore},
};

pub struct AppState {
    bank: Arc<QuestionBank>,
    sessions: SessionStore,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, ServerError> {
        let bank = match &config.quiz.bank_path {
            Some(path) => QuestionBank::from_json_file(path)?,
            None => {
                info!("No question bank path configured, using the builtin bank");
                QuestionBank::builtin()?
            }
        };

        Ok(Self::from_bank(
            bank,
            config.quiz.reveal_window(),
            config.quiz.session_idle(),
        ))
    }

    pub fn from_bank(
        bank: QuestionBank,
        reveal_window: Duration,
        session_idle: Duration,
    ) -> Arc<Self> {
        let bank = Arc::new(bank);
        let sessions = SessionStore::new(bank.clone(), reveal_window, session_idle);

        Arc::new(Self { bank, sessions })
    }

    pub fn get_bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn get_sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
