use std::sync::Arc;

use tracing::level_filters::LevelFilter;

use crate::quiz::{bank::QuestionBank, models::QuestionRecord};

mod config;
mod session_store;

fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

fn builtin_bank() -> Arc<QuestionBank> {
    Arc::new(QuestionBank::builtin().expect("builtin bank is valid"))
}

fn question(text: &str, category: &str, correct_index: usize) -> QuestionRecord {
    QuestionRecord {
        text: text.into(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_index,
        category: category.into(),
        explanation: format!("Because {}", text),
    }
}

/// Declares a `Tsunami` category that no question uses.
fn bank_with_empty_category() -> Arc<QuestionBank> {
    let bank = QuestionBank::new(
        vec!["Earthquake".into(), "Tsunami".into()],
        vec![question("Where do you shelter?", "Earthquake", 2)],
    )
    .expect("bank is valid");

    Arc::new(bank)
}
