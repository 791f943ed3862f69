use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::notifier::Toast;

pub const ALL_CATEGORIES: &str = "All";
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub category: String,
    pub explanation: String,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(|o| o.as_str())
    }

    pub fn is_correct(&self, index: usize) -> bool {
        self.correct_index == index
    }
}

/// Question as stored in a bank file, before ids are assigned.
#[derive(Debug, Deserialize, Clone)]
pub struct QuestionRecord {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub category: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct BankFile {
    pub categories: Vec<String>,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub label: String,
    pub question_count: usize,
    pub available: bool,
}

/// Question without its answer key.
#[derive(Debug, Serialize, Clone)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl PublicQuestion {
    pub fn from_question(question: &Question, reveal: bool) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            options: question.options.clone(),
            category: question.category.clone(),
            explanation: reveal.then(|| question.explanation.clone()),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub question_text: String,
    pub selected_index: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    InProgress,
    Complete,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored,
}

/// Closes the reveal window opened by one specific commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    pub generation: u64,
    pub position: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Top,
    High,
    Mid,
    Low,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub text: &'static str,
    pub tier: BadgeTier,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub badge: Badge,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub number: usize,
    pub question_id: QuestionId,
    pub question_text: String,
    pub selected_answer: Option<String>,
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    AnsweredCorrectly {
        question_id: QuestionId,
    },
    AnsweredIncorrectly {
        question_id: QuestionId,
        correct_index: usize,
    },
    QuizCompleted {
        score: usize,
        total: usize,
    },
}

#[derive(Debug, Serialize, Clone)]
pub struct SessionEvent {
    pub session_id: Uuid,
    pub event: QuizEvent,
    pub emitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: QuizStatus,
    pub selected_category: String,
    pub current_index: usize,
    pub selected_option: Option<usize>,
    pub score: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub explanation_visible: bool,
    pub is_last_question: bool,
    pub current_question: Option<PublicQuestion>,
    pub progress: Option<Progress>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectOptionRequest {
    pub index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectCategoryRequest {
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub outcome: Outcome,
    pub session: SessionSnapshot,
    pub notifications: Vec<Toast>,
}
