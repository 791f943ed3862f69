use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::quiz::{
    bank::QuestionBank,
    models::{
        ALL_CATEGORIES, AnswerRecord, Outcome, Progress, PublicQuestion, Question, QuestionId,
        QuizEvent, QuizResults, QuizStatus, RevealTicket, ReviewEntry, SessionSnapshot,
    },
    scoring,
};

/// One quiz attempt over a category-filtered view of the bank.
///
/// Every transition either applies or is ignored when its precondition does
/// not hold. Nothing here fails. Committing an answer opens a reveal window
/// that only the matching [`RevealTicket`] can close, and any reset bumps the
/// generation so tickets from an earlier attempt are dropped.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    bank: Arc<QuestionBank>,
    filtered: Vec<QuestionId>,
    selected_category: String,
    current_index: usize,
    selected_option: Option<usize>,
    score: usize,
    is_complete: bool,
    history: Vec<AnswerRecord>,
    explanation_visible: bool,
    generation: u64,
    events: Vec<QuizEvent>,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        let filtered = filtered_ids(&bank, ALL_CATEGORIES);
        Self {
            id: Uuid::new_v4(),
            bank,
            filtered,
            selected_category: ALL_CATEGORIES.to_string(),
            current_index: 0,
            selected_option: None,
            score: 0,
            is_complete: false,
            history: vec![],
            explanation_visible: false,
            generation: 0,
            events: vec![],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> QuizStatus {
        match self.is_complete {
            true => QuizStatus::Complete,
            false => QuizStatus::InProgress,
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn explanation_visible(&self) -> bool {
        self.explanation_visible
    }

    pub fn total_questions(&self) -> usize {
        self.filtered.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete {
            return None;
        }

        self.filtered
            .get(self.current_index)
            .and_then(|id| self.bank.question(*id))
    }

    pub fn is_last_question(&self) -> bool {
        !self.filtered.is_empty() && self.current_index + 1 == self.filtered.len()
    }

    pub fn select_option(&mut self, index: usize) -> Outcome {
        if self.is_complete || self.explanation_visible {
            return Outcome::Ignored;
        }

        let Some(question) = self.current_question() else {
            return Outcome::Ignored;
        };

        if question.option(index).is_none() {
            return Outcome::Ignored;
        }

        self.selected_option = Some(index);
        Outcome::Applied
    }

    /// Records the pending choice and opens the reveal window.
    pub fn commit_answer(&mut self) -> Option<RevealTicket> {
        if self.is_complete || self.explanation_visible {
            return None;
        }

        let selected = self.selected_option?;
        let question = self.current_question()?;

        let is_correct = question.is_correct(selected);
        let record = AnswerRecord {
            question_id: question.id,
            question_text: question.text.clone(),
            selected_index: selected,
            correct_index: question.correct_index,
            is_correct,
            explanation: question.explanation.clone(),
        };

        let event = match is_correct {
            true => QuizEvent::AnsweredCorrectly {
                question_id: question.id,
            },
            false => QuizEvent::AnsweredIncorrectly {
                question_id: question.id,
                correct_index: question.correct_index,
            },
        };

        debug!(
            "Session {} answered {} with {} (correct: {})",
            self.id, record.question_id, selected, is_correct
        );

        self.history.push(record);
        if is_correct {
            self.score += 1;
        }
        self.explanation_visible = true;
        self.events.push(event);

        Some(RevealTicket {
            generation: self.generation,
            position: self.current_index,
        })
    }

    /// Ends the reveal window, then advances or completes.
    pub fn close_reveal(&mut self, ticket: RevealTicket) -> Outcome {
        if ticket.generation != self.generation
            || ticket.position != self.current_index
            || !self.explanation_visible
            || self.is_complete
        {
            debug!("Session {} dropped stale reveal ticket {:?}", self.id, ticket);
            return Outcome::Ignored;
        }

        self.explanation_visible = false;

        if self.current_index + 1 >= self.filtered.len() {
            self.is_complete = true;
            self.events.push(QuizEvent::QuizCompleted {
                score: self.score,
                total: self.filtered.len(),
            });
        } else {
            self.current_index += 1;
            self.selected_option = None;
        }

        Outcome::Applied
    }

    pub fn select_category(&mut self, category: &str) -> Outcome {
        if !self.bank.has_category(category) {
            return Outcome::Ignored;
        }

        self.selected_category = category.to_string();
        self.filtered = filtered_ids(&self.bank, category);
        self.reset()
    }

    pub fn reset(&mut self) -> Outcome {
        self.current_index = 0;
        self.selected_option = None;
        self.score = 0;
        self.is_complete = false;
        self.history.clear();
        self.explanation_visible = false;
        self.generation += 1;
        Outcome::Applied
    }

    pub fn take_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn progress(&self) -> Option<Progress> {
        let total = self.filtered.len();
        if total == 0 {
            return None;
        }

        let position = (self.current_index + 1).min(total);
        Some(Progress {
            position,
            total,
            percent: scoring::percentage(position, total),
        })
    }

    pub fn results(&self) -> QuizResults {
        scoring::results(self.score, self.filtered.len())
    }

    /// Joins each answer back to its question by id.
    pub fn review(&self) -> Vec<ReviewEntry> {
        self.history
            .iter()
            .enumerate()
            .map(|(idx, answer)| {
                let question = self.bank.question(answer.question_id);
                let option_text = |i: usize| {
                    question
                        .and_then(|q| q.option(i))
                        .map(|o| o.to_string())
                };

                ReviewEntry {
                    number: idx + 1,
                    question_id: answer.question_id,
                    question_text: answer.question_text.clone(),
                    selected_answer: option_text(answer.selected_index),
                    correct_answer: option_text(answer.correct_index),
                    is_correct: answer.is_correct,
                    explanation: answer.explanation.clone(),
                }
            })
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id(),
            status: self.status(),
            selected_category: self.selected_category().to_string(),
            current_index: self.current_index(),
            selected_option: self.selected_option(),
            score: self.score(),
            total_questions: self.total_questions(),
            answered: self.history().len(),
            explanation_visible: self.explanation_visible(),
            is_last_question: self.is_last_question(),
            current_question: self
                .current_question()
                .map(|q| PublicQuestion::from_question(q, self.explanation_visible)),
            progress: self.progress(),
        }
    }
}

fn filtered_ids(bank: &QuestionBank, category: &str) -> Vec<QuestionId> {
    bank.filtered(category).iter().map(|q| q.id).collect()
}
