use std::{collections::HashSet, fs::read_to_string, path::Path};

use tracing::info;

use crate::quiz::models::{
    ALL_CATEGORIES, BankFile, CategorySummary, OPTION_COUNT, Question, QuestionId, QuestionRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Question #{0} has empty text")]
    EmptyText(usize),

    #[error("Question #{0} has {1} options, expected 4")]
    OptionCount(usize, usize),

    #[error("Question #{0} has duplicate option '{1}'")]
    DuplicateOption(usize, String),

    #[error("Question #{0} has correct index {1} out of range")]
    CorrectIndex(usize, usize),

    #[error("Question #{0} uses undeclared category '{1}'")]
    UnknownCategory(usize, String),

    #[error("Category '{0}' is declared more than once")]
    DuplicateCategory(String),

    #[error("Category 'All' is reserved")]
    ReservedCategory,

    #[error("Failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static question set plus its ordered category labels, starting with `All`.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    categories: Vec<String>,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(declared: Vec<String>, records: Vec<QuestionRecord>) -> Result<Self, BankError> {
        let mut seen = HashSet::new();
        for label in &declared {
            if label == ALL_CATEGORIES {
                return Err(BankError::ReservedCategory);
            }
            if !seen.insert(label.as_str()) {
                return Err(BankError::DuplicateCategory(label.clone()));
            }
        }

        let mut questions = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            let number = idx + 1;

            if record.text.trim().is_empty() {
                return Err(BankError::EmptyText(number));
            }

            if record.options.len() != OPTION_COUNT {
                return Err(BankError::OptionCount(number, record.options.len()));
            }

            let mut distinct = HashSet::new();
            if let Some(dup) = record.options.iter().find(|o| !distinct.insert(o.as_str())) {
                return Err(BankError::DuplicateOption(number, dup.clone()));
            }

            if record.correct_index >= record.options.len() {
                return Err(BankError::CorrectIndex(number, record.correct_index));
            }

            if !seen.contains(record.category.as_str()) {
                return Err(BankError::UnknownCategory(number, record.category));
            }

            questions.push(Question {
                id: QuestionId(idx as u32),
                text: record.text,
                options: record.options,
                correct_index: record.correct_index,
                category: record.category,
                explanation: record.explanation,
            });
        }

        let mut categories = Vec::with_capacity(declared.len() + 1);
        categories.push(ALL_CATEGORIES.to_string());
        categories.extend(declared);

        Ok(Self {
            categories,
            questions,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(json)?;
        Self::new(file.categories, file.questions)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let bank = Self::from_json_str(&read_to_string(path)?)?;
        info!(
            "Loaded {} questions from {}",
            bank.questions.len(),
            path.display()
        );
        Ok(bank)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c == label)
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(id.0 as usize).filter(|q| q.id == id)
    }

    pub fn filtered(&self, category: &str) -> Vec<&Question> {
        filtered_questions(&self.questions, category)
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|label| {
                let question_count = self.filtered(label).len();
                CategorySummary {
                    label: label.clone(),
                    question_count,
                    available: question_count > 0,
                }
            })
            .collect()
    }

    /// The disaster-preparedness bank shipped with the app.
    pub fn builtin() -> Result<Self, BankError> {
        let categories = ["Earthquake", "Flood", "Cyclone", "Fire"]
            .map(String::from)
            .to_vec();

        let questions = vec![
            record(
                "What should you do during an earthquake?",
                ["Run outside", "Drop, Cover, Hold", "Stand near windows", "Use the lift"],
                1,
                "Earthquake",
                "Drop, Cover, and Hold is the safest position during an earthquake. It protects you from falling objects.",
            ),
            record(
                "After an earthquake, what should you do first?",
                [
                    "Call friends immediately",
                    "Check for injuries and hazards",
                    "Turn on all lights",
                    "Go outside to see damage",
                ],
                1,
                "Earthquake",
                "First check yourself and others for injuries, then assess your surroundings for hazards like gas leaks.",
            ),
            record(
                "Flood warning is issued. What is the safest action?",
                [
                    "Go to the basement",
                    "Move to higher ground",
                    "Drive through water",
                    "Wait at home",
                ],
                1,
                "Flood",
                "Moving to higher ground is crucial during floods. Never drive through flood waters.",
            ),
            record(
                "How deep can flood water be before it's dangerous to walk in?",
                ["Any depth is safe", "6 inches deep", "2 feet deep", "10 feet deep"],
                1,
                "Flood",
                "Even 6 inches of moving water can knock you down. 12 inches can sweep away a car.",
            ),
            record(
                "During a cyclone, you should:",
                [
                    "Go to the beach to watch",
                    "Stay indoors away from windows",
                    "Open all windows",
                    "Go outside to secure objects",
                ],
                1,
                "Cyclone",
                "Stay indoors and away from windows during cyclones. Flying debris can be extremely dangerous.",
            ),
            record(
                "If your clothes catch fire, you should:",
                ["Run fast", "Stop, Drop, and Roll", "Use water immediately", "Call for help"],
                1,
                "Fire",
                "Stop, Drop, and Roll helps extinguish flames on your clothes.",
            ),
        ];

        Self::new(categories, questions)
    }
}

fn record(
    text: &str,
    options: [&str; OPTION_COUNT],
    correct_index: usize,
    category: &str,
    explanation: &str,
) -> QuestionRecord {
    QuestionRecord {
        text: text.into(),
        options: options.map(String::from).to_vec(),
        correct_index,
        category: category.into(),
        explanation: explanation.into(),
    }
}

/// `All` keeps every question, any other label keeps its own, order preserved.
pub fn filtered_questions<'a>(questions: &'a [Question], category: &str) -> Vec<&'a Question> {
    if category == ALL_CATEGORIES {
        return questions.iter().collect();
    }

    questions.iter().filter(|q| q.category == category).collect()
}
