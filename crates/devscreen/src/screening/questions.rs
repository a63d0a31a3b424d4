use std::collections::HashMap;
use std::io::Read;

use serde::Serialize;

use super::domain::{Category, Question, QuestionId};

const ID_COLUMN: &str = "id";
const TEXT_COLUMN: &str = "text";
const EXPECTED_COLUMN: &str = "expected";

/// Immutable lookup of every question in the battery, in sheet order.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionCatalogue {
    questions: Vec<Question>,
    categories: Vec<Category>,
    #[serde(skip)]
    index: HashMap<QuestionId, usize>,
}

impl QuestionCatalogue {
    /// Build a catalogue from already parsed questions. Category order follows first appearance.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionCatalogueError> {
        let mut categories: Vec<Category> = Vec::new();
        for category in questions.iter().flat_map(|question| &question.categories) {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
        Self::with_categories(questions, categories)
    }

    fn with_categories(
        questions: Vec<Question>,
        categories: Vec<Category>,
    ) -> Result<Self, QuestionCatalogueError> {
        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if index.insert(question.id.clone(), position).is_some() {
                return Err(QuestionCatalogueError::DuplicateQuestion(
                    question.id.clone(),
                ));
            }
        }

        Ok(Self {
            questions,
            categories,
            index,
        })
    }

    /// Parse a `;`-delimited sheet: `id;text;expected` followed by one yes/no column per category.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionCatalogueError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
                .ok_or(QuestionCatalogueError::MissingColumn(name))
        };
        let id_at = position(ID_COLUMN)?;
        let text_at = position(TEXT_COLUMN)?;
        let expected_at = position(EXPECTED_COLUMN)?;

        let category_columns: Vec<(usize, Category)> = headers
            .iter()
            .enumerate()
            .filter(|(at, _)| ![id_at, text_at, expected_at].contains(at))
            // Trailing delimiters in spreadsheet exports leave unnamed columns.
            .filter(|(_, header)| !header.is_empty())
            .map(|(at, header)| (at, Category::new(header)))
            .collect();

        let mut questions = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let field = |at: usize| record.get(at).unwrap_or_default();

            let id = field(id_at);
            if id.is_empty() {
                return Err(QuestionCatalogueError::EmptyId { line });
            }

            let expected = parse_flag(field(expected_at)).ok_or_else(|| {
                QuestionCatalogueError::InvalidFlag {
                    line,
                    column: EXPECTED_COLUMN.to_string(),
                    value: field(expected_at).to_string(),
                }
            })?;

            let mut categories = Vec::new();
            for (at, category) in &category_columns {
                match parse_flag(field(*at)) {
                    Some(true) => categories.push(category.clone()),
                    Some(false) => {}
                    None => {
                        return Err(QuestionCatalogueError::InvalidFlag {
                            line,
                            column: category.to_string(),
                            value: field(*at).to_string(),
                        })
                    }
                }
            }

            questions.push(Question {
                id: QuestionId::new(id),
                text: field(text_at).to_string(),
                expected,
                categories,
            });
        }

        let categories = category_columns
            .into_iter()
            .map(|(_, category)| category)
            .collect();
        Self::with_categories(questions, categories)
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|&position| &self.questions[position])
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.index.contains_key(id)
    }

    pub fn expected_answer(&self, id: &QuestionId) -> Option<bool> {
        self.get(id).map(|question| question.expected)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Skill/category tags in sheet column order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "x" => Some(true),
        "no" | "n" | "false" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Error raised while reading the question sheet.
#[derive(Debug, thiserror::Error)]
pub enum QuestionCatalogueError {
    #[error("invalid question sheet data: {0}")]
    Csv(#[from] csv::Error),
    #[error("question sheet is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("question sheet line {line}: '{value}' in column '{column}' is not a yes/no value")]
    InvalidFlag {
        line: u64,
        column: String,
        value: String,
    },
    #[error("question sheet line {line} has an empty id")]
    EmptyId { line: u64 },
    #[error("question '{0}' is declared more than once")]
    DuplicateQuestion(QuestionId),
}
