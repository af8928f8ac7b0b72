use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub tip: Option<String>,
    pub category_id: Option<i64>,
}

/// A question's fields before the store has assigned it an id. Also the
/// payload of an in-place update, which replaces every field except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub tip: Option<String>,
    pub category_id: Option<i64>,
}

impl QuestionDraft {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
        tip: Option<String>,
        category_id: Option<i64>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer: answer.into(),
            tip,
            category_id,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.id, self.question)?;
        for (i, option) in self.options.iter().enumerate() {
            writeln!(f, "  {}) {}", i + 1, option)?;
        }
        if let Some(tip) = &self.tip {
            writeln!(f, "  tip: {}", tip)?;
        }
        Ok(())
    }
}
