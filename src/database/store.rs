use std::path::Path;

use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::debug;

use super::question::{Category, Question, QuestionDraft};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed options column: {0}")]
    Encoding(#[from] serde_json::Error),
}

const CREATE_CATEGORY_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS category (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )
";

const CREATE_QUESTIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question TEXT NOT NULL,
        options TEXT NOT NULL,
        answer TEXT NOT NULL,
        tip TEXT,
        category_id INTEGER,
        FOREIGN KEY (category_id) REFERENCES category(id)
    )
";

/// Owns the local database file. Categories and questions only; every
/// operation is a single synchronous round-trip against the pool.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if missing) the database file and ensures the schema
    /// exists. Idempotent across restarts.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        // The questions table declares its category reference but the
        // relation is not enforced: deleting a category must neither cascade
        // to nor be blocked by the questions that point at it.
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.create_tables_if_needed().await?;
        Ok(store)
    }

    async fn create_tables_if_needed(&self) -> Result<(), StoreError> {
        debug!("ensuring schema");
        sqlx::query(CREATE_CATEGORY_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_QUESTIONS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[allow(async_fn_in_trait)]
pub trait CategoryStore {
    /// Lowercases the name, then inserts it unless a category with that
    /// lowercase name already exists. `None` reports the duplicate no-op.
    async fn add_category(&self, name: &str) -> Result<Option<i64>, StoreError>;

    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// `false` if no row matched the id. Questions referencing the category
    /// are left untouched.
    async fn delete_category(&self, id: i64) -> Result<bool, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait QuestionStore {
    async fn add_question(&self, draft: &QuestionDraft) -> Result<i64, StoreError>;

    async fn questions(&self) -> Result<Vec<Question>, StoreError>;

    /// Replaces every field except the id. `false` if no row matched.
    async fn update_question(&self, id: i64, draft: &QuestionDraft) -> Result<bool, StoreError>;

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError>;

    /// One question drawn uniformly over the current row count, `None` when
    /// the table is empty.
    async fn random_question(&self) -> Result<Option<Question>, StoreError>;
}

impl CategoryStore for Store {
    async fn add_category(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let name = name.to_lowercase();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM category WHERE name = ?")
            .bind(&name)
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            debug!(%name, "category already exists");
            return Ok(None);
        }

        let result = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(&name)
            .execute(&self.pool)
            .await?;

        Ok(Some(result.last_insert_rowid()))
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM category")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn delete_category(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl QuestionStore for Store {
    async fn add_question(&self, draft: &QuestionDraft) -> Result<i64, StoreError> {
        let options = serde_json::to_string(&draft.options)?;

        let result = sqlx::query(
            "INSERT INTO questions (question, options, answer, tip, category_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&draft.question)
        .bind(&options)
        .bind(&draft.answer)
        .bind(&draft.tip)
        .bind(draft.category_id)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn questions(&self) -> Result<Vec<Question>, StoreError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, question, options, answer, tip, category_id FROM questions",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Question::try_from).collect()
    }

    async fn update_question(&self, id: i64, draft: &QuestionDraft) -> Result<bool, StoreError> {
        let options = serde_json::to_string(&draft.options)?;

        let result = sqlx::query(
            "UPDATE questions SET question = ?, options = ?, answer = ?, tip = ?, \
             category_id = ? WHERE id = ?",
        )
        .bind(&draft.question)
        .bind(&options)
        .bind(&draft.answer)
        .bind(&draft.tip)
        .bind(draft.category_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn random_question(&self) -> Result<Option<Question>, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        if count == 0 {
            return Ok(None);
        }

        // Explicit uniform sample over the current row count rather than
        // leaning on the engine's ORDER BY RANDOM().
        let offset = rand::thread_rng().gen_range(0..count);

        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, question, options, answer, tip, category_id FROM questions \
             LIMIT 1 OFFSET ?",
        )
        .bind(offset)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Question::try_from).transpose()
    }
}

/// Row as stored: options still serialized as a JSON text column.
#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: i64,
    question: String,
    options: String,
    answer: String,
    tip: Option<String>,
    category_id: Option<i64>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = StoreError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            question: row.question,
            options: serde_json::from_str(&row.options)?,
            answer: row.answer,
            tip: row.tip,
            category_id: row.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_row_decodes_options() {
        let row = QuestionRow {
            id: 7,
            question: "Capital of France?".into(),
            options: r#"["Paris","Rome","Berlin"]"#.into(),
            answer: "Paris".into(),
            tip: None,
            category_id: Some(1),
        };

        let question = Question::try_from(row).unwrap();
        assert_eq!(question.options, vec!["Paris", "Rome", "Berlin"]);
    }

    #[test]
    fn malformed_options_surface_as_encoding_error() {
        let row = QuestionRow {
            id: 7,
            question: "broken".into(),
            options: "not json".into(),
            answer: "x".into(),
            tip: None,
            category_id: None,
        };

        assert!(matches!(
            Question::try_from(row),
            Err(StoreError::Encoding(_))
        ));
    }
}
