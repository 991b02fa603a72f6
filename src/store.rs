use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handle_errors::Error;
use sqlx::{
    PgPool, Row,
    postgres::{PgPoolOptions, PgRow},
};
use tracing::{Level, event};

use crate::types::{
    choice::{Choice, ChoiceId},
    pagination::Pagination,
    question::{NewQuestion, Question, QuestionId},
};

mod memory;
pub use memory::MemoryStore;

/// Store handle shared by every route.
pub type SharedStore = Arc<dyn PollStore>;

/// Persistence for questions and their choices.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Stores a question together with its choices. A missing publication
    /// date is filled in with `now`.
    async fn add_question(
        &self,
        new_question: NewQuestion,
        now: DateTime<Utc>,
    ) -> Result<Question, Error>;

    /// Questions published at or before `now`, newest first.
    async fn visible_questions(
        &self,
        now: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<Vec<Question>, Error>;

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, Error>;

    async fn choices(&self, question_id: QuestionId) -> Result<Vec<Choice>, Error>;

    /// Adds one vote to `choice_id`, which must belong to `question_id`.
    async fn vote(&self, question_id: QuestionId, choice_id: ChoiceId) -> Result<Choice, Error>;
}

#[derive(Debug, Clone)]
pub struct Store {
    pub connection: PgPool,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Ok(Store {
            connection: db_pool,
        })
    }
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        text: row.get("text"),
        published_at: row.get("published_at"),
    }
}

fn choice_from_row(row: PgRow) -> Choice {
    Choice {
        id: ChoiceId(row.get("id")),
        question_id: QuestionId(row.get("question_id")),
        text: row.get("text"),
        votes: row.get("votes"),
    }
}

fn query_error(e: sqlx::Error) -> Error {
    event!(Level::ERROR, "{:?}", e);
    Error::DatabaseQueryError(e)
}

#[async_trait]
impl PollStore for Store {
    async fn add_question(
        &self,
        new_question: NewQuestion,
        now: DateTime<Utc>,
    ) -> Result<Question, Error> {
        let mut tx = self.connection.begin().await.map_err(query_error)?;

        let question = sqlx::query(
            "INSERT INTO questions (text, published_at)
            VALUES ($1, $2)
            RETURNING id, text, published_at",
        )
        .bind(new_question.text)
        .bind(new_question.published_at.unwrap_or(now))
        .map(question_from_row)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;

        for text in new_question.choices {
            sqlx::query("INSERT INTO choices (question_id, text) VALUES ($1, $2)")
                .bind(question.id.0)
                .bind(text)
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;
        Ok(question)
    }

    async fn visible_questions(
        &self,
        now: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, text, published_at FROM questions
            WHERE published_at <= $1
            ORDER BY published_at DESC, id ASC
            LIMIT $2 OFFSET $3",
        )
        .bind(now)
        .bind(pagination.limit.map(i64::from))
        .bind(i64::from(pagination.offset))
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, Error> {
        sqlx::query("SELECT id, text, published_at FROM questions WHERE id = $1")
            .bind(id.0)
            .map(question_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(query_error)
    }

    async fn choices(&self, question_id: QuestionId) -> Result<Vec<Choice>, Error> {
        sqlx::query(
            "SELECT id, question_id, text, votes FROM choices
            WHERE question_id = $1
            ORDER BY id ASC",
        )
        .bind(question_id.0)
        .map(choice_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    async fn vote(&self, question_id: QuestionId, choice_id: ChoiceId) -> Result<Choice, Error> {
        // Incremented in the database so concurrent votes are not lost.
        sqlx::query(
            "UPDATE choices SET votes = votes + 1
            WHERE id = $1 AND question_id = $2
            RETURNING id, question_id, text, votes",
        )
        .bind(choice_id.0)
        .bind(question_id.0)
        .map(choice_from_row)
        .fetch_optional(&self.connection)
        .await
        .map_err(query_error)?
        .ok_or(Error::ChoiceNotFound)
    }
}

#[cfg(test)]
mod store_tests {
    const QUESTIONS_TABLE: &str =
        include_str!("../migrations/20260101000000_questions_table.up.sql");
    const CHOICES_TABLE: &str = include_str!("../migrations/20260101000001_choices_table.up.sql");

    // Text length is unbounded in MemoryStore, so the tables must not cap it either.
    #[test]
    fn text_columns_are_unbounded() {
        for table in [QUESTIONS_TABLE, CHOICES_TABLE] {
            assert!(table.contains("text TEXT NOT NULL"));
            assert!(!table.to_uppercase().contains("VARCHAR"));
        }
    }
}
