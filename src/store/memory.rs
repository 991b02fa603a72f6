use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handle_errors::Error;
use tokio::sync::RwLock;

use super::PollStore;
use crate::types::{
    choice::{Choice, ChoiceId},
    pagination::Pagination,
    question::{NewQuestion, Question, QuestionId, visible_questions},
};

/// Process-local store for `--in-memory` runs and tests. Ids start at 1 and
/// follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    polls: Arc<RwLock<Polls>>,
}

#[derive(Debug, Default)]
struct Polls {
    questions: Vec<Question>,
    choices: Vec<Choice>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn add_question(
        &self,
        new_question: NewQuestion,
        now: DateTime<Utc>,
    ) -> Result<Question, Error> {
        let mut polls = self.polls.write().await;

        let question = Question {
            id: QuestionId(polls.questions.len() as i32 + 1),
            text: new_question.text,
            published_at: new_question.published_at.unwrap_or(now),
        };
        polls.questions.push(question.clone());

        for text in new_question.choices {
            let id = ChoiceId(polls.choices.len() as i32 + 1);
            polls.choices.push(Choice {
                id,
                question_id: question.id,
                text,
                votes: 0,
            });
        }

        Ok(question)
    }

    async fn visible_questions(
        &self,
        now: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<Vec<Question>, Error> {
        let polls = self.polls.read().await;
        let visible = visible_questions(polls.questions.iter().cloned(), now);
        Ok(pagination.apply(visible))
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, Error> {
        let polls = self.polls.read().await;
        Ok(polls.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn choices(&self, question_id: QuestionId) -> Result<Vec<Choice>, Error> {
        let polls = self.polls.read().await;
        Ok(polls
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn vote(&self, question_id: QuestionId, choice_id: ChoiceId) -> Result<Choice, Error> {
        let mut polls = self.polls.write().await;
        let choice = polls
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id && c.question_id == question_id)
            .ok_or(Error::ChoiceNotFound)?;
        choice.votes += 1;
        Ok(choice.clone())
    }
}
