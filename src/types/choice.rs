use serde::{Deserialize, Serialize};

use crate::types::question::QuestionId;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Choice {
    pub id: ChoiceId,
    pub question_id: QuestionId,
    pub text: String,
    pub votes: i32,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct ChoiceId(pub i32);
