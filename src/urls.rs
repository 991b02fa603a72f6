//! Paths of the named routes, used wherever a page links to another page.

use crate::types::question::QuestionId;

pub fn index() -> String {
    "/polls".to_string()
}

pub fn detail(id: QuestionId) -> String {
    format!("/polls/{}", id.0)
}

pub fn results(id: QuestionId) -> String {
    format!("/polls/{}/results", id.0)
}

pub fn vote(id: QuestionId) -> String {
    format!("/polls/{}/vote", id.0)
}
