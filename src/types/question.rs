use std::fmt;

use chrono::{DateTime, Duration, Utc};
use handle_errors::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct QuestionId(pub i32);

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewQuestion {
    pub text: String,
    /// Defaults to the time the question is stored.
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl Question {
    /// True when the question went out within the last day, up to and including `now`.
    /// Exactly one day ago no longer counts.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) < self.published_at && self.published_at <= now
    }

    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_at <= now
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Published questions, most recent first. Questions sharing a timestamp keep
/// their input order.
pub fn visible_questions<I>(questions: I, now: DateTime<Utc>) -> Vec<Question>
where
    I: IntoIterator<Item = Question>,
{
    let mut visible: Vec<Question> = questions
        .into_iter()
        .filter(|question| question.is_published(now))
        .collect();
    visible.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    visible
}

/// Detail lookup: a missing question and one scheduled for later are both not found.
pub fn published(question: Option<Question>, now: DateTime<Utc>) -> Result<Question, Error> {
    match question {
        Some(question) if question.is_published(now) => Ok(question),
        _ => Err(Error::QuestionNotFound),
    }
}

#[cfg(test)]
mod question_tests {
    use super::*;

    fn question(id: i32, text: &str, published_at: DateTime<Utc>) -> Question {
        Question {
            id: QuestionId(id),
            text: text.to_string(),
            published_at,
        }
    }

    #[test]
    fn was_published_recently_with_future_question() {
        let now = Utc::now();
        let future_question = question(1, "Future", now + Duration::days(30));
        assert!(!future_question.was_published_recently(now));
    }

    #[test]
    fn was_published_recently_with_old_question() {
        let now = Utc::now();
        let old_question = question(1, "Old", now - Duration::days(1) - Duration::seconds(1));
        assert!(!old_question.was_published_recently(now));

        let older_question = question(2, "Older", now - Duration::days(2));
        assert!(!older_question.was_published_recently(now));
    }

    #[test]
    fn was_published_recently_with_recent_question() {
        let now = Utc::now();
        let recent_question = question(
            1,
            "Recent",
            now - Duration::hours(23) - Duration::minutes(59) - Duration::seconds(59),
        );
        assert!(recent_question.was_published_recently(now));

        let half_day = question(2, "Half a day", now - Duration::hours(12));
        assert!(half_day.was_published_recently(now));
    }

    #[test]
    fn exactly_one_day_old_is_not_recent() {
        let now = Utc::now();
        let boundary = question(1, "Boundary", now - Duration::days(1));
        assert!(!boundary.was_published_recently(now));

        let right_now = question(2, "Now", now);
        assert!(right_now.was_published_recently(now));
    }

    #[test]
    fn visible_questions_of_nothing_is_empty() {
        assert!(visible_questions(Vec::new(), Utc::now()).is_empty());
    }

    #[test]
    fn visible_questions_hides_future_and_sorts_newest_first() {
        let now = Utc::now();
        let questions = vec![
            question(1, "Past question 2", now - Duration::days(5)),
            question(2, "Future question", now + Duration::days(2)),
            question(3, "Past question 1", now - Duration::days(2)),
            question(4, "Published now", now),
        ];

        let texts: Vec<String> = visible_questions(questions, now)
            .into_iter()
            .map(|q| q.to_string())
            .collect();

        assert_eq!(texts, vec!["Published now", "Past question 1", "Past question 2"]);
    }

    #[test]
    fn visible_questions_keeps_insertion_order_on_ties() {
        let now = Utc::now();
        let at = now - Duration::hours(3);
        let questions = vec![question(1, "first", at), question(2, "second", at)];

        let ids: Vec<QuestionId> = visible_questions(questions, now)
            .into_iter()
            .map(|q| q.id)
            .collect();

        assert_eq!(ids, vec![QuestionId(1), QuestionId(2)]);
    }

    #[test]
    fn published_lookup() {
        let now = Utc::now();

        let past = question(1, "Past question", now - Duration::days(1));
        assert_eq!(published(Some(past.clone()), now).unwrap(), past);

        let future = question(2, "Future question", now + Duration::days(1));
        assert!(matches!(
            published(Some(future), now),
            Err(Error::QuestionNotFound)
        ));

        assert!(matches!(published(None, now), Err(Error::QuestionNotFound)));
    }
}
