use std::collections::HashMap;

use chrono::Utc;
use handle_errors::Error;
use tracing::{Level, event, instrument};
use warp::{Reply, http::StatusCode, reply::Response};

use crate::store::SharedStore;
use crate::types::choice::ChoiceId;
use crate::types::question::{Question, QuestionId, published};
use crate::{urls, views};

/// Records a vote from the `choice` form field and redirects to the results.
/// Without a valid choice the question form is shown again with an error.
#[instrument(skip(store))]
pub async fn vote(
    id: i32,
    store: SharedStore,
    form: HashMap<String, String>,
) -> Result<Response, warp::Rejection> {
    let question = store
        .get_question(QuestionId(id))
        .await
        .map_err(warp::reject::custom)?;
    let question = published(question, Utc::now()).map_err(warp::reject::custom)?;

    let choice_id = match form.get("choice").and_then(|c| c.parse::<i32>().ok()) {
        Some(choice_id) => ChoiceId(choice_id),
        None => return redisplay(&question, &store).await,
    };

    match store.vote(question.id, choice_id).await {
        Ok(choice) => {
            event!(
                target: "polls",
                Level::INFO,
                choice = choice.id.0,
                votes = choice.votes,
                "vote recorded"
            );
            Ok(warp::reply::with_header(
                warp::reply::with_status(warp::reply(), StatusCode::SEE_OTHER),
                "location",
                urls::results(question.id),
            )
            .into_response())
        }
        Err(Error::ChoiceNotFound) => redisplay(&question, &store).await,
        Err(e) => Err(warp::reject::custom(e)),
    }
}

async fn redisplay(
    question: &Question,
    store: &SharedStore,
) -> Result<Response, warp::Rejection> {
    event!(
        target: "polls",
        Level::WARN,
        question = question.id.0,
        "vote without a valid choice"
    );
    let choices = store
        .choices(question.id)
        .await
        .map_err(warp::reject::custom)?;

    let page = views::detail(question, &choices, Some(views::NO_CHOICE_SELECTED));
    Ok(warp::reply::html(page).into_response())
}
