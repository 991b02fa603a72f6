use std::collections::HashMap;

use chrono::Utc;
use tracing::{Level, event, instrument};
use warp::http::StatusCode;

use crate::store::SharedStore;
use crate::types::pagination::extract_pagination;
use crate::types::question::{NewQuestion, QuestionId, published};
use crate::views;

#[instrument(skip(store))]
pub async fn index(
    params: HashMap<String, String>,
    store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "polls", Level::INFO, "querying visible questions");
    let pagination = extract_pagination(params).map_err(warp::reject::custom)?;
    let questions = store
        .visible_questions(Utc::now(), pagination)
        .await
        .map_err(warp::reject::custom)?;
    event!(target: "polls", Level::INFO, count = questions.len(), "questions found");

    Ok(warp::reply::html(views::index(&questions)))
}

#[instrument(skip(store))]
pub async fn detail(id: i32, store: SharedStore) -> Result<impl warp::Reply, warp::Rejection> {
    let question = store
        .get_question(QuestionId(id))
        .await
        .map_err(warp::reject::custom)?;
    let question = published(question, Utc::now()).map_err(warp::reject::custom)?;
    let choices = store
        .choices(question.id)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::html(views::detail(&question, &choices, None)))
}

#[instrument(skip(store))]
pub async fn results(id: i32, store: SharedStore) -> Result<impl warp::Reply, warp::Rejection> {
    let question = store
        .get_question(QuestionId(id))
        .await
        .map_err(warp::reject::custom)?;
    let question = published(question, Utc::now()).map_err(warp::reject::custom)?;
    let choices = store
        .choices(question.id)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::html(views::results(&question, &choices)))
}

#[instrument(skip(store))]
pub async fn get_questions(
    params: HashMap<String, String>,
    store: SharedStore,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "polls", Level::INFO, "querying questions");
    let pagination = extract_pagination(params).map_err(warp::reject::custom)?;
    let questions = store
        .visible_questions(Utc::now(), pagination)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&questions))
}

#[instrument(skip(store))]
pub async fn add_question(
    store: SharedStore,
    new_question: NewQuestion,
) -> Result<impl warp::Reply, warp::Rejection> {
    let question = store
        .add_question(new_question, Utc::now())
        .await
        .map_err(warp::reject::custom)?;
    event!(target: "polls", Level::INFO, id = question.id.0, "question added");

    Ok(warp::reply::with_status(
        warp::reply::json(&question),
        StatusCode::CREATED,
    ))
}
