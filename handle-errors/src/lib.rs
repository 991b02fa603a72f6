use std::fmt;
use std::num::ParseIntError;

use tracing::{Level, event, instrument};
use warp::{
    Rejection, Reply, body::BodyDeserializeError, filters::cors::CorsForbidden,
    http::StatusCode,
    reject::{MethodNotAllowed, Reject, UnsupportedMediaType},
};

#[derive(Debug)]
pub enum Error {
    ParseError(ParseIntError),
    QuestionNotFound,
    ChoiceNotFound,
    DatabaseQueryError(sqlx::Error),
    MigrationError(sqlx::migrate::MigrateError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ParseError(ref err) => write!(f, "Cannot parse parameter: {}", err),
            Error::QuestionNotFound => write!(f, "Question not found"),
            Error::ChoiceNotFound => write!(f, "Choice not found"),
            Error::DatabaseQueryError(_) => write!(f, "Cannot access the question store"),
            Error::MigrationError(_) => write!(f, "Cannot migrate data"),
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        let status = match error {
            Error::QuestionNotFound | Error::ChoiceNotFound => {
                event!(Level::INFO, "{}", error);
                StatusCode::NOT_FOUND
            }
            Error::ParseError(e) => {
                event!(Level::WARN, "{}", e);
                StatusCode::BAD_REQUEST
            }
            Error::DatabaseQueryError(e) => {
                event!(Level::ERROR, "Database query error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::MigrationError(e) => {
                event!(Level::ERROR, "Migration error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Ok(warp::reply::with_status(error.to_string(), status))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::WARN, "CORS forbidden error: {}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::FORBIDDEN,
        ))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::WARN, "Cannot deserialize request body: {}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
    } else if let Some(error) = r.find::<UnsupportedMediaType>() {
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ))
    } else if r.is_not_found() {
        Ok(warp::reply::with_status(
            "Route not found".to_string(),
            StatusCode::NOT_FOUND,
        ))
    } else if let Some(error) = r.find::<MethodNotAllowed>() {
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::METHOD_NOT_ALLOWED,
        ))
    } else {
        event!(Level::WARN, "Unhandled rejection: {:?}", r);
        Ok(warp::reply::with_status(
            "Internal server error".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}
