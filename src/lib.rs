#![warn(clippy::all)]
pub use handle_errors;
use std::sync::Arc;

use tokio::sync::{oneshot, oneshot::Sender};
use tracing_subscriber::fmt::format::FmtSpan;
use warp::{Filter, Reply, http::Method};

pub mod config;
mod routes;
pub mod store;
pub mod types;
pub mod urls;
pub mod views;

use routes::question::{add_question, detail, get_questions, index, results};
use routes::vote::vote;
use store::{MemoryStore, SharedStore, Store};

pub struct OneshotHandler {
    pub sender: Sender<i32>,
}

pub async fn build_routes(store: SharedStore) -> impl Filter<Extract = impl Reply> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(&[Method::GET, Method::POST]);

    // Paths are matched before methods so that an unknown path rejects as not found.
    let index = warp::path("polls")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(index)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "index_request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    let detail = warp::path("polls")
        .and(warp::path::param::<i32>())
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(detail);

    let results = warp::path("polls")
        .and(warp::path::param::<i32>())
        .and(warp::path("results"))
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(results);

    let vote = warp::path("polls")
        .and(warp::path::param::<i32>())
        .and(warp::path("vote"))
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::form())
        .and_then(vote);

    let get_questions = warp::path("api")
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(get_questions);

    let add_question = warp::path("api")
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(add_question);

    index
        .or(detail)
        .or(results)
        .or(vote)
        .or(get_questions)
        .or(add_question)
        .with(cors)
        .with(warp::trace::request())
        .recover(handle_errors::return_error)
}

pub async fn setup_store(config: &config::Config) -> Result<SharedStore, handle_errors::Error> {
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "handle_errors={},polls={},warp={}",
            config.log_level, config.log_level, config.log_level
        )
    });

    tracing_subscriber::fmt()
        // Use the filter we built above to determine which traces to record.
        .with_env_filter(log_filter)
        // Record an event when each span closes, which times the routes.
        .with_span_events(FmtSpan::CLOSE)
        .init();

    if config.in_memory {
        tracing::info!("Keeping questions in memory");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = Store::new(&config.database_url())
        .await
        .map_err(handle_errors::Error::DatabaseQueryError)?;

    sqlx::migrate!()
        .run(&store.connection)
        .await
        .map_err(handle_errors::Error::MigrationError)?;

    Ok(Arc::new(store))
}

pub async fn run(config: config::Config, store: SharedStore) {
    let routes = build_routes(store).await;
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
}

pub async fn oneshot(store: SharedStore) -> OneshotHandler {
    let routes = build_routes(store).await;
    let (tx, rx) = oneshot::channel::<i32>();

    let socket = std::net::SocketAddr::from(([127, 0, 0, 1], 3030));

    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(socket, async {
        rx.await.ok();
    });

    tokio::task::spawn(server);

    OneshotHandler { sender: tx }
}
