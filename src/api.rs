//! HTTP query surface: name search, similar players, and the bundled front end.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::error::ScoutError;
use crate::service::ScoutService;

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    pub player_name: String,
    pub top_n: Option<usize>,
    pub age_max: Option<u32>,
    /// Free text such as "25m" or "800k".
    pub value_max: Option<String>,
}

#[derive(Debug, Serialize)]
struct NameHit {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

pub fn create_routes(
    service: Arc<ScoutService>,
    static_dir: PathBuf,
    default_top_n: usize,
) -> impl Filter<Extract = impl Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map(move || service.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(static_dir.join("index.html")));

    let assets = warp::path("static").and(warp::fs::dir(static_dir));

    let search = warp::path!("players" / "search")
        .and(warp::get())
        .and(warp::query::<SearchParams>())
        .and(service_filter.clone())
        .and_then(search_players);

    let similar = warp::path!("players" / "similar")
        .and(warp::get())
        .and(warp::query::<SimilarParams>())
        .and(service_filter.clone())
        .and(warp::any().map(move || default_top_n))
        .and_then(similar_players);

    let health = warp::path("health")
        .and(warp::get())
        .and(service_filter)
        .map(|service: Arc<ScoutService>| {
            warp::reply::json(&serde_json::json!({
                "status": "healthy",
                "players": service.player_count(),
            }))
        });

    search
        .or(similar)
        .or(health)
        .or(index)
        .or(assets)
        .with(warp::cors().allow_any_origin().allow_methods(vec!["GET"]))
        .with(warp::trace::request())
}

pub async fn search_players(
    params: SearchParams,
    service: Arc<ScoutService>,
) -> Result<impl Reply, Infallible> {
    let hits: Vec<NameHit> = service
        .find_by_name_substring(&params.q)
        .into_iter()
        .map(|name| NameHit { name })
        .collect();
    Ok(warp::reply::json(&hits))
}

pub async fn similar_players(
    params: SimilarParams,
    service: Arc<ScoutService>,
    default_top_n: usize,
) -> Result<warp::reply::Response, Infallible> {
    let top_n = params.top_n.unwrap_or(default_top_n);
    let outcome = tokio::task::spawn_blocking(move || {
        service.similar(
            &params.player_name,
            top_n,
            params.age_max,
            params.value_max.as_deref(),
        )
    })
    .await;

    let response = match outcome {
        Ok(Ok(rows)) => warp::reply::json(&rows).into_response(),
        Ok(Err(err)) => scout_error_reply(err),
        Err(join_err) => {
            error!("similar players task failed: {join_err}");
            detail_reply(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
        }
    };
    Ok(response)
}

/// Only a missing player is visible to clients; anything else is an opaque 500.
fn scout_error_reply(err: ScoutError) -> warp::reply::Response {
    match err {
        ScoutError::PlayerNotFound(_) => {
            warn!("{err}");
            detail_reply(StatusCode::NOT_FOUND, err.to_string())
        }
        other => {
            error!("similar players failed: {other}");
            detail_reply(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
        }
    }
}

fn detail_reply(status: StatusCode, detail: String) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { detail }), status).into_response()
}
