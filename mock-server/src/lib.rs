//! Counterpart server for the REST client.
//!
//! # Design
//! `app` serves the `/slideruns` resource a timing device reports to, held
//! in memory. `capture` is a bare TCP listener that records the raw bytes of
//! each connection so tests can compare them byte for byte with what the
//! client is expected to send.

pub mod capture;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// One recorded run, keyed by JSON names in PascalCase as devices send them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SlideRun {
    pub id: Uuid,
    pub snagger_id: String,
    #[serde(default)]
    pub occurred_on: String,
    #[serde(default)]
    pub time_in_ms: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSlideRun {
    pub snagger_id: String,
    #[serde(default)]
    pub occurred_on: String,
    #[serde(default)]
    pub time_in_ms: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSlideRun {
    pub snagger_id: Option<String>,
    pub occurred_on: Option<String>,
    pub time_in_ms: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, SlideRun>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/slideruns", get(list_runs).post(create_run))
        .route("/slideruns/{id}", get(get_run).put(update_run).delete(delete_run))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_runs(State(db): State<Db>) -> Json<Vec<SlideRun>> {
    let runs = db.read().await;
    Json(runs.values().cloned().collect())
}

async fn create_run(
    State(db): State<Db>,
    Json(input): Json<CreateSlideRun>,
) -> (StatusCode, Json<SlideRun>) {
    let run = SlideRun {
        id: Uuid::new_v4(),
        snagger_id: input.snagger_id,
        occurred_on: input.occurred_on,
        time_in_ms: input.time_in_ms,
    };
    tracing::info!(id = %run.id, snagger = %run.snagger_id, "slide run recorded");
    db.write().await.insert(run.id, run.clone());
    (StatusCode::CREATED, Json(run))
}

async fn get_run(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<SlideRun>, StatusCode> {
    let runs = db.read().await;
    runs.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_run(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSlideRun>,
) -> Result<Json<SlideRun>, StatusCode> {
    let mut runs = db.write().await;
    let run = runs.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(snagger_id) = input.snagger_id {
        run.snagger_id = snagger_id;
    }
    if let Some(occurred_on) = input.occurred_on {
        run.occurred_on = occurred_on;
    }
    if let Some(time_in_ms) = input.time_in_ms {
        run.time_in_ms = time_in_ms;
    }
    Ok(Json(run.clone()))
}

async fn delete_run(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut runs = db.write().await;
    runs.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
