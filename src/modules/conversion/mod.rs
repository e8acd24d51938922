use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod stream_handler;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/convert-url", post(handler::convert_url))
        .route("/upload", post(handler::upload_video))
        .route("/status/{job_id}", get(handler::get_status))
        .route("/stream/{job_id}", get(stream_handler::stream_video))
}
