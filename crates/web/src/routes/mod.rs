use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use chess_tutor_core::engine::StockfishEngine;
use chess_tutor_core::notation::{parse_color, parse_fen};
use chess_tutor_core::{DetectedTactic, Error, GameReviewer, MissedMove, MoveReview, TacticDetector};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tactics", post(tactics))
        .route("/api/review", post(review))
        .with_state(state)
}

pub async fn health() -> &'static str {
    "OK"
}

/// Error body returned as `{ "error": "..." }`
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = match error {
            Error::Engine(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::InvalidPosition(_) | Error::IllegalMove(_) | Error::Notation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticRequest {
    pub position: String,
    pub mover_color: String,
    pub played_move_notation: String,
    pub recommended_move_notation: String,
    #[serde(default)]
    pub centipawn_loss: Option<i32>,
    #[serde(default)]
    pub loss_threshold: Option<i32>,
}

pub async fn tactics(State(state): State<Arc<AppState>>, Json(req): Json<TacticRequest>) -> Json<Vec<DetectedTactic>> {
    let Some(mover) = parse_color(&req.mover_color) else {
        warn!(color = %req.mover_color, "unknown mover colour");
        return Json(Vec::new());
    };

    let threshold = req.loss_threshold.unwrap_or(state.config.loss_threshold);
    let detector = TacticDetector::with_threshold(threshold);
    Json(detector.detect(&MissedMove {
        fen: &req.position,
        mover,
        played: &req.played_move_notation,
        recommended: &req.recommended_move_notation,
        cp_loss: req.centipawn_loss,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub fen: String,
    /// SAN of the move played
    pub played: String,
    #[serde(default)]
    pub depth: Option<u8>,
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<MoveReview>, ApiError> {
    let review = tokio::task::spawn_blocking(move || review_blocking(&state, &req))
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))??;

    info!(played = %review.played, cp_loss = review.cp_loss, "reviewed move");
    Ok(Json(review))
}

/// Runs on the blocking pool: the engine talks to a subprocess over pipes.
fn review_blocking(state: &AppState, req: &ReviewRequest) -> Result<MoveReview, ApiError> {
    let position = parse_fen(&req.fen)?;
    let mut slot = state
        .engine
        .lock()
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "engine lock poisoned"))?;

    if slot.is_none() {
        *slot = Some(StockfishEngine::new(&state.config.stockfish_path).map_err(Error::from)?);
    }
    let Some(engine) = slot.as_mut() else {
        return Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "engine unavailable"));
    };

    let depth = req.depth.unwrap_or(state.config.depth);
    let detector = TacticDetector::with_threshold(state.config.loss_threshold);
    let result = GameReviewer::new(engine, depth)
        .with_detector(detector)
        .review_move(&position, &req.played);

    if let Err(Error::Engine(e)) = &result {
        warn!(error = %e, "dropping engine after failure");
        *slot = None;
    }
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chess_tutor_core::TutorConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let config = TutorConfig::new().stockfish_path("/nonexistent/stockfish");
        router(Arc::new(AppState::new(config)))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_tactics_finds_missed_capture() {
        let (status, body) = post_json(
            "/api/tactics",
            json!({
                "position": "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
                "moverColor": "white",
                "playedMoveNotation": "Kf2",
                "recommendedMoveNotation": "d1d5",
                "centipawnLoss": 900
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["kind"], "win_piece");
        assert_eq!(body[0]["affected_squares"], json!(["d1", "d5"]));
        assert_eq!(body[0]["material_delta"], 900);
        assert_eq!(body[0]["move"], "Rxd5");
    }

    #[tokio::test]
    async fn test_tactics_respects_request_threshold() {
        let (status, body) = post_json(
            "/api/tactics",
            json!({
                "position": "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
                "moverColor": "white",
                "playedMoveNotation": "Kf2",
                "recommendedMoveNotation": "d1d5",
                "centipawnLoss": 900,
                "lossThreshold": 1000
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_tactics_unknown_color_is_empty() {
        let (status, body) = post_json(
            "/api/tactics",
            json!({
                "position": "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
                "moverColor": "purple",
                "playedMoveNotation": "Kf2",
                "recommendedMoveNotation": "d1d5"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_review_rejects_bad_fen() {
        let (status, body) = post_json("/api/review", json!({ "fen": "not a fen", "played": "e4" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid position"));
    }

    #[tokio::test]
    async fn test_review_without_engine_is_unavailable() {
        let (status, body) = post_json(
            "/api/review",
            json!({
                "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                "played": "e4"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("Failed to start engine"));
    }
}
