use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use pallet_optimizer::config::PalletConfig;
use pallet_optimizer::report::{Report, Sheet};
use pallet_optimizer::solver::Solver;
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    #[serde(default)]
    pallet: Option<PalletConfig>,
    #[serde(flatten)]
    sheet: Sheet,
}

async fn optimize(
    State(defaults): State<Arc<PalletConfig>>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<Report>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    let config = req.pallet.unwrap_or_else(|| defaults.as_ref().clone());
    config
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let solver = Solver::new(config);
    let report = solver
        .process(&req.sheet)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(report))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let defaults = PalletConfig::from_env();
    if let Err(e) = defaults.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    tracing::info!(?defaults, "pallet defaults");

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .with_state(Arc::new(defaults))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: serde_json::Value) -> Json<OptimizeRequest> {
        Json(serde_json::from_value(body).unwrap())
    }

    fn defaults() -> State<Arc<PalletConfig>> {
        State(Arc::new(PalletConfig::default()))
    }

    #[tokio::test]
    async fn test_optimize_uses_default_pallet() {
        let body = serde_json::json!({
            "columns": ["Length", "Width", "Height"],
            "rows": [["40", 30, "20 cm"]],
        });
        let Json(report) = optimize(defaults(), request(body)).await.unwrap();
        assert_eq!(report.pallet, PalletConfig::default());
        assert_eq!(report.rows[0].max_total(1800), Some(72));
    }

    #[tokio::test]
    async fn test_optimize_rejects_zero_width_pallet() {
        let body = serde_json::json!({
            "pallet": {"width": 0},
            "columns": ["Length", "Width", "Height"],
            "rows": [[40, 30, 20]],
        });
        let Err((status, message)) = optimize(defaults(), request(body)).await else {
            panic!("zero width pallet was accepted");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "pallet dimensions must be non-zero");
    }

    #[tokio::test]
    async fn test_optimize_rejects_duplicate_mapping() {
        let body = serde_json::json!({
            "columns": ["a", "b", "c"],
            "rows": [],
            "mapping": {"length": "a", "width": "b", "height": "a"},
        });
        let Err((status, _)) = optimize(defaults(), request(body)).await else {
            panic!("duplicate mapping was accepted");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
