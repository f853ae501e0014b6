use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

/// Outcome of one `SELECT 1` round trip
#[derive(Debug, Serialize)]
struct DatabasePing {
    reachable: bool,
    latency_ms: u64,
}

async fn ping_database(pool: &PgPool) -> DatabasePing {
    let start = Instant::now();
    let reachable = match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "health check: PostgreSQL unreachable");
            false
        }
    };
    DatabasePing {
        reachable,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

/// GET /health: 200 while PostgreSQL answers, 503 otherwise
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let ping = ping_database(&state.db).await;
    let mut response = if ping.reachable {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response.json(serde_json::json!({
        "status": if ping.reachable { "ok" } else { "unavailable" },
        "service": "store-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/ready: database reachability with the ping latency
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let ping = ping_database(&state.db).await;
    let mut response = if ping.reachable {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response.json(serde_json::json!({
        "ready": ping.reachable,
        "database": ping,
        "checked_at": chrono::Utc::now(),
    }))
}

/// GET /health/live
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
