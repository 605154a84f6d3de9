//! HTTP transport: JSON-RPC over POST plus the admin REST surface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::dispatch::dispatch;
use super::jsonrpc::{INVALID_REQUEST, JsonRpcResponse, METHOD_NOT_FOUND};
use crate::core::error::{GatewayError, Result};
use crate::domains::tenants::TenantConfig;
use crate::domains::tools::ToolRegistry;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    registry: Arc<ToolRegistry>,
    started_at: Instant,
}

/// REST-surface error body (`{ok:false, code, message, ...}`).
fn error_body(e: &GatewayError) -> Value {
    json!({
        "ok": false,
        "code": e.code(),
        "message": e.to_string(),
        "details": e.details(),
        "retryable": e.retryable(),
    })
}

/// Map a protocol response to an HTTP status.
fn response_status(response: &JsonRpcResponse) -> StatusCode {
    match &response.error {
        None => StatusCode::OK,
        Some(err) if err.code == INVALID_REQUEST => StatusCode::BAD_REQUEST,
        Some(err) if err.code == METHOD_NOT_FOUND => StatusCode::NOT_FOUND,
        // Deterministic application errors carry structured data; anything
        // else is an unexpected failure.
        Some(err) if err.data.is_some() => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the gateway router over a shared registry.
pub fn router(registry: Arc<ToolRegistry>) -> Router {
    let state = AppState {
        registry,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/mcp/", post(handle_rpc))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/status", get(api_status))
        .route("/api/tenants", get(api_tenants_list).post(api_tenants_upsert))
        .route("/api/tenants/{tenant_id}", axum::routing::delete(api_tenants_delete))
        .route("/api/approvals", get(approvals_disabled))
        .route("/api/approvals/{id}/approve", post(approvals_disabled))
        .route("/api/approvals/{id}/reject", post(approvals_disabled))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(registry: Arc<ToolRegistry>) -> Result<()> {
    let config = registry.config().clone();
    let addr = format!("{}:{}", config.host, config.port);
    let app = router(registry);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Ready - listening on {addr} (JSON-RPC: POST /mcp)");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Handle JSON-RPC requests.
async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let header_tenant = headers
        .get(state.registry.config().tenant_header.as_str())
        .and_then(|v| v.to_str().ok());
    let query_tenant = query.get("tenantId").map(String::as_str);

    let response = dispatch(&state.registry, &body, header_tenant, query_tenant).await;
    (response_status(&response), Json(response))
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "ok": true, "tenants": state.registry.tenants().len() }))
}

async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.registry.config();
    Json(json!({
        "ok": true,
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "tenantCount": state.registry.tenants().len(),
        "toolCatalogLimit": config.tool_catalog_limit,
        "configWriteEnabled": config.config_write_enabled,
        "approvalsEnabled": config.approvals_enabled,
    }))
}

async fn api_tenants_list(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tenants": state.registry.tenants().list() }))
}

async fn api_tenants_upsert(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !state.registry.config().config_write_enabled {
        let e = GatewayError::ConfigWriteDisabled;
        return (StatusCode::FORBIDDEN, Json(error_body(&e)));
    }
    let tenant: TenantConfig = match serde_json::from_value(body) {
        Ok(tenant) => tenant,
        Err(e) => {
            let e = GatewayError::TenantInvalid(e.to_string());
            return (StatusCode::BAD_REQUEST, Json(error_body(&e)));
        }
    };
    match state.registry.tenants().upsert(tenant) {
        Ok(tenants) => (StatusCode::OK, Json(json!({ "tenants": tenants }))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(error_body(&e))),
    }
}

async fn api_tenants_delete(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> impl IntoResponse {
    if !state.registry.config().config_write_enabled {
        let e = GatewayError::ConfigWriteDisabled;
        return (StatusCode::FORBIDDEN, Json(error_body(&e)));
    }
    match state.registry.tenants().delete(&tenant_id) {
        Ok(tenants) => (StatusCode::OK, Json(json!({ "tenants": tenants }))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(error_body(&e))),
    }
}

/// Approvals are disabled scaffolding: the routes exist for compatibility
/// but always answer with the same error.
async fn approvals_disabled() -> impl IntoResponse {
    let e = GatewayError::ApprovalsDisabled;
    (StatusCode::BAD_REQUEST, Json(error_body(&e)))
}
