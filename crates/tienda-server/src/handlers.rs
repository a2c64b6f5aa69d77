use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use tienda_storage::StorageError;

use crate::reconcile::{DeleteOutcome, ResourceRepository, UpdateOutcome};
use crate::service::{ClientService, ProductService, ResourceService};
use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Tienda Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn fallback_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

// ---- Auth ----

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Response {
    match state.auth.login(&body.email, &body.password) {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        Err(err) if err.is_unauthorized() => {
            tracing::debug!(email = %body.email, "login rejected");
            error_json(StatusCode::UNAUTHORIZED, "Invalid credentials")
        }
        Err(err) => {
            tracing::error!(error = %err, "login failed");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

// ---- Clients ----

pub async fn list_clients(State(state): State<AppState>) -> Response {
    list_resource(&state.clients, &ClientService).await
}

pub async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    search_resource(&state.clients, &ClientService, &params).await
}

pub async fn get_client(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    get_resource(&state.clients, &ClientService, &id).await
}

pub async fn create_client(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    create_resource(&state.clients, &ClientService, body).await
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    update_resource(&state.clients, &ClientService, &id, body).await
}

pub async fn delete_client(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    delete_resource(&state.clients, &id).await
}

// ---- Products ----

pub async fn list_products(State(state): State<AppState>) -> Response {
    list_resource(&state.products, &ProductService).await
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    search_resource(&state.products, &ProductService, &params).await
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    get_resource(&state.products, &ProductService, &id).await
}

pub async fn create_product(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    create_resource(&state.products, &ProductService, body).await
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    update_resource(&state.products, &ProductService, &id, body).await
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    delete_resource(&state.products, &id).await
}

// ---- Shared resource logic ----

async fn list_resource(repo: &ResourceRepository, svc: &dyn ResourceService) -> Response {
    match repo.list().await {
        Ok(docs) => {
            let body: Vec<Value> = docs.iter().map(|d| svc.format(d)).collect();
            (StatusCode::OK, Json(Value::Array(body))).into_response()
        }
        Err(err) => storage_failure(repo, "list", err),
    }
}

async fn search_resource(
    repo: &ResourceRepository,
    svc: &dyn ResourceService,
    params: &HashMap<String, String>,
) -> Response {
    let needle = match params.get("name").map(String::as_str) {
        Some(s) if !s.trim().is_empty() => s.trim().to_lowercase(),
        _ => {
            return error_json(
                StatusCode::BAD_REQUEST,
                "name query parameter is required",
            )
        }
    };

    let docs = match repo.list().await {
        Ok(docs) => docs,
        Err(err) => return storage_failure(repo, "search", err),
    };

    let matches: Vec<Value> = docs
        .iter()
        .filter(|doc| {
            doc.payload
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .map(|doc| svc.format(doc))
        .collect();

    if matches.is_empty() {
        return error_json(StatusCode::NOT_FOUND, "No matches found");
    }
    (StatusCode::OK, Json(Value::Array(matches))).into_response()
}

async fn get_resource(
    repo: &ResourceRepository,
    svc: &dyn ResourceService,
    id: &str,
) -> Response {
    match repo.get(id).await {
        Ok(Some(doc)) => (StatusCode::OK, Json(svc.format(&doc))).into_response(),
        Ok(None) => not_found_json(repo.collection(), id),
        Err(err) => storage_failure(repo, "get", err),
    }
}

async fn create_resource(
    repo: &ResourceRepository,
    svc: &dyn ResourceService,
    body: Value,
) -> Response {
    let Value::Object(payload) = body else {
        return error_json(StatusCode::BAD_REQUEST, "body must be a JSON object");
    };

    let errors = svc.validate_create(&payload);
    if !errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response();
    }

    match repo.create(payload).await {
        Ok(doc) => (StatusCode::CREATED, Json(svc.format(&doc))).into_response(),
        Err(err) => storage_failure(repo, "create", err),
    }
}

async fn update_resource(
    repo: &ResourceRepository,
    svc: &dyn ResourceService,
    id: &str,
    body: Value,
) -> Response {
    let Value::Object(patch) = body else {
        return error_json(StatusCode::BAD_REQUEST, "body must be a JSON object");
    };

    match repo.update(id, patch).await {
        Ok(UpdateOutcome::Updated(doc)) => {
            (StatusCode::OK, Json(svc.format(&doc))).into_response()
        }
        Ok(UpdateOutcome::NotFound) => not_found_json(repo.collection(), id),
        Err(err) => storage_failure(repo, "update", err),
    }
}

async fn delete_resource(repo: &ResourceRepository, id: &str) -> Response {
    match repo.delete(id).await {
        Ok(DeleteOutcome::Deleted(payload)) => {
            (StatusCode::OK, Json(Value::Object(payload))).into_response()
        }
        Ok(DeleteOutcome::NotFound) => not_found_json(repo.collection(), id),
        Err(err) => storage_failure(repo, "delete", err),
    }
}

// ---- Response helpers ----

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found_json(collection: &str, id: &str) -> Response {
    error_json(
        StatusCode::NOT_FOUND,
        &format!("No document in {collection} for id {id}"),
    )
}

fn storage_failure(repo: &ResourceRepository, operation: &str, err: StorageError) -> Response {
    tracing::error!(
        collection = repo.collection(),
        operation,
        category = %err.category(),
        error = %err,
        "storage operation failed"
    );
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
