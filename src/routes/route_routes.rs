use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

use crate::dto::route_dto::{
    DeleteRoutesRequest, RegisterRouteRequest, RegisterRouteResponse, RouteResponse,
};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_route))
        .route("/:id", get(get_route))
        .route("/", delete(delete_routes))
}

async fn register_route(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRouteRequest>, JsonRejection>,
) -> Result<Json<RegisterRouteResponse>, AppError> {
    let prompt = "register handler";

    let Json(request) = payload.map_err(|e| bad_request_error(&e.body_text()).context(prompt))?;

    let outcome = state
        .routes
        .register(request)
        .await
        .map_err(|e| e.context(prompt))?;

    Ok(Json(outcome.into()))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteResponse>, AppError> {
    let prompt = "get handler";

    if id.trim().is_empty() {
        return Err(bad_request_error("empty id").context(prompt));
    }

    let route_id: i32 = id.trim().parse().map_err(|e: std::num::ParseIntError| {
        bad_request_error(&format!("converting string id to int: {}", e)).context(prompt)
    })?;

    let route = state
        .routes
        .get_by_id(route_id)
        .await
        .map_err(|e| e.context(prompt))?;

    Ok(Json(route.into()))
}

async fn delete_routes(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRoutesRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let prompt = "delete handler";

    let Json(request) = payload.map_err(|e| bad_request_error(&e.body_text()).context(prompt))?;

    state
        .routes
        .delete_by_ids(request)
        .await
        .map_err(|e| e.context(prompt))?;

    Ok(StatusCode::ACCEPTED.into_response())
}
