// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers;
use crate::service::{Services, UpdatePolicy};
use axum::{
    routing::{get, post},
    Router,
};
use common::wire::path;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Creates the RPC router over a SQLite pool.
pub fn create_router(pool: SqlitePool, policy: UpdatePolicy) -> Router {
    create_router_with(Services::sqlite(pool, policy))
}

pub fn create_router_with(services: Services) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(path::GET_TASKS, post(handlers::get_tasks))
        .route(path::CREATE_TASK, post(handlers::create_task))
        .route(path::UPDATE_TASK, post(handlers::update_task))
        .route(path::DELETE_TASK, post(handlers::delete_task))
        .route(path::TOGGLE_TASK, post(handlers::toggle_task))
        .route(path::CREATE_SUB_TASK, post(handlers::create_sub_task))
        .route(path::TOGGLE_SUB_TASK, post(handlers::toggle_sub_task))
        .route(path::LIST_SUB_TASKS, post(handlers::list_sub_tasks))
        .route(path::GET_CATEGORIES, post(handlers::get_categories))
        .route(path::LOGIN, post(handlers::login))
        .route(path::GET_USER, post(handlers::get_user))
        .layer(TraceLayer::new_for_http())
        .with_state(services)
}
