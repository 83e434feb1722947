// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! GraphQL gateway in front of the task server. Owns login sessions and
//! forwards the caller's identity on every task call.
pub mod client;
pub mod config;
pub mod graphql;
pub mod model;
pub mod repository;
pub mod routes;
pub mod session;
pub mod usecase;

use std::sync::Arc;

use client::RpcClient;
use graphql::build_schema;
use routes::AppState;
use session::SessionManager;
use usecase::{AuthUsecase, CategoryUsecase, TodoUsecase};

/// Wires the use cases, schema and session store around one RPC client.
pub fn app_state(client: RpcClient, sessions: SessionManager) -> AppState {
    let client = Arc::new(client);
    let schema = build_schema(
        TodoUsecase::new(client.clone()),
        CategoryUsecase::new(client.clone()),
        AuthUsecase::new(client),
        sessions.clone(),
    );
    AppState { schema, sessions }
}
