// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Task service: SQLite persistence, business rules and the JSON RPC surface.
pub mod config;
pub mod database;
pub mod handlers;
pub mod repository;
pub mod routes;
pub mod service;
pub mod store;
