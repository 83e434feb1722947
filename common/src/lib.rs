// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Types shared by the task server and the GraphQL gateway.
//!
//! - [`model`]: the domain entities and request DTOs the services work on.
//! - [`wire`]: the RPC request/response messages exchanged between the two processes.
//! - [`error`]: the error taxonomy both sides speak.
//! - [`dates`]: `YYYY-MM-DD` parsing and timestamp rendering.
pub mod dates;
pub mod error;
pub mod model;
pub mod wire;

pub use error::{ErrorCode, ServiceError};
