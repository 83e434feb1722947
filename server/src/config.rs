// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::service::UpdatePolicy;

const DEFAULT_DATABASE_URL: &str = "sqlite://database/tasks.db";
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:50051";

/// Runtime settings of the task server, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub addr: SocketAddr,
    pub update_policy: UpdatePolicy,
    /// Account created at startup when both values are set and the email is unknown.
    pub seed_user: Option<(String, String)>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let addr = env::var("SERVER_ADDR")
            .unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string())
            .parse()
            .context("SERVER_ADDR must be a socket address such as 0.0.0.0:50051")?;
        let derive_completed_at = match env::var("TASKS_DERIVE_COMPLETED_AT") {
            Ok(value) => parse_flag(&value)
                .with_context(|| format!("TASKS_DERIVE_COMPLETED_AT: invalid flag {value:?}"))?,
            Err(_) => false,
        };
        let seed_user = match (env::var("SEED_USER_EMAIL"), env::var("SEED_USER_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            addr,
            update_policy: UpdatePolicy {
                derive_completed_at,
            },
            seed_user,
        })
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
