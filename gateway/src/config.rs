// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:50051";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Runtime settings of the GraphQL gateway, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    /// Base URL of the task server's RPC surface.
    pub backend_url: String,
    /// Frontend origins allowed to call the gateway with credentials.
    pub allowed_origins: Vec<String>,
    pub cookie_secure: bool,
    pub rpc_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let addr = env::var("GATEWAY_ADDR")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_ADDR.to_string())
            .parse()
            .context("GATEWAY_ADDR must be a socket address such as 0.0.0.0:8080")?;
        let backend_url = env::var("BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );
        let cookie_secure = match env::var("SESSION_COOKIE_SECURE") {
            Ok(value) => value
                .trim()
                .parse::<bool>()
                .with_context(|| {
                    format!("SESSION_COOKIE_SECURE: expected true or false, got {value:?}")
                })?,
            Err(_) => false,
        };
        let rpc_timeout = match env::var("RPC_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("RPC_TIMEOUT_SECS: expected seconds, got {value:?}"))?,
            Err(_) => DEFAULT_RPC_TIMEOUT_SECS,
        };

        Ok(Self {
            addr,
            backend_url,
            allowed_origins,
            cookie_secure,
            rpc_timeout: Duration::from_secs(rpc_timeout),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DEFAULT_ALLOWED_ORIGINS, vec!["http://localhost:3000", "http://127.0.0.1:3000"])]
    #[case(" https://app.example.com , ", vec!["https://app.example.com"])]
    #[case("", vec![])]
    fn test_parse_origins(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_origins(raw), expected);
    }
}
