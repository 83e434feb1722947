// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::graphql::{graphiql, Caller, TaskSchema};
use crate::session::{SessionManager, COOKIE_NAME};

#[derive(Clone)]
pub struct AppState {
    pub schema: TaskSchema,
    pub sessions: SessionManager,
}

/// Creates the gateway router: GraphQL endpoint, GraphiQL and health check.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/query", post(graphql_handler))
        .route("/playground", get(playground))
        .route("/health", get(health))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid allowed origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Resolves the session cookie to a caller. Unknown tokens are treated as anonymous.
fn resolve_caller(jar: &CookieJar, sessions: &SessionManager) -> Caller {
    jar.get(COOKIE_NAME)
        .and_then(|cookie| {
            let session_id = cookie.value();
            sessions.get_user_id(session_id).map(|user_id| Caller {
                user_id: Some(user_id),
                session_id: Some(session_id.to_string()),
            })
        })
        .unwrap_or_default()
}

async fn graphql_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<async_graphql::Request>,
) -> Response {
    let caller = resolve_caller(&jar, &state.sessions);
    let mut response = state.schema.execute(request.data(caller)).await;

    let headers = std::mem::take(&mut response.http_headers);
    let mut http_response = Json(response).into_response();
    for (name, value) in headers.iter() {
        http_response.headers_mut().append(name, value.clone());
    }
    http_response
}

async fn playground() -> Html<String> {
    Html(graphiql("/query"))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::build_schema;
    use crate::usecase::testing::FakeBackend;
    use crate::usecase::{AuthUsecase, CategoryUsecase, TodoUsecase};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, SessionManager) {
        let backend = Arc::new(FakeBackend::default());
        let sessions = SessionManager::default();
        let schema = build_schema(
            TodoUsecase::new(backend.clone()),
            CategoryUsecase::new(backend.clone()),
            AuthUsecase::new(backend),
            sessions.clone(),
        );
        let state = AppState {
            schema,
            sessions: sessions.clone(),
        };
        (
            create_router(state, &["http://localhost:3000".to_string()]),
            sessions,
        )
    }

    fn query(body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/query")
            .header("Content-Type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_session_cookie_authenticates_requests() {
        let (app, sessions) = app();
        let token = sessions.create_session(7);

        let response = app
            .oneshot(query(
                json!({ "query": "{ me { id email } }" }),
                Some(format!("{COOKIE_NAME}={token}").as_str()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["me"]["id"], json!("7"));
    }

    #[tokio::test]
    async fn test_unknown_cookie_is_anonymous() {
        let (app, _) = app();

        let response = app
            .oneshot(query(
                json!({ "query": "{ me { id } }" }),
                Some(format!("{COOKIE_NAME}=forged").as_str()),
            ))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["data"]["me"], Value::Null);
    }

    #[tokio::test]
    async fn test_login_response_sets_cookie() {
        let (app, sessions) = app();

        let response = app
            .oneshot(query(
                json!({
                    "query": "mutation Login($email: String!, $password: String!) { login(email: $email, password: $password) { id } }",
                    "variables": { "email": "ada@example.com", "password": "s3cret" }
                }),
                None,
            ))
            .await
            .unwrap();

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with(&format!("{COOKIE_NAME}=")));
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_playground_and_health() {
        let (app, _) = app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/playground").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(response).await["status"], json!("ok"));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_with_credentials() {
        let (app, _) = app();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/query")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
