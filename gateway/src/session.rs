// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! In-memory login sessions keyed by an opaque cookie token.
//!
//! Sessions live only as long as the process. There is no expiry sweep: a
//! session ends on logout or restart, the cookie max-age only bounds the client.
use std::collections::HashMap;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const COOKIE_NAME: &str = "bff_session";
const COOKIE_MAX_AGE_DAYS: i64 = 7;

/// Shared map from session token to user id. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, u64>>>,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(secure_cookies: bool) -> Self {
        Self {
            sessions: Arc::default(),
            secure_cookies,
        }
    }

    /// Issues a fresh random token bound to `user_id`.
    pub fn create_session(&self, user_id: u64) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions.write().insert(session_id.clone(), user_id);
        debug!("Session created for user {}", user_id);
        session_id
    }

    pub fn get_user_id(&self, session_id: &str) -> Option<u64> {
        self.sessions.read().get(session_id).copied()
    }

    /// Unknown tokens are ignored.
    pub fn delete_session(&self, session_id: &str) {
        if let Some(user_id) = self.sessions.write().remove(session_id) {
            debug!("Session deleted for user {}", user_id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn session_cookie(&self, session_id: String) -> Cookie<'static> {
        Cookie::build((COOKIE_NAME, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
            .build()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((COOKIE_NAME, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let sessions = SessionManager::default();

        let token = sessions.create_session(42);
        assert_eq!(sessions.get_user_id(&token), Some(42));

        sessions.delete_session(&token);
        assert_eq!(sessions.get_user_id(&token), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_unknown_token_resolves_to_nothing() {
        let sessions = SessionManager::default();
        sessions.create_session(1);
        assert_eq!(sessions.get_user_id("not-a-token"), None);
    }

    #[test]
    fn test_deleting_unknown_session_changes_nothing() {
        let sessions = SessionManager::default();
        let token = sessions.create_session(7);

        sessions.delete_session("missing");

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.get_user_id(&token), Some(7));
    }

    #[test]
    fn test_tokens_are_unique_per_login() {
        let sessions = SessionManager::default();
        let first = sessions.create_session(3);
        let second = sessions.create_session(3);

        assert_ne!(first, second);
        sessions.delete_session(&first);
        assert_eq!(sessions.get_user_id(&second), Some(3));
    }

    #[test]
    fn test_clones_share_sessions() {
        let sessions = SessionManager::default();
        let handle = sessions.clone();
        let token = handle.create_session(9);
        assert_eq!(sessions.get_user_id(&token), Some(9));
    }

    #[test]
    fn test_concurrent_logins() {
        let sessions = SessionManager::default();
        let handles: Vec<_> = (0..8u64)
            .map(|user_id| {
                let sessions = sessions.clone();
                std::thread::spawn(move || (user_id, sessions.create_session(user_id)))
            })
            .collect();

        for handle in handles {
            let (user_id, token) = handle.join().unwrap();
            assert_eq!(sessions.get_user_id(&token), Some(user_id));
        }
        assert_eq!(sessions.len(), 8);
    }

    #[test]
    fn test_cookie_attributes() {
        let sessions = SessionManager::new(true);
        let cookie = sessions.session_cookie("abc".to_string()).to_string();

        assert!(cookie.starts_with("bff_session=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));

        let removal = sessions.removal_cookie().to_string();
        assert!(removal.starts_with("bff_session=;"));
        assert!(removal.contains("Max-Age=0"));
    }
}
