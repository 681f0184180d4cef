//! The operator's sign-in state.
//!
//! One [`Session`] is created at startup and handed to everything that
//! needs the token or the role; nothing else keeps its own copy.

use crate::errors::AppError;
use crate::storage::{clear_session, persist_session};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserInfo {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl UserInfo {
    pub fn role(&self) -> Role {
        let named_admin = self
            .role
            .as_deref()
            .is_some_and(|role| role.eq_ignore_ascii_case("admin"));
        if named_admin || self.is_admin {
            Role::Admin
        } else {
            Role::Employee
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionData {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Clone)]
pub struct Session {
    path: Option<PathBuf>,
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl Session {
    /// `path` is where the session survives restarts; `None` keeps it in
    /// memory only.
    pub fn new(path: Option<PathBuf>, restored: Option<SessionData>) -> Self {
        Self {
            path,
            inner: Arc::new(RwLock::new(restored)),
        }
    }

    pub async fn current_token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|data| data.token.clone())
    }

    pub async fn current_user(&self) -> Option<UserInfo> {
        self.inner.read().await.as_ref().map(|data| data.user.clone())
    }

    pub async fn login(&self, token: String, user: UserInfo) -> Result<(), AppError> {
        let data = SessionData { token, user };
        if let Some(path) = &self.path {
            persist_session(path, &data).await?;
        }
        info!(role = ?data.user.role(), "signed in");
        *self.inner.write().await = Some(data);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let previous = self.inner.write().await.take();
        if let Some(path) = &self.path {
            clear_session(path).await?;
        }
        if previous.is_some() {
            info!("signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::load_session;

    #[test]
    fn role_prefers_admin_from_either_field() {
        let named = UserInfo {
            role: Some("Admin".into()),
            is_admin: false,
        };
        let flagged = UserInfo {
            role: Some("employee".into()),
            is_admin: true,
        };
        assert_eq!(named.role(), Role::Admin);
        assert_eq!(flagged.role(), Role::Admin);
        assert_eq!(UserInfo::default().role(), Role::Employee);
    }

    #[tokio::test]
    async fn login_persists_and_logout_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let session = Session::new(Some(path.clone()), None);
        assert_eq!(session.current_token().await, None);

        let user = UserInfo {
            role: Some("employee".into()),
            is_admin: false,
        };
        session.login("tok-1".into(), user.clone()).await.unwrap();
        assert_eq!(session.current_token().await.as_deref(), Some("tok-1"));
        assert_eq!(session.current_user().await, Some(user.clone()));

        let restored = load_session(&path).await.expect("session on disk");
        assert_eq!(restored.token, "tok-1");
        assert_eq!(restored.user, user);

        session.logout().await.unwrap();
        assert_eq!(session.current_token().await, None);
        assert!(load_session(&path).await.is_none());
        session.logout().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_session_file_means_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        assert!(load_session(&path).await.is_none());
    }
}
