//! Session resolution.
//!
//! Sign-in happens elsewhere; this service only maps a session token back
//! to the account that owns it.

use chrono::Utc;
use institute_common::AppResult;
use institute_db::entities::user;
use institute_db::repositories::SessionRepository;
use tracing::{debug, info};

/// Resolves session tokens to users.
#[derive(Clone)]
pub struct SessionService {
    session_repo: SessionRepository,
}

impl SessionService {
    /// Create a new session service.
    #[must_use]
    pub const fn new(session_repo: SessionRepository) -> Self {
        Self { session_repo }
    }

    /// The user behind a live session, if any.
    ///
    /// Expired sessions, unknown tokens and banned accounts all resolve to
    /// `None`, so the caller is treated as anonymous.
    pub async fn resolve(&self, token: &str) -> AppResult<Option<user::Model>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let user = self.session_repo.find_user_by_token(token, Utc::now()).await?;
        match user {
            Some(user) if user.banned => {
                debug!(user_id = %user.id, "Ignoring session of banned user");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete sessions that have already expired.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let purged = self.session_repo.delete_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }
}
