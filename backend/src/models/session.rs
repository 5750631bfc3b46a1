//! Models for authentication sessions and the global session slot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{RefreshTokenId, SessionId, UserId};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
/// Database representation of an issued session.
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    /// Refresh token backing the session.
    pub refresh_token_id: RefreshTokenId,
    /// `jti` of the most recently issued access token, if any.
    pub access_jti: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a session: active → expired (passive) → inactive (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Expired,
    Inactive,
}

impl Session {
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if !self.active {
            SessionState::Inactive
        } else if self.expires_at < now {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == SessionState::Active
    }
}

/// Why a session left the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationReason {
    Logout,
    Expired,
}

impl DeactivationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeactivationReason::Logout => "logout",
            DeactivationReason::Expired => "expired",
        }
    }
}
