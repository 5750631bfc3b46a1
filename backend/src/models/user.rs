//! Models that represent users, authentication payloads, and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    types::UserId,
    validation::rules::{validate_not_blank, validate_phone, validate_username},
};

#[derive(Debug, Clone, Serialize, FromRow)]
/// Database representation of a user account.
pub struct User {
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique contact address.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Argon2 PHC string; never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[schema(rename_all = "snake_case")]
/// Coarse authorization tier stored in the `user_role` enum.
pub enum UserRole {
    Admin,
    Teacher,
    #[default]
    Student,
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl UserRole {
    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Legacy clients send upper-case role names ("ADMIN").
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(&s, &["admin", "teacher", "student"])
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
/// Self-service registration payload. Every field is optional at the
/// serde level so that missing ones can be reported together.
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

impl RegisterRequest {
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "username",
        "first_name",
        "last_name",
        "email",
        "phone",
        "password",
    ];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => self.username.as_deref(),
            "first_name" => self.first_name.as_deref(),
            "last_name" => self.last_name.as_deref(),
            "email" => self.email.as_deref(),
            "phone" => self.phone.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }

    /// Required fields that are absent or blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .into_iter()
            .filter(|name| {
                self.field(name)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Converts into a complete account draft once `missing_fields` is empty.
    pub fn into_new_user(self, role: UserRole) -> Option<NewUser> {
        Some(NewUser {
            username: self.username?.trim().to_string(),
            email: self.email?.trim().to_string(),
            first_name: self.first_name?.trim().to_string(),
            last_name: self.last_name?.trim().to_string(),
            phone: self.phone?.trim().to_string(),
            password: self.password?,
            role,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Payload an administrator submits to provision an account with any role.
pub struct CreateUser {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 150))]
    pub first_name: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 150))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

impl From<CreateUser> for NewUser {
    fn from(payload: CreateUser) -> Self {
        NewUser {
            username: payload.username.trim().to_string(),
            email: payload.email.trim().to_string(),
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            password: payload.password,
            role: payload.role,
        }
    }
}

/// Validated account data ready to be hashed and persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
/// Whitelisted profile attributes a user may change on their own record.
/// Unknown keys in the request body are ignored.
pub struct UpdateProfile {
    #[validate(custom(function = "validate_not_blank"), length(max = 150))]
    pub first_name: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Authentication tokens returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Envelope for endpoints that create or change a user.
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

impl User {
    /// Constructs a new user with a freshly generated identifier.
    pub fn new(
        username: String,
        email: String,
        first_name: String,
        last_name: String,
        phone: String,
        password_hash: String,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            email,
            first_name,
            last_name,
            phone,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_user(role: UserRole) -> User {
        User::new(
            "alice".into(),
            "alice@example.com".into(),
            "Alice".into(),
            "Example".into(),
            "+15550100".into(),
            "hash".into(),
            role,
        )
    }

    #[test]
    fn user_role_serde_accepts_and_emits_snake_case() {
        let t: UserRole = serde_json::from_str("\"teacher\"").unwrap();
        let a: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        let s: UserRole = serde_json::from_str("\"Student\"").unwrap();
        assert_eq!(t, UserRole::Teacher);
        assert_eq!(a, UserRole::Admin);
        assert_eq!(s, UserRole::Student);
        assert!(serde_json::from_str::<UserRole>("\"principal\"").is_err());

        let st = serde_json::to_value(UserRole::Teacher).unwrap();
        assert_eq!(st, Value::String("teacher".into()));
    }

    #[test]
    fn user_serialization_never_exposes_password_hash() {
        let json = serde_json::to_value(sample_user(UserRole::Student)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn user_response_keeps_public_fields() {
        let user = sample_user(UserRole::Admin);
        let id = user.id;
        let resp: UserResponse = user.into();
        assert_eq!(resp.id, id);
        assert_eq!(resp.role, UserRole::Admin);
        assert_eq!(resp.email, "alice@example.com");
    }

    #[test]
    fn register_request_reports_missing_and_blank_fields() {
        let payload: RegisterRequest = serde_json::from_value(json!({
            "username": "bob",
            "first_name": "   ",
            "email": "bob@example.com",
            "password": "Password123"
        }))
        .unwrap();
        assert_eq!(
            payload.missing_fields(),
            vec!["first_name", "last_name", "phone"]
        );
    }

    #[test]
    fn register_request_converts_into_new_user_when_complete() {
        let payload: RegisterRequest = serde_json::from_value(json!({
            "username": " bob ",
            "first_name": "Bob",
            "last_name": "Builder",
            "email": "bob@example.com",
            "phone": "5550101",
            "password": "Password123"
        }))
        .unwrap();
        assert!(payload.missing_fields().is_empty());
        assert!(payload.validate().is_ok());
        let new_user = payload.into_new_user(UserRole::Student).expect("complete");
        assert_eq!(new_user.username, "bob");
        assert_eq!(new_user.role, UserRole::Student);
    }

    #[test]
    fn update_profile_ignores_non_whitelisted_keys() {
        let payload: UpdateProfile = serde_json::from_value(json!({
            "first_name": "New",
            "role": "admin",
            "username": "hijack"
        }))
        .unwrap();
        assert_eq!(payload.first_name.as_deref(), Some("New"));
        assert!(!payload.is_empty());
        assert!(UpdateProfile::default().is_empty());
    }
}
