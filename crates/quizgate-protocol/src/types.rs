//! Core record types for the Auth API and persisted sessions.
//!
//! Everything here is serialized with camelCase keys because that is what
//! the Auth API sends (`firstName`, `roleLevel`, `lastLogin`) and what the
//! browser client historically wrote into storage. Keeping one shape for
//! both means a persisted user is byte-for-byte what the API returned,
//! plus any profile edits merged on top.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A user's numeric identifier as issued by the Auth API.
///
/// Newtype wrapper so a user id can't be confused with any other integer.
/// `#[serde(transparent)]` keeps it a bare number on the wire: `UserId(42)`
/// is just `42` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoleLevel
// ---------------------------------------------------------------------------

/// A user's authorization level.
///
/// The known set is closed: `user`, `admin`, `super_admin`. The API is
/// outside our control though, so any other string is kept verbatim in
/// [`RoleLevel::Other`] instead of failing the whole login. Authorization
/// helpers treat `Other` as the lowest privilege.
///
/// `#[serde(from = "String", into = "String")]` routes (de)serialization
/// through the `From` impls below, so `Other("auditor")` round-trips as
/// `"auditor"` rather than as a tagged object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleLevel {
    User,
    Admin,
    SuperAdmin,
    /// A value outside the known set, preserved as sent.
    Other(String),
}

impl RoleLevel {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
            Self::Other(raw) => raw,
        }
    }

    /// `true` for `admin` and `super_admin`.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// `true` only for `super_admin`.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// `true` when the value is one of the three known levels.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for RoleLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" => Self::User,
            "admin" => Self::Admin,
            "super_admin" => Self::SuperAdmin,
            _ => Self::Other(raw),
        }
    }
}

impl From<RoleLevel> for String {
    fn from(role: RoleLevel) -> Self {
        match role {
            RoleLevel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The cached identity of the signed-in user.
///
/// Audit timestamps are kept as the opaque strings the API sends; nothing
/// client-side does arithmetic on them, and parsing would only add a way
/// for hydration to fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    pub role_level: RoleLevel,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

impl User {
    /// "First Last", trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// ProfileUpdate
// ---------------------------------------------------------------------------

/// A partial user record sent to `PUT /auth/profile`.
///
/// Only the fields that are `Some` are serialized, so the server sees
/// exactly what the user edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl ProfileUpdate {
    /// `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.organization.is_none()
            && self.department.is_none()
    }

    /// Merges the set fields into `user`, leaving the rest untouched.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(first) = &self.first_name {
            user.first_name.clone_from(first);
        }
        if let Some(last) = &self.last_name {
            user.last_name.clone_from(last);
        }
        if let Some(org) = &self.organization {
            user.organization = Some(org.clone());
        }
        if let Some(dept) = &self.department {
            user.department = Some(dept.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

// Request types carrying passwords implement `Debug` by hand so a stray
// `{:?}` in a log line can never print a credential.

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("organization", &self.organization)
            .field("department", &self.department)
            .finish()
    }
}

/// Body of `POST /auth/change-password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("current_password", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Success body of login and register: the user plus a fresh token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Success body of `GET /auth/profile`.
///
/// Deployments disagree on whether the user comes wrapped (`{"user": {...}}`)
/// or bare, so both are accepted. `#[serde(untagged)]` tries each variant
/// in order until one parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Wrapped { user: User },
    Bare(User),
}

impl ProfileResponse {
    /// Unwraps to the user record regardless of shape.
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// Failure body of every endpoint: `{"error": "..."}`.
///
/// `error` is optional because a proxy or crash page may answer with any
/// JSON at all; callers fall back to a generic message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The server's message, if it sent a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.trim().is_empty())
    }
}
