//! Wire types for the dashboard API

use calltrack_core::UserProfile;
use serde::{Deserialize, Serialize};

/// Username/password body shared by login and signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Login response. Every field is optional on the wire; a response missing the
/// user or access token is treated as a failed login by callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Signup response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Refresh request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Offset pagination query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub limit: usize,
    pub skip: usize,
}

/// One page of a log feed. `total` is only reported by some feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPage<T> {
    #[serde(default = "Vec::new")]
    pub logs: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
