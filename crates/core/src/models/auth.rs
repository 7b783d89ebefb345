//! Authentication payloads and generic acknowledgements.

use serde::{Deserialize, Serialize};

use crate::types::AdminId;

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

/// User block of the login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<AdminId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Acknowledgement returned by delete and password endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ack {
    pub success: Option<bool>,
    pub message: Option<String>,
}
