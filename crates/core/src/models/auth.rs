//! Staff login models for `POST /webLogin`.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::flexible_string;
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub phone: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(deserialize_with = "flexible_string")]
    pub token: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
}

/// Envelope returned by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<LoginData>,
}

impl LoginResponse {
    /// The session data, or the message to show the user.
    pub fn into_result(self) -> Result<LoginData, String> {
        match (self.success, self.data) {
            (true, Some(data)) if !data.token.is_empty() => Ok(data),
            _ => Err(self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Login failed".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_login_surfaces_upstream_message() {
        let res: LoginResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid password"}"#).unwrap();
        assert_eq!(res.into_result().unwrap_err(), "Invalid password");
    }

    #[test]
    fn failed_login_without_message_uses_default() {
        let res: LoginResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(res.into_result().unwrap_err(), "Login failed");
    }

    #[test]
    fn successful_login_yields_session_data() {
        let res: LoginResponse = serde_json::from_str(
            r#"{"success": true, "data": {"token": "abc", "name": "Admin"}}"#,
        )
        .unwrap();
        let data = res.into_result().unwrap();
        assert_eq!(data.token, "abc");
        assert_eq!(data.name, "Admin");
    }
}
