//! Client-related types shared between server and client
//!
//! Auth request/response types for `/api/users/*`.
//! Used by desk-client and desk-mock.

use serde::{Deserialize, Serialize};

use crate::models::{User, UserRole};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Login / register response
///
/// The backend flattens the user object and appends `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_is_flat() {
        let json = r#"{"id":3,"email":"a@x.io","firstName":"A","lastName":"B","role":"CUSTOMER","token":"t0k"}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.id, 3);
        assert_eq!(resp.token, "t0k");

        let back = serde_json::to_value(&resp).unwrap();
        assert_eq!(back["firstName"], "A");
        assert_eq!(back["token"], "t0k");
    }

    #[test]
    fn test_register_request_field_names() {
        let req = RegisterRequest {
            email: "a@x.io".into(),
            password: "pw".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: UserRole::Agent,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["firstName"], "A");
        assert_eq!(v["role"], "AGENT");
    }
}
