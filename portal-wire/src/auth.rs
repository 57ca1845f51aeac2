//! Auth wire types for `/api/check-auth` and `/api/login`.

use serde::{Deserialize, Serialize};

/// Response body of `GET /api/check-auth`.
///
/// `user` is only present when `is_auth` is true.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckAuthResponse {
    #[serde(rename = "isAuth", default)]
    pub is_auth: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// The user attached to an authenticated session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    /// Role-profile id (driver id, supplier id, ...), not the account id
    #[serde(default)]
    pub id: Option<i64>,

    /// Role as stored by the API (e.g. "driver", "stock_keeper")
    pub role: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_response() {
        let json = r#"{"isAuth":true,"user":{"id":4,"role":"driver","email":"driver@dbms.com"}}"#;
        let response: CheckAuthResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_auth);
        let user = response.user.unwrap();
        assert_eq!(user.id, Some(4));
        assert_eq!(user.role, "driver");
    }

    #[test]
    fn test_anonymous_response_has_no_user() {
        let response: CheckAuthResponse = serde_json::from_str(r#"{"isAuth":false}"#).unwrap();
        assert_eq!(response, CheckAuthResponse::default());
    }
}
