use serde::{Deserialize, Serialize};

use crate::model::db::Role;

/// Body of a registration request. The role defaults to voter; the admin
/// registration page submits the same shape with `"role": "admin"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Body of a login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A successful login: the signed bearer token plus the role, so the client
/// can route to the right dashboard without decoding the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json;

    use super::*;

    #[test]
    fn register_role_defaults_to_absent() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name": "Asha Rao", "email": "asha@college.edu", "password": "pw"}"#,
        )
        .unwrap();
        assert_eq!(req.role, None);
    }

    #[test]
    fn register_accepts_admin_role() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name": "Dean Okafor", "email": "dean@college.edu", "password": "pw", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Some(Role::Admin));
    }

    #[test]
    fn login_response_exposes_role_string() {
        let response = LoginResponse {
            token: "abc".to_string(),
            role: Role::Admin,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"token":"abc","role":"admin"}"#);
    }
}
