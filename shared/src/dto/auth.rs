use serde::{Deserialize, Serialize};

/// OAuth2 password form sent to `/api/v1/auth/login` (form-encoded).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub password: String,
}

/// Token response (login success)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub user: UserInfo,
}

/// User information as returned by the auth and profile endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    #[serde(default, alias = "name", alias = "full_name", skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Error body. FastAPI puts a string in `detail` for handled errors and a list of
/// field errors for validation failures; other services use `message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Human-readable text for the error, if the body carried any.
    pub fn text(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) => return Some(s.clone()),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .map(str::to_string)
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
        self.message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_text_from_string_detail() {
        let err: ErrorResponse = serde_json::from_value(json!({"detail": "Credenciais inválidas"})).unwrap();
        assert_eq!(err.text().as_deref(), Some("Credenciais inválidas"));
    }

    #[test]
    fn test_error_text_from_validation_list() {
        let err: ErrorResponse = serde_json::from_value(json!({
            "detail": [{"loc": ["body", "valor"], "msg": "Valor deve ser positivo"}]
        }))
        .unwrap();
        assert_eq!(err.text().as_deref(), Some("Valor deve ser positivo"));
    }

    #[test]
    fn test_error_text_falls_back_to_message() {
        let err: ErrorResponse = serde_json::from_value(json!({"message": "boom"})).unwrap();
        assert_eq!(err.text().as_deref(), Some("boom"));
        assert_eq!(ErrorResponse::default().text(), None);
    }

    #[test]
    fn test_user_info_accepts_name_alias() {
        let user: UserInfo = serde_json::from_value(json!({"id": 7, "email": "a@b.com", "full_name": "Ana"})).unwrap();
        assert_eq!(user.nome.as_deref(), Some("Ana"));
        assert!(!user.is_admin);
    }
}
