use serde::{Deserialize, Serialize};
use crate::error::FieldErrors;
use crate::models::resource::{require, require_email};
use crate::models::session::Session;
use crate::utils::AVATAR_PLACEHOLDER_IMAGE;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        errors
    }
}

/// Usuario incluido en la respuesta de login
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<LoginUser>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// `token` o, en su defecto, `accessToken`
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or(self.access_token.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// Registro de sesión a persistir; `None` si el servidor no entregó token
    pub fn into_session(self, fallback_email: &str) -> Option<Session> {
        let token = self.bearer_token()?.to_string();
        let user = self.user.unwrap_or_default();
        Some(Session {
            id: user.id,
            name: user.name.unwrap_or_else(|| "Admin User".to_string()),
            email: user.email.unwrap_or_else(|| fallback_email.to_string()),
            role: user.role.unwrap_or_else(|| "admin".to_string()),
            avatar: Some(user.avatar.unwrap_or_else(|| AVATAR_PLACEHOLDER_IMAGE.to_string())),
            token,
            refresh_token: self.refresh_token,
        })
    }
}
