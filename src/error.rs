// ============================================================================
// API ERROR - Taxonomía de errores del cliente remoto
// ============================================================================
// Todos los fallos de transporte y de servidor se convierten aquí antes de
// llegar a los viewmodels. Ningún error escapa al estado global.
// ============================================================================

use std::collections::BTreeMap;
use thiserror::Error;

/// Mensajes de validación por campo (`campo -> mensaje`)
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Sin token o token rechazado: hay que volver al login
    #[error("Authentication required: {0}")]
    Auth(String),

    /// 4xx con mensajes por campo (o validación local previa al envío)
    #[error("Validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Not found: {0}")]
    NotFound(String),

    /// El servidor rechaza la operación (p.ej. borrado bloqueado por referencias)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    /// 5xx o sobre `success: false` en una respuesta 2xx
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn auth_missing() -> Self {
        ApiError::Auth("Authentication token not found".to_string())
    }

    /// Validación local con un único campo en error
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.to_string());
        ApiError::Validation {
            message: "Please correct the highlighted fields".to_string(),
            fields,
        }
    }

    pub fn from_field_errors(fields: FieldErrors) -> Self {
        ApiError::Validation {
            message: "Please correct the highlighted fields".to_string(),
            fields,
        }
    }

    /// Construir el error a partir del status HTTP y del cuerpo de la respuesta
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| default_message(status));

        match status {
            401 | 403 => ApiError::Auth(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            400..=499 => ApiError::Validation {
                message,
                fields: parsed.as_ref().map(extract_field_errors).unwrap_or_default(),
            },
            _ => ApiError::Server { status, message },
        }
    }

    /// El usuario debe ser redirigido al login
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Mensaje mostrado al usuario (el `message` del servidor tal cual cuando existe)
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m.clone(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) => {
                "Could not reach the server. Please check your connection and try again.".to_string()
            }
            ApiError::Decode(_) => "The server returned an unexpected response.".to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

fn default_message(status: u16) -> String {
    match status {
        401 | 403 => "Session expired, please log in again".to_string(),
        404 => "The requested record no longer exists".to_string(),
        409 => "The server refused the operation".to_string(),
        _ => format!("Request failed with status {}", status),
    }
}

fn extract_message(value: &serde_json::Value) -> Option<String> {
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

/// `errors` puede venir como mapa `{campo: mensaje}` o como lista
/// `[{field|path|param, msg|message}]`
fn extract_field_errors(value: &serde_json::Value) -> FieldErrors {
    let mut fields = FieldErrors::new();
    match value.get("errors") {
        Some(serde_json::Value::Object(map)) => {
            for (field, detail) in map {
                let text = match detail {
                    serde_json::Value::String(s) => Some(s.clone()),
                    other => extract_message(other),
                };
                if let Some(text) = text {
                    fields.insert(field.clone(), text);
                }
            }
        }
        Some(serde_json::Value::Array(entries)) => {
            for entry in entries {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|key| entry.get(key).and_then(|v| v.as_str()));
                let text = ["msg", "message"]
                    .iter()
                    .find_map(|key| entry.get(key).and_then(|v| v.as_str()));
                if let (Some(field), Some(text)) = (field, text) {
                    fields.insert(field.to_string(), text.to_string());
                }
            }
        }
        _ => {}
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_statuses_to_taxonomy() {
        assert!(matches!(ApiError::from_status(401, "{}"), ApiError::Auth(_)));
        assert!(matches!(ApiError::from_status(403, ""), ApiError::Auth(_)));
        assert!(matches!(ApiError::from_status(404, "{}"), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(409, "{}"), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from_status(422, "{}"), ApiError::Validation { .. }));
        assert!(matches!(
            ApiError::from_status(502, "<html>bad gateway</html>"),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ApiError::from_status(409, r#"{"success":false,"message":"Mall still has shops"}"#);
        assert_eq!(err.user_message(), "Mall still has shops");
    }

    #[test]
    fn parses_field_errors_from_map_and_array() {
        let from_map = ApiError::from_status(
            400,
            r#"{"message":"Invalid","errors":{"name":"Name is required","rating":{"message":"Too high"}}}"#,
        );
        let fields = from_map.field_errors().cloned().unwrap_or_default();
        assert_eq!(fields.get("name").map(String::as_str), Some("Name is required"));
        assert_eq!(fields.get("rating").map(String::as_str), Some("Too high"));

        let from_array = ApiError::from_status(
            422,
            r#"{"message":"Invalid","errors":[{"path":"code","msg":"Code taken"},{"param":"usageLimit","message":"Must be >= 1"}]}"#,
        );
        let fields = from_array.field_errors().cloned().unwrap_or_default();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("code").map(String::as_str), Some("Code taken"));
    }

    #[test]
    fn only_auth_requires_login() {
        assert!(ApiError::auth_missing().requires_login());
        assert!(!ApiError::Network("offline".into()).requires_login());
    }
}
