use serde::{Deserialize, Serialize};

// ============================================================================
// SESSION - Registro persistido del administrador autenticado
// ============================================================================

/// Registro guardado bajo `adminUser` en localStorage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Sin token no hay sesión, aunque el registro exista
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Cabecera `Authorization`
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Iniciales para el avatar de la barra superior
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_token_is_not_authenticated() {
        let session: Session = serde_json::from_str(r#"{"name":"Ana","email":"ana@mall.io","role":"admin"}"#).unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn round_trips_camel_case_storage_record() {
        let raw = r#"{"id":"u1","name":"Ana Ruiz","email":"ana@mall.io","role":"admin","token":"t0k","refreshToken":"r1"}"#;
        let session: Session = serde_json::from_str(raw).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.bearer(), "Bearer t0k");
        assert_eq!(session.initials(), "AR");
    }
}
