use serde::{Deserialize, Serialize};
use crate::config::CONFIG;
use crate::error::FieldErrors;
use crate::models::resource::{
    require, require_email, DeletePolicy, ListPolicy, PaginationMode, Payload, Resource,
    ResourceKind, SearchMode,
};

/// Usuario registrado (solo lectura y borrado desde el panel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// El backend usa `default.png` como marcador de "sin foto"
    pub fn avatar(&self) -> Option<&str> {
        self.profile_image
            .as_deref()
            .filter(|img| !img.is_empty() && *img != "default.png")
    }
}

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.avatar()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.mobile_number.as_deref());
        fields
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        match key {
            "role" => Some(self.role.as_str()),
            "status" => self.status.as_deref(),
            _ => None,
        }
    }

    fn policy() -> ListPolicy {
        ListPolicy {
            page_size: CONFIG.page_sizes.users,
            pagination: PaginationMode::Client,
            search: SearchMode::Client,
            on_delete: DeletePolicy::LocalPatch,
        }
    }
}

/// Formulario de perfil del administrador
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
}

impl ProfilePayload {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            mobile_number: user.mobile_number.clone().unwrap_or_default(),
        }
    }
}

impl Payload for ProfilePayload {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require_email(&mut errors, "email", &self.email);
        errors
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("email".to_string(), self.email.clone()),
            ("mobileNumber".to_string(), self.mobile_number.clone()),
        ]
    }

    fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile_number: self.mobile_number.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_png_is_not_an_avatar() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","name":"Ana","email":"ana@mall.io","role":"user","profileImage":"default.png"}"#,
        ).unwrap();
        assert_eq!(user.image(), None);
    }

    #[test]
    fn exposes_role_and_status_for_filters() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","name":"Ana","email":"ana@mall.io","role":"admin","status":"active"}"#,
        ).unwrap();
        assert_eq!(user.attribute("role"), Some("admin"));
        assert_eq!(user.attribute("status"), Some("active"));
        assert_eq!(user.attribute("category"), None);
    }

    #[test]
    fn profile_mobile_is_optional() {
        let payload = ProfilePayload {
            name: "Ana".into(),
            email: "ana@mall.io".into(),
            mobile_number: String::new(),
        };
        assert!(payload.validate().is_empty());

        let bad = ProfilePayload { email: "ana".into(), ..payload };
        assert_eq!(
            bad.validate().get("email").map(String::as_str),
            Some("Invalid email address")
        );
    }
}
