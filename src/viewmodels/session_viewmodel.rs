// ============================================================================
// SESSION VIEWMODEL - LOGIN, LOGOUT Y PERFIL
// ============================================================================
// Devuelve valores; el estado de la app decide qué re-renderizar.
// ============================================================================

use std::rc::Rc;

use crate::error::ApiError;
use crate::models::{LoginRequest, ProfilePayload, Session, User};
use crate::services::{ApiClient, GlooTransport, HttpTransport, ImageUpload};

/// ViewModel de sesión - SOLO lógica de negocio
pub struct SessionViewModel<T: HttpTransport = GlooTransport> {
    api: Rc<ApiClient<T>>,
}

impl<T: HttpTransport> Clone for SessionViewModel<T> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone() }
    }
}

impl<T: HttpTransport> SessionViewModel<T> {
    pub fn new(api: Rc<ApiClient<T>>) -> Self {
        Self { api }
    }

    pub fn current(&self) -> Option<Session> {
        self.api.session().get()
    }

    /// Login: valida, autentica y guarda la sesión
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let credentials = LoginRequest::new(email, password);
        let errors = credentials.validate();
        if !errors.is_empty() {
            return Err(ApiError::from_field_errors(errors));
        }

        let response = self.api.login(&credentials).await?;
        if !response.success && response.bearer_token().is_none() {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(ApiError::Auth(message));
        }

        let session = response
            .into_session(&credentials.email)
            .ok_or_else(|| ApiError::Auth("No token received from server".to_string()))?;

        log::info!("✅ [SESSION] Logged in as {} ({})", session.email, session.role);
        self.api.session().set(session.clone());
        Ok(session)
    }

    /// Logout: borra la sesión; las respuestas en vuelo quedan descartadas
    pub fn logout(&self) {
        log::info!("👋 [SESSION] Logout");
        self.api.session().clear();
    }

    fn session_user_id(&self) -> Result<String, ApiError> {
        let session = self.api.session().get().ok_or_else(ApiError::auth_missing)?;
        session
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::NotFound("Profile id is not available for this session".to_string()))
    }

    pub async fn load_profile(&self) -> Result<User, ApiError> {
        let id = self.session_user_id()?;
        self.api.get_profile(&id).await
    }

    /// Guardar el perfil y reflejarlo en la sesión (barra superior)
    pub async fn update_profile(
        &self,
        payload: &ProfilePayload,
        image: Option<&ImageUpload>,
    ) -> Result<User, ApiError> {
        let id = self.session_user_id()?;
        let user = self.api.update_profile(&id, payload, image).await?;
        let name = if user.name.is_empty() { payload.name.as_str() } else { user.name.as_str() };
        let email = if user.email.is_empty() { payload.email.as_str() } else { user.email.as_str() };
        self.api.session().update_profile(name, email, user.avatar());
        log::info!("✅ [SESSION] Profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{authed_client, unauthenticated_client};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn login_stores_session_with_defaults() {
        let (client, transport) = unauthenticated_client();
        transport.reply_json(200, json!({"success": true, "token": "jwt", "user": {"_id": "u9", "email": "boss@mall.io"}}));
        let vm = SessionViewModel::new(Rc::new(client));

        let session = vm.login("boss@mall.io", "secret").await.unwrap();

        assert_eq!(session.token, "jwt");
        assert_eq!(session.name, "Admin User");
        assert_eq!(vm.current().map(|s| s.token), Some("jwt".to_string()));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_server() {
        let (client, transport) = unauthenticated_client();
        let vm = SessionViewModel::new(Rc::new(client));
        let err = vm.login("", "").await.unwrap_err();
        assert!(err.field_errors().is_some());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn success_without_token_is_auth_error() {
        let (client, transport) = unauthenticated_client();
        transport.reply_json(200, json!({"success": true}));
        let vm = SessionViewModel::new(Rc::new(client));
        let result = vm.login("boss@mall.io", "secret").await;
        assert!(matches!(result, Err(ApiError::Auth(_))));
        assert!(vm.current().is_none());
    }

    #[tokio::test]
    async fn logout_clears_session_and_blocks_requests() {
        let (client, transport) = authed_client();
        let vm = SessionViewModel::new(Rc::new(client));
        vm.logout();
        assert!(vm.current().is_none());
        assert!(matches!(vm.load_profile().await, Err(ApiError::Auth(_))));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn profile_update_refreshes_session() {
        let (client, transport) = authed_client();
        transport.reply_json(200, json!({"success": true, "user": {
            "_id": "u1", "name": "New Name", "email": "new@mall.io", "profileImage": "https://img/me.png"
        }}));
        let vm = SessionViewModel::new(Rc::new(client));
        let payload = ProfilePayload {
            name: "New Name".into(),
            email: "new@mall.io".into(),
            mobile_number: "555".into(),
        };

        vm.update_profile(&payload, None).await.unwrap();

        let session = vm.current().unwrap();
        assert_eq!(session.name, "New Name");
        assert_eq!(session.avatar.as_deref(), Some("https://img/me.png"));
        assert_eq!(session.token, "test-token");
    }
}
