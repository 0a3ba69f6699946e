// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP
// ============================================================================
// Llamadas autenticadas contra el backend del directorio de malls.
// Sin lógica de pantalla: traduce respuestas a modelos o a `ApiError`.
// El token se obtiene de `SessionStore` antes de construir cualquier petición.
// ============================================================================

use serde_json::Value;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::models::{
    DashboardStats, Editable, LoginRequest, LoginResponse, Payload, ProfilePayload, Resource,
    ResourceKind, User,
};
use crate::services::envelope::{self, Page};
use crate::services::session_store::SessionStore;
use crate::services::transport::{
    FormField, GlooTransport, HttpRequest, HttpTransport, ImageUpload, Method,
};

/// Parámetros de un listado
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// `None` = colección completa (paginación local)
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    /// Filtros exactos enviados como query (`category`, `mall`, ...)
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search".to_string(), search.to_string()));
        }
        params.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .cloned(),
        );
        params
    }
}

/// Cliente API (stateless salvo la sesión inyectada)
pub struct ApiClient<T: HttpTransport = GlooTransport> {
    base_url: String,
    transport: T,
    session: SessionStore,
}

impl ApiClient<GlooTransport> {
    pub fn new(session: SessionStore) -> Self {
        Self::with_transport(CONFIG.backend_url(), GlooTransport, session)
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Petición con `Authorization: Bearer`; sin token falla antes de tocar la red
    fn authorized(&self, method: Method, path: &str) -> Result<HttpRequest, ApiError> {
        let token = self.session.token()?;
        Ok(HttpRequest::new(method, self.url(path)).bearer(&token))
    }

    /// Enviar y convertir status/cuerpo en `Value` o en la taxonomía de errores
    async fn execute(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        let body: Value = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?
        };
        envelope::ensure_success(response.status, &body)?;
        Ok(body)
    }

    /// Listar una página (o todo) de un tipo de recurso
    pub async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        let kind = R::KIND;
        let request = self
            .authorized(Method::Get, &kind.list_path())?
            .query(query.params());
        log::debug!("📋 [API] Listing {} {:?}", kind.collection_key(), query);
        let body = self.execute(request).await?;
        let page = envelope::list_page::<R>(body, query.limit)?;
        log::info!(
            "✅ [API] {} {} received ({} total)",
            page.items.len(),
            kind.collection_key(),
            page.total_items
        );
        Ok(page)
    }

    pub async fn get_by_id<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
        let kind = R::KIND;
        let request = self.authorized(Method::Get, &kind.detail_path(id))?;
        let body = self.execute(request).await?;
        envelope::detail(body, kind)
    }

    /// Crear; multipart si hay imagen, JSON si no
    pub async fn create<R: Editable>(
        &self,
        payload: &R::Payload,
        image: Option<&ImageUpload>,
    ) -> Result<R, ApiError> {
        let payload = checked(payload)?;
        let request = self.authorized(Method::Post, &R::create_path(&payload))?;
        let request = attach::<R::Payload>(request, &payload, R::image_field(), image)?;
        log::info!("➕ [API] Creating {}", R::KIND.singular_label());
        let body = self.execute(request).await?;
        envelope::saved(body, R::KIND, &payload, None)
    }

    pub async fn update<R: Editable>(
        &self,
        id: &str,
        payload: &R::Payload,
        image: Option<&ImageUpload>,
    ) -> Result<R, ApiError> {
        let payload = checked(payload)?;
        let request = self.authorized(Method::Put, &R::KIND.update_path(id))?;
        let request = attach::<R::Payload>(request, &payload, R::image_field(), image)?;
        log::info!("📝 [API] Updating {} {}", R::KIND.singular_label(), id);
        let body = self.execute(request).await?;
        envelope::saved(body, R::KIND, &payload, Some(id))
    }

    /// Borrar. Un 4xx de rechazo (salvo auth/404) es `Conflict`.
    pub async fn remove<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        let kind = R::KIND;
        let request = self.authorized(Method::Delete, &kind.delete_path(id))?;
        log::info!("🗑️ [API] Deleting {} {}", kind.singular_label(), id);
        match self.execute(request).await {
            Ok(_) => Ok(()),
            Err(ApiError::Validation { message, .. }) => Err(ApiError::Conflict(message)),
            Err(ApiError::Server { status, message }) if status < 300 => Err(ApiError::Conflict(message)),
            Err(e) => Err(e),
        }
    }

    /// Login (única llamada sin token)
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = HttpRequest::new(Method::Post, self.url("/api/users/login")).json(body);
        log::info!("🔐 [API] Logging in as {}", credentials.email);
        let body = match self.execute(request).await {
            Ok(body) => body,
            Err(ApiError::Validation { message, .. })
            | Err(ApiError::NotFound(message))
            | Err(ApiError::Server { message, .. }) => return Err(ApiError::Auth(message)),
            Err(e) => return Err(e),
        };
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let request = self.authorized(Method::Get, "/api/dashboard/stats")?;
        let body = self.execute(request).await?;
        envelope::dashboard(body)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<User, ApiError> {
        self.get_by_id::<User>(user_id).await
    }

    /// Perfil: siempre multipart (`profileImage` opcional)
    pub async fn update_profile(
        &self,
        user_id: &str,
        payload: &ProfilePayload,
        image: Option<&ImageUpload>,
    ) -> Result<User, ApiError> {
        let payload = checked(payload)?;
        let mut fields: Vec<FormField> = payload
            .form_fields()
            .iter()
            .map(|(name, value)| FormField::text(name, value))
            .collect();
        if let Some(upload) = image {
            fields.push(FormField::file("profileImage", upload));
        }
        let request = self
            .authorized(Method::Put, &ResourceKind::User.update_path(user_id))?
            .multipart(fields);
        let body = self.execute(request).await?;
        envelope::detail(body, ResourceKind::User)
    }
}

/// Normalizar y validar antes de enviar
fn checked<P: Payload>(payload: &P) -> Result<P, ApiError> {
    let payload = payload.normalized();
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::from_field_errors(errors));
    }
    Ok(payload)
}

fn attach<P: Payload>(
    request: HttpRequest,
    payload: &P,
    image_field: &str,
    image: Option<&ImageUpload>,
) -> Result<HttpRequest, ApiError> {
    match image {
        Some(upload) => {
            let mut fields: Vec<FormField> = payload
                .form_fields()
                .iter()
                .map(|(name, value)| FormField::text(name, value))
                .collect();
            fields.push(FormField::file(image_field, upload));
            Ok(request.multipart(fields))
        }
        None => {
            let body = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(request.json(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coupon, CouponPayload, Mall, Offer, Shop};
    use crate::services::transport::{FieldValue, RequestBody};
    use crate::testing::{authed_client, unauthenticated_client, MockTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn coupon_payload() -> CouponPayload {
        CouponPayload {
            shop_id: "s1".into(),
            code: "save10".into(),
            discount_amount: 10.0,
            start_date: "2025-01-01".into(),
            end_date: "2025-01-31".into(),
            usage_limit: 5,
        }
    }

    #[tokio::test]
    async fn list_sends_bearer_and_paging_params() {
        let (client, transport) = authed_client();
        transport.reply_json(200, json!({"success": true, "shops": [], "totalShops": 0}));

        let query = ListQuery { search: Some(" zara ".into()), ..ListQuery::page(2, 8) };
        let page = client.list::<Shop>(&query).await.unwrap();

        assert_eq!(page.total_pages, 1);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.test/api/shops/allShops");
        assert_eq!(sent.header("Authorization"), Some("Bearer test-token"));
        assert_eq!(sent.query_value("page"), Some("2"));
        assert_eq!(sent.query_value("limit"), Some("8"));
        assert_eq!(sent.query_value("search"), Some("zara"));
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let (client, transport) = unauthenticated_client();
        let result = client.list::<Mall>(&ListQuery::all()).await;
        assert_eq!(result, Err(ApiError::auth_missing()));
        let removal = client.remove::<Mall>("m1").await;
        assert!(matches!(removal, Err(ApiError::Auth(_))));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn detail_404_is_not_found() {
        let (client, transport) = authed_client();
        transport.reply_json(404, json!({"success": false, "message": "Offer not found"}));
        let result = client.get_by_id::<Offer>("gone").await;
        assert_eq!(result, Err(ApiError::NotFound("Offer not found".into())));
    }

    #[tokio::test]
    async fn create_without_image_posts_normalized_json() {
        let (client, transport) = authed_client();
        transport.reply_json(201, json!({"success": true, "coupon": {"_id": "c9", "code": "SAVE10"}}));

        let created = client.create::<Coupon>(&coupon_payload(), None).await.unwrap();

        assert_eq!(created.id, "c9");
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, "https://api.test/api/coupons/createCoupon/s1");
        match sent.body {
            RequestBody::Json(body) => {
                assert_eq!(body["code"], "SAVE10");
                assert_eq!(body["startDate"], "2025-01-01T00:00:00.000Z");
                assert_eq!(body["shop"], "s1");
            }
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_with_image_goes_multipart() {
        let (client, transport) = authed_client();
        transport.reply_json(200, json!({"success": true, "data": {"_id": "c1", "code": "SAVE10"}}));
        let image = ImageUpload {
            file_name: "banner.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };

        client.update::<Coupon>("c1", &coupon_payload(), Some(&image)).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.url, "https://api.test/api/coupons/updateCoupon/c1");
        let RequestBody::Multipart(fields) = sent.body else {
            panic!("expected multipart body");
        };
        assert!(fields.contains(&FormField::text("code", "SAVE10")));
        assert!(fields.iter().any(|f| f.name == "image" && matches!(f.value, FieldValue::File(_))));
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected_locally() {
        let (client, transport) = authed_client();
        let payload = CouponPayload { usage_limit: 0, ..coupon_payload() };
        let result = client.create::<Coupon>(&payload, None).await;
        let fields = result.unwrap_err().field_errors().cloned().unwrap_or_default();
        assert!(fields.contains_key("usageLimit"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn server_field_errors_are_preserved() {
        let (client, transport) = authed_client();
        transport.reply_json(400, json!({"message": "Invalid", "errors": {"code": "Code already used"}}));
        let err = client.create::<Coupon>(&coupon_payload(), None).await.unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|f| f.get("code")).map(String::as_str),
            Some("Code already used")
        );
    }

    #[tokio::test]
    async fn refused_delete_is_conflict() {
        let (client, transport) = authed_client();
        transport.reply_json(400, json!({"success": false, "message": "Mall still has shops"}));
        let result = client.remove::<Mall>("m1").await;
        assert_eq!(result, Err(ApiError::Conflict("Mall still has shops".into())));

        transport.reply_json(404, json!({"message": "Already gone"}));
        assert!(matches!(client.remove::<Mall>("m1").await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let (client, transport) = authed_client();
        transport.reply_error(ApiError::Network("offline".into()));
        let result = client.dashboard_stats().await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert!(result.unwrap_err().user_message().contains("connection"));
    }

    #[tokio::test]
    async fn login_is_unauthenticated_and_maps_rejection_to_auth() {
        let (client, transport) = unauthenticated_client();
        transport.reply_json(400, json!({"success": false, "message": "Invalid credentials"}));
        let result = client.login(&LoginRequest::new("a@b.io", "nope")).await;
        assert_eq!(result.unwrap_err(), ApiError::Auth("Invalid credentials".into()));
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header("Authorization"), None);
        assert_eq!(sent.url, "https://api.test/api/users/login");
    }

    #[tokio::test]
    async fn profile_update_is_multipart_with_profile_image() {
        let (client, transport) = authed_client();
        transport.reply_json(200, json!({"success": true, "user": {"_id": "u1", "name": "Ana"}}));
        let payload = ProfilePayload {
            name: "Ana".into(),
            email: "ana@mall.io".into(),
            mobile_number: String::new(),
        };
        let avatar = ImageUpload {
            file_name: "me.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![9],
        };
        let user = client.update_profile("u1", &payload, Some(&avatar)).await.unwrap();
        assert_eq!(user.name, "Ana");
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.test/api/users/updateProfile/u1");
        let RequestBody::Multipart(fields) = sent.body else {
            panic!("expected multipart body");
        };
        assert!(fields.iter().any(|f| f.name == "profileImage"));
    }

    #[test]
    fn blank_filters_are_not_sent() {
        let query = ListQuery {
            filters: vec![("category".into(), "".into()), ("mall".into(), "m1".into())],
            ..ListQuery::all()
        };
        assert_eq!(query.params(), vec![("mall".to_string(), "m1".to_string())]);
    }
}
