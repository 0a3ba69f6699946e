// ============================================================================
// FORM VIEWMODEL - Alta y edición de malls, tiendas, cupones y ofertas
// ============================================================================
// Validación local antes de cualquier envío; los errores del servidor por
// campo se guardan igual que los locales para mostrarlos en línea.
// ============================================================================

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::{ApiError, FieldErrors};
use crate::models::{Editable, Payload, Resource};
use crate::services::{ApiClient, GlooTransport, HttpTransport, ImageUpload, ListQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone)]
pub struct FormState<R: Editable> {
    pub original: Option<R>,
    /// Valores actuales del formulario
    pub payload: R::Payload,
    pub image: Option<ImageUpload>,
    /// Opciones `(id, nombre)` del selector de referencia
    pub options: Vec<(String, String)>,
    pub field_errors: FieldErrors,
    pub error: Option<ApiError>,
    pub loading: bool,
    pub submitting: bool,
}

impl<R: Editable> Default for FormState<R> {
    fn default() -> Self {
        Self {
            original: None,
            payload: R::Payload::default(),
            image: None,
            options: Vec::new(),
            field_errors: FieldErrors::new(),
            error: None,
            loading: false,
            submitting: false,
        }
    }
}

pub struct FormViewModel<R: Editable, T: HttpTransport = GlooTransport> {
    api: Rc<ApiClient<T>>,
    mode: FormMode,
    state: Rc<RefCell<FormState<R>>>,
}

impl<R: Editable, T: HttpTransport> Clone for FormViewModel<R, T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            mode: self.mode.clone(),
            state: self.state.clone(),
        }
    }
}

impl<R: Editable, T: HttpTransport> FormViewModel<R, T> {
    pub fn new(api: Rc<ApiClient<T>>, mode: FormMode) -> Self {
        Self {
            api,
            mode,
            state: Rc::new(RefCell::new(FormState::default())),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> Ref<'_, FormState<R>> {
        self.state.borrow()
    }

    /// En edición, un único fetch del registro; en alta, nada
    pub async fn load_existing(&self) -> Result<Option<R>, ApiError> {
        let FormMode::Edit(id) = &self.mode else {
            return Ok(None);
        };
        self.state.borrow_mut().loading = true;
        let result = self.api.get_by_id::<R>(id).await;
        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(record) => {
                state.payload = record.to_payload();
                state.original = Some(record.clone());
                state.error = None;
                Ok(Some(record))
            }
            Err(e) => {
                log::error!("❌ [FORM] Could not load {} {}: {}", R::KIND.singular_label(), id, e);
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Opciones de un selector de referencia (malls para tiendas, tiendas para cupones/ofertas)
    pub async fn load_options<P: Resource>(&self) -> Result<Vec<P>, ApiError> {
        let items = self.api.list::<P>(&ListQuery::all()).await?.items;
        self.state.borrow_mut().options = items
            .iter()
            .map(|item| (item.id().to_string(), item.label().to_string()))
            .collect();
        Ok(items)
    }

    /// Mutar los valores del formulario desde los handlers de la vista
    pub fn edit<F: FnOnce(&mut R::Payload)>(&self, change: F) {
        change(&mut self.state.borrow_mut().payload);
    }

    pub fn set_image(&self, image: Option<ImageUpload>) {
        self.state.borrow_mut().image = image;
    }

    pub fn dismiss_error(&self) {
        self.state.borrow_mut().error = None;
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.state.borrow().field_errors.get(field).cloned()
    }

    /// Validar y enviar. Con errores locales no hay petición.
    pub async fn submit(&self) -> Result<R, ApiError> {
        let (payload, image) = {
            let state = self.state.borrow();
            (state.payload.normalized(), state.image.clone())
        };

        let errors = payload.validate();
        if !errors.is_empty() {
            let error = ApiError::from_field_errors(errors.clone());
            let mut state = self.state.borrow_mut();
            state.field_errors = errors;
            state.error = Some(error.clone());
            return Err(error);
        }

        {
            let mut state = self.state.borrow_mut();
            state.submitting = true;
            state.field_errors.clear();
            state.error = None;
        }

        let result = match &self.mode {
            FormMode::Create => self.api.create::<R>(&payload, image.as_ref()).await,
            FormMode::Edit(id) => self.api.update::<R>(id, &payload, image.as_ref()).await,
        };

        let mut state = self.state.borrow_mut();
        state.submitting = false;
        match result {
            Ok(saved) => {
                log::info!("✅ [FORM] Saved {} {}", R::KIND.singular_label(), saved.id());
                state.original = Some(saved.clone());
                Ok(saved)
            }
            Err(e) => {
                if let Some(fields) = e.field_errors() {
                    state.field_errors = fields.clone();
                }
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mall, Offer, Shop};
    use crate::testing::{authed_client, MockTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form<R: Editable>(mode: FormMode) -> (FormViewModel<R, Rc<MockTransport>>, Rc<MockTransport>) {
        let (client, transport) = authed_client();
        (FormViewModel::new(Rc::new(client), mode), transport)
    }

    #[tokio::test]
    async fn edit_mode_fetches_record_exactly_once() {
        let (vm, transport) = form::<Offer>(FormMode::Edit("o1".into()));
        transport.reply_json(200, json!({"success": true, "offer": {
            "_id": "o1", "title": "Sale", "description": "Half off", "discountPercentage": 50,
            "startDate": "2025-02-01T00:00:00.000Z", "endDate": "2025-02-10T00:00:00.000Z",
            "shop": {"_id": "s1", "shopName": "Zara"}
        }}));

        vm.load_existing().await.unwrap();

        assert_eq!(transport.request_count(), 1);
        let state = vm.state();
        assert_eq!(state.payload.shop_id, "s1");
        assert_eq!(state.payload.start_date, "2025-02-01");
        assert_eq!(state.payload.discount_percentage, 50.0);
    }

    #[tokio::test]
    async fn create_mode_does_not_fetch() {
        let (vm, transport) = form::<Mall>(FormMode::Create);
        assert_eq!(vm.load_existing().await, Ok(None));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn local_validation_blocks_submit() {
        let (vm, transport) = form::<Shop>(FormMode::Create);
        vm.edit(|p| p.shop_name = "Zara".into());

        let result = vm.submit().await;

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert_eq!(transport.request_count(), 0);
        assert_eq!(vm.field_error("mallId").as_deref(), Some("Required"));
        assert_eq!(vm.field_error("shopName"), None);
    }

    #[tokio::test]
    async fn server_field_errors_land_on_the_form() {
        let (vm, transport) = form::<Shop>(FormMode::Edit("s1".into()));
        transport.reply_json(422, json!({"message": "Invalid", "errors": [{"path": "shopName", "msg": "Name taken"}]}));
        vm.edit(|p| {
            p.shop_name = "Zara".into();
            p.mall_id = "m1".into();
            p.category = "Clothing".into();
            p.opening_hours = "10-22".into();
            p.rating = 4.0;
        });

        let result = vm.submit().await;

        assert!(result.is_err());
        assert_eq!(vm.field_error("shopName").as_deref(), Some("Name taken"));
        assert!(!vm.state().submitting);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.test/api/shops/updateShop/s1");
    }

    #[tokio::test]
    async fn successful_create_returns_saved_record() {
        let (vm, transport) = form::<Mall>(FormMode::Create);
        transport.reply_json(201, json!({"success": true, "mall": {"_id": "m7", "name": "Plaza"}}));
        vm.edit(|p| {
            p.name = "Plaza".into();
            p.location = "Center".into();
            p.opening_hours = "9-21".into();
            p.facilities = vec!["Parking".into()];
            p.rating = 4.0;
        });

        let saved = vm.submit().await.unwrap();

        assert_eq!(saved.id, "m7");
        assert_eq!(transport.last_request().unwrap().url, "https://api.test/api/malls/create");
    }

    #[tokio::test]
    async fn create_acknowledged_without_record_still_succeeds() {
        let (vm, transport) = form::<Mall>(FormMode::Create);
        transport.reply_json(201, json!({"success": true, "message": "Mall created successfully"}));
        vm.edit(|p| {
            p.name = "City Center".into();
            p.location = "Downtown".into();
            p.opening_hours = "9-21".into();
            p.facilities = vec!["Parking".into()];
            p.rating = 4.0;
        });

        let saved = vm.submit().await.unwrap();

        assert_eq!(saved.name, "City Center");
        assert_eq!(saved.id, "");
        assert_eq!(saved.facilities, vec!["Parking".to_string()]);
        assert!(!vm.state().submitting);
        assert_eq!(vm.state().error, None);
    }

    #[tokio::test]
    async fn update_acknowledged_without_record_keeps_known_id() {
        let (vm, transport) = form::<Offer>(FormMode::Edit("o1".into()));
        transport.reply_json(200, json!({"success": true, "message": "Offer updated successfully"}));
        vm.edit(|p| {
            p.shop_id = "s1".into();
            p.title = "Sale".into();
            p.description = "Half off".into();
            p.discount_percentage = 50.0;
            p.start_date = "2025-02-01".into();
            p.end_date = "2025-02-10".into();
        });

        let saved = vm.submit().await.unwrap();

        assert_eq!(saved.id, "o1");
        assert_eq!(saved.title, "Sale");
        assert_eq!(saved.shop.as_ref().map(|s| s.id().to_string()), Some("s1".to_string()));
    }

    #[tokio::test]
    async fn reference_options_use_unpaginated_list() {
        let (vm, transport) = form::<Shop>(FormMode::Create);
        transport.reply_json(200, json!({"success": true, "malls": [{"_id": "m1", "name": "Plaza"}]}));

        let malls = vm.load_options::<Mall>().await.unwrap();

        assert_eq!(malls.len(), 1);
        assert_eq!(vm.state().options, vec![("m1".to_string(), "Plaza".to_string())]);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.query_value("page"), None);
    }
}
