// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Un solo AppState clonable (todo Rc); las vistas leen y los handlers
// llaman a los viewmodels y luego a `rerender_app()`.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::models::{Coupon, Mall, Offer, ProfilePayload, Shop, User};
use crate::services::{ApiClient, ImageUpload, SessionStore};
use crate::state::{Route, Section};
use crate::utils::Debouncer;
use crate::viewmodels::{
    DashboardViewModel, FormMode, FormViewModel, ResourceListController, SessionViewModel,
};

/// Formulario abierto (alta o edición)
#[derive(Clone)]
pub enum ActiveForm {
    Mall(FormViewModel<Mall>),
    Shop(FormViewModel<Shop>),
    Coupon(FormViewModel<Coupon>),
    Offer(FormViewModel<Offer>),
}

impl ActiveForm {
    pub fn open(api: Rc<ApiClient>, section: Section, mode: FormMode) -> Self {
        match section {
            Section::Malls => ActiveForm::Mall(FormViewModel::new(api, mode)),
            Section::Shops => ActiveForm::Shop(FormViewModel::new(api, mode)),
            Section::Coupons => ActiveForm::Coupon(FormViewModel::new(api, mode)),
            Section::Offers => ActiveForm::Offer(FormViewModel::new(api, mode)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub user: Option<User>,
    pub payload: ProfilePayload,
    pub image: Option<ImageUpload>,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<ApiError>,
    pub notice: Option<String>,
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub api: Rc<ApiClient>,
    pub auth: SessionViewModel,
    pub route: Rc<RefCell<Route>>,

    // Listados
    pub malls: ResourceListController<Mall>,
    pub shops: ResourceListController<Shop>,
    pub coupons: ResourceListController<Coupon>,
    pub offers: ResourceListController<Offer>,
    pub users: ResourceListController<User>,

    pub dashboard: DashboardViewModel,
    pub form: Rc<RefCell<Option<ActiveForm>>>,
    pub login: Rc<RefCell<LoginState>>,
    pub profile: Rc<RefCell<ProfileState>>,
    pub sidebar_open: Rc<RefCell<bool>>,

    /// Debounce del buscador del listado visible
    pub search: Rc<RefCell<Debouncer>>,
}

impl AppState {
    pub fn new() -> Self {
        let session = SessionStore::browser();
        if session.init().is_some() {
            log::info!("💾 [SESSION] Sesión restaurada desde storage");
        }
        let api = Rc::new(ApiClient::new(session.clone()));

        Self {
            auth: SessionViewModel::new(api.clone()),
            malls: ResourceListController::new(api.clone()),
            shops: ResourceListController::new(api.clone()),
            coupons: ResourceListController::new(api.clone()),
            offers: ResourceListController::new(api.clone()),
            users: ResourceListController::new(api.clone()),
            dashboard: DashboardViewModel::new(api.clone()),
            route: Rc::new(RefCell::new(Route::Dashboard)),
            form: Rc::new(RefCell::new(None)),
            login: Rc::new(RefCell::new(LoginState::default())),
            profile: Rc::new(RefCell::new(ProfileState::default())),
            sidebar_open: Rc::new(RefCell::new(false)),
            search: Rc::new(RefCell::new(Debouncer::new(CONFIG.search_debounce_ms, ""))),
            session,
            api,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn route(&self) -> Route {
        self.route.borrow().clone()
    }

    /// Fijar la ruta resuelta; devuelve `true` si cambió
    pub fn set_route(&self, route: Route) -> bool {
        let changed = *self.route.borrow() != route;
        if changed {
            log::debug!("🧭 [ROUTER] {:?}", route);
            *self.route.borrow_mut() = route;
        }
        changed
    }

    /// Formulario para la ruta actual (se recrea al cambiar de ruta)
    pub fn open_form(&self, section: Section, mode: FormMode) -> ActiveForm {
        let form = ActiveForm::open(self.api.clone(), section, mode);
        *self.form.borrow_mut() = Some(form.clone());
        form
    }

    /// Nuevo debounce al montar un listado; el anterior queda cancelado
    pub fn remount_search(&self, mount_value: &str) {
        self.search.borrow().cancel();
        *self.search.borrow_mut() = Debouncer::new(CONFIG.search_debounce_ms, mount_value);
    }

    pub fn active_form(&self) -> Option<ActiveForm> {
        self.form.borrow().clone()
    }

    /// Tras logout: nada de los datos anteriores debe seguir visible
    pub fn reset_after_logout(&self) {
        self.malls.reset();
        self.shops.reset();
        self.coupons.reset();
        self.offers.reset();
        self.users.reset();
        self.dashboard.reset();
        *self.form.borrow_mut() = None;
        *self.profile.borrow_mut() = ProfileState::default();
        *self.login.borrow_mut() = LoginState::default();
        self.search.borrow().cancel();
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.reset_after_logout();
    }
}
