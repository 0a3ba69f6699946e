// ============================================================================
// APP - Aplicación principal: ruta actual, carga de datos y render
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{clear_children, current_hash, document, get_element_by_id, navigate};
use crate::models::{Coordinates, Coupon, Mall, Offer, ProfilePayload, Shop, User};
use crate::state::{ActiveForm, AppState, Route, Section};
use crate::utils::DEFAULT_MAP_POSITION;
use crate::viewmodels::FormMode;
use crate::views::cards::ListDisplay;
use crate::views::list::SEARCH_INPUT_ID;
use crate::views::render_app;
use crate::views::widgets::{handle_failure, spawn_and_rerender};

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;
        Ok(Self {
            state: AppState::new(),
            root,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Resolver el hash actual; si la ruta cambió, cargar sus datos
    pub fn sync_route(&self) {
        let hash = current_hash();
        let route = Route::resolve(&hash, self.state.is_authenticated());
        if route.to_hash() != hash {
            // Redirecciones (login <-> dashboard, rutas desconocidas)
            navigate(&route.to_hash());
        }
        if self.state.set_route(route.clone()) {
            enter_route(&self.state, &route);
        }
    }

    /// Re-render completo; el buscador conserva el foco
    pub fn render(&self) -> Result<(), JsValue> {
        let had_search_focus = document()
            .and_then(|d| d.active_element())
            .map(|el| el.id() == SEARCH_INPUT_ID)
            .unwrap_or(false);

        let tree = render_app(&self.state)?;
        clear_children(&self.root);
        self.root.append_child(&tree)?;

        if had_search_focus {
            if let Some(input) = get_element_by_id(SEARCH_INPUT_ID).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
                input.focus()?;
                let end = input.value().chars().count() as u32;
                input.set_selection_range(end, end)?;
            }
        }
        Ok(())
    }
}

fn load_list<R: ListDisplay>(state: &AppState) {
    let ctrl = R::controller(state);
    state.remount_search(&ctrl.state().search_term);
    let app = state.clone();
    spawn_and_rerender(async move {
        if let Err(e) = ctrl.load(1).await {
            handle_failure(&app, &e);
        }
    });
}

/// Carga de datos al entrar en una ruta
fn enter_route(state: &AppState, route: &Route) {
    log::info!("🧭 [ROUTER] Entrando en {}", route.to_hash());
    match route {
        Route::Login => {}
        Route::Dashboard => {
            let vm = state.dashboard.clone();
            let app = state.clone();
            spawn_and_rerender(async move {
                if let Err(e) = vm.load().await {
                    handle_failure(&app, &e);
                }
            });
        }
        Route::Users => load_list::<User>(state),
        Route::List(Section::Malls) => load_list::<Mall>(state),
        Route::List(Section::Shops) => load_list::<Shop>(state),
        Route::List(Section::Coupons) => load_list::<Coupon>(state),
        Route::List(Section::Offers) => load_list::<Offer>(state),
        Route::Create(section) => open_form(state, *section, FormMode::Create),
        Route::Edit(section, id) => open_form(state, *section, FormMode::Edit(id.clone())),
        Route::Profile => load_profile(state),
    }
}

fn open_form(state: &AppState, section: Section, mode: FormMode) {
    let form = state.open_form(section, mode);
    if let ActiveForm::Mall(vm) = &form {
        if !vm.mode().is_edit() {
            let (lat, lng) = DEFAULT_MAP_POSITION;
            vm.edit(|p| p.coordinates = Coordinates { lat, lng });
        }
    }

    let app = state.clone();
    spawn_and_rerender(async move {
        let options = match &form {
            ActiveForm::Mall(_) => Ok(()),
            ActiveForm::Shop(vm) => vm.load_options::<Mall>().await.map(|_| ()),
            ActiveForm::Coupon(vm) => vm.load_options::<Shop>().await.map(|_| ()),
            ActiveForm::Offer(vm) => vm.load_options::<Shop>().await.map(|_| ()),
        };
        let existing = match &form {
            ActiveForm::Mall(vm) => vm.load_existing().await.map(|_| ()),
            ActiveForm::Shop(vm) => vm.load_existing().await.map(|_| ()),
            ActiveForm::Coupon(vm) => vm.load_existing().await.map(|_| ()),
            ActiveForm::Offer(vm) => vm.load_existing().await.map(|_| ()),
        };
        for result in [options, existing] {
            if let Err(e) = result {
                log::error!("❌ [FORM] {}", e);
                handle_failure(&app, &e);
            }
        }
    });
}

fn load_profile(state: &AppState) {
    {
        let mut profile = state.profile.borrow_mut();
        profile.loading = true;
        profile.error = None;
        profile.notice = None;
    }
    let app = state.clone();
    spawn_and_rerender(async move {
        let result = app.auth.load_profile().await;
        if let Err(e) = &result {
            handle_failure(&app, e);
        }
        let mut profile = app.profile.borrow_mut();
        profile.loading = false;
        match result {
            Ok(user) => {
                profile.payload = ProfilePayload::from_user(&user);
                profile.user = Some(user);
            }
            Err(e) => profile.error = Some(e),
        }
    });
}
