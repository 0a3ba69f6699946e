// ============================================================================
// LIST VIEWMODEL - Controlador genérico de listados
// ============================================================================
// Un controlador por tipo de recurso (malls, shops, coupons, offers, users).
// Orquesta fetch -> búsqueda/filtros -> paginación -> borrado confirmado.
// Cada `load` recibe un ticket; solo el ticket más reciente puede escribir
// el estado, y nada se escribe si la sesión cambió mientras tanto.
// ============================================================================

use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::{DeletePolicy, ListPolicy, PaginationMode, Resource, SearchMode};
use crate::services::{ApiClient, GlooTransport, HttpTransport, ListQuery, Page};
use crate::utils::{apply_filters, evaluate, is_navigable, total_pages_for, windows, PageWindow};
use crate::viewmodels::delete_flow::DeleteFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Resultado de una carga
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// El estado refleja la respuesta
    Committed,
    /// Cambio de página redundante o fuera de rango; no hubo petición
    Skipped,
    /// Llegó después de otra carga más reciente; descartada
    Superseded,
    /// Hubo login/logout durante la petición; descartada
    SessionChanged,
}

/// Estado de un listado (propiedad exclusiva de su controlador)
#[derive(Debug, Clone)]
pub struct ListViewState<R> {
    pub items: Vec<R>,
    /// Siempre `filtros(búsqueda(items))`
    pub filtered_items: Vec<R>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub phase: ListPhase,
    pub error: Option<ApiError>,
    pub search_term: String,
    pub filters: BTreeMap<String, String>,
    pub delete: DeleteFlow<R>,
    pub deleting: bool,
}

impl<R> ListViewState<R> {
    fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            filtered_items: Vec::new(),
            page: 1,
            page_size,
            total_items: 0,
            total_pages: 1,
            phase: ListPhase::Idle,
            error: None,
            search_term: String::new(),
            filters: BTreeMap::new(),
            delete: DeleteFlow::Armed,
            deleting: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn filter(&self, key: &str) -> &str {
        self.filters.get(key).map(String::as_str).unwrap_or("")
    }
}

pub struct ResourceListController<R: Resource, T: HttpTransport = GlooTransport> {
    api: Rc<ApiClient<T>>,
    policy: ListPolicy,
    state: Rc<RefCell<ListViewState<R>>>,
    seq: Rc<Cell<u64>>,
}

impl<R: Resource, T: HttpTransport> Clone for ResourceListController<R, T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            policy: self.policy,
            state: self.state.clone(),
            seq: self.seq.clone(),
        }
    }
}

impl<R: Resource, T: HttpTransport> ResourceListController<R, T> {
    pub fn new(api: Rc<ApiClient<T>>) -> Self {
        Self::with_policy(api, R::policy())
    }

    pub fn with_policy(api: Rc<ApiClient<T>>, policy: ListPolicy) -> Self {
        Self {
            api,
            policy,
            state: Rc::new(RefCell::new(ListViewState::new(policy.page_size.max(1)))),
            seq: Rc::new(Cell::new(0)),
        }
    }

    pub fn policy(&self) -> ListPolicy {
        self.policy
    }

    pub fn state(&self) -> Ref<'_, ListViewState<R>> {
        self.state.borrow()
    }

    /// Vaciar el estado (al cerrar sesión); invalida cargas en vuelo
    pub fn reset(&self) {
        self.next_ticket();
        let page_size = self.state.borrow().page_size;
        *self.state.borrow_mut() = ListViewState::new(page_size);
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.seq.get() + 1;
        self.seq.set(ticket);
        ticket
    }

    fn query_for(&self, state: &ListViewState<R>, page: u32) -> ListQuery {
        let mut query = match self.policy.pagination {
            PaginationMode::Client => ListQuery::all(),
            PaginationMode::Server => ListQuery::page(page.max(1), state.page_size),
        };
        if self.policy.search == SearchMode::Server {
            query.search = Some(state.search_term.clone());
        }
        if self.policy.pagination == PaginationMode::Server {
            query.filters = state
                .filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
        }
        query
    }

    /// Cargar `page`. Una carga posterior deja obsoleta a esta aunque
    /// su respuesta llegue antes.
    pub async fn load(&self, page: u32) -> Result<LoadOutcome, ApiError> {
        let ticket = self.next_ticket();
        let epoch = self.api.session().epoch();
        let query = {
            let mut state = self.state.borrow_mut();
            state.phase = ListPhase::Loading;
            state.error = None;
            self.query_for(&state, page)
        };

        let result = self.api.list::<R>(&query).await;

        if ticket != self.seq.get() {
            log::debug!("⏭️ [LIST] Discarding stale {} page {}", R::KIND.collection_key(), page);
            return Ok(LoadOutcome::Superseded);
        }
        let mut state = self.state.borrow_mut();
        if epoch != self.api.session().epoch() {
            log::info!("⏭️ [LIST] Session changed while loading {}", R::KIND.collection_key());
            state.phase = ListPhase::Idle;
            return Ok(LoadOutcome::SessionChanged);
        }

        match result {
            Ok(data) => {
                self.commit(&mut state, page, data);
                Ok(LoadOutcome::Committed)
            }
            Err(e) => {
                log::error!("❌ [LIST] Loading {} failed: {}", R::KIND.collection_key(), e);
                state.phase = ListPhase::Error;
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn commit(&self, state: &mut ListViewState<R>, page: u32, data: Page<R>) {
        state.items = data.items;
        state.page = page.max(1);
        if self.policy.pagination == PaginationMode::Server {
            state.total_items = data.total_items;
            state.total_pages = data.total_pages.max(1);
        }
        self.refilter(state);
        state.phase = ListPhase::Ready;
    }

    /// Recalcular `filtered_items` (y totales locales) desde `items`
    fn refilter(&self, state: &mut ListViewState<R>) {
        let searched = match self.policy.search {
            SearchMode::Client => evaluate(&state.items, &state.search_term),
            SearchMode::Server => state.items.clone(),
        };
        state.filtered_items = match self.policy.pagination {
            PaginationMode::Client => apply_filters(searched, &state.filters),
            PaginationMode::Server => searched,
        };
        if self.policy.pagination == PaginationMode::Client {
            state.total_items = state.filtered_items.len() as u32;
            state.total_pages = total_pages_for(state.total_items, state.page_size);
        }
        state.page = state.page.clamp(1, state.total_pages.max(1));
    }

    /// Búsqueda libre. En servidor vuelve a la página 1 y recarga;
    /// en cliente solo refiltra.
    pub async fn search(&self, term: &str) -> Result<LoadOutcome, ApiError> {
        self.state.borrow_mut().search_term = term.to_string();
        match self.policy.search {
            SearchMode::Server => self.load(1).await,
            SearchMode::Client => {
                let mut state = self.state.borrow_mut();
                self.refilter(&mut state);
                Ok(LoadOutcome::Committed)
            }
        }
    }

    /// Filtro exacto; valor vacío lo quita
    pub async fn set_filter(&self, key: &str, value: &str) -> Result<LoadOutcome, ApiError> {
        {
            let mut state = self.state.borrow_mut();
            if value.is_empty() {
                state.filters.remove(key);
            } else {
                state.filters.insert(key.to_string(), value.to_string());
            }
        }
        self.apply_criteria().await
    }

    pub async fn clear_filters(&self) -> Result<LoadOutcome, ApiError> {
        {
            let mut state = self.state.borrow_mut();
            state.filters.clear();
            state.search_term.clear();
        }
        self.apply_criteria().await
    }

    async fn apply_criteria(&self) -> Result<LoadOutcome, ApiError> {
        let remote = self.policy.pagination == PaginationMode::Server
            || self.policy.search == SearchMode::Server;
        if remote {
            self.load(1).await
        } else {
            let mut state = self.state.borrow_mut();
            self.refilter(&mut state);
            Ok(LoadOutcome::Committed)
        }
    }

    /// Ir a `target`; misma página o fuera de rango no hace nada
    pub async fn change_page(&self, target: u32) -> Result<LoadOutcome, ApiError> {
        let (current, total) = {
            let state = self.state.borrow();
            (state.page, state.total_pages)
        };
        if !is_navigable(current, target, total) {
            return Ok(LoadOutcome::Skipped);
        }
        match self.policy.pagination {
            PaginationMode::Server => self.load(target).await,
            PaginationMode::Client => {
                self.state.borrow_mut().page = target;
                Ok(LoadOutcome::Committed)
            }
        }
    }

    /// Items de la página actual
    pub fn visible_items(&self) -> Vec<R> {
        let state = self.state.borrow();
        match self.policy.pagination {
            PaginationMode::Server => state.filtered_items.clone(),
            PaginationMode::Client => {
                let start = ((state.page.max(1) - 1) * state.page_size) as usize;
                state
                    .filtered_items
                    .iter()
                    .skip(start)
                    .take(state.page_size as usize)
                    .cloned()
                    .collect()
            }
        }
    }

    /// "Showing X to Y" + botones de página. Con búsqueda local sobre una
    /// página del servidor, el rango cuenta solo las coincidencias de la
    /// página; los botones siguen siendo las páginas del servidor.
    pub fn page_window(&self) -> PageWindow {
        let state = self.state.borrow();
        if self.searches_within_page(&state) {
            let matches = state.filtered_items.len() as u32;
            let mut window = windows(1, 1, matches, matches);
            window.page_numbers = (1..=state.total_pages.max(1)).collect();
            return window;
        }
        windows(state.page, state.total_pages, state.total_items, state.page_size)
    }

    /// El "of Z" que acompaña a `page_window`
    pub fn displayed_total(&self) -> u32 {
        let state = self.state.borrow();
        if self.searches_within_page(&state) {
            state.filtered_items.len() as u32
        } else {
            state.total_items
        }
    }

    fn searches_within_page(&self, state: &ListViewState<R>) -> bool {
        self.policy.pagination == PaginationMode::Server
            && self.policy.search == SearchMode::Client
            && !state.search_term.trim().is_empty()
    }

    pub fn dismiss_error(&self) {
        self.state.borrow_mut().error = None;
    }

    // ------------------------------------------------------------------
    // Borrado confirmado
    // ------------------------------------------------------------------

    pub fn request_delete(&self, item: R) {
        log::debug!("🗑️ [DELETE] Delete requested for {} {}", R::KIND.singular_label(), item.id());
        self.state.borrow_mut().delete.request(item);
    }

    pub fn cancel_delete(&self) {
        self.state.borrow_mut().delete.cancel();
    }

    pub fn pending_delete(&self) -> Option<R> {
        self.state.borrow().delete.pending().cloned()
    }

    /// Borrar el candidato pendiente. Sin candidato no hay llamada de red.
    /// Devuelve el item borrado.
    pub async fn confirm_delete(&self) -> Result<Option<R>, ApiError> {
        let Some(item) = self.state.borrow_mut().delete.take() else {
            return Ok(None);
        };
        self.state.borrow_mut().deleting = true;

        let result = self.api.remove::<R>(item.id()).await;
        self.state.borrow_mut().deleting = false;

        if let Err(e) = result {
            log::error!("❌ [DELETE] Delete of {} failed: {}", item.id(), e);
            self.state.borrow_mut().error = Some(e.clone());
            return Err(e);
        }

        log::info!("✅ [DELETE] Deleted {} {}", R::KIND.singular_label(), item.id());
        match self.policy.on_delete {
            DeletePolicy::LocalPatch => {
                if let Some(page) = self.patch_removed(item.id()) {
                    self.reload_after_delete(page).await;
                }
            }
            DeletePolicy::Reload => {
                let page = self.state.borrow().page;
                self.reload_after_delete(page).await;
            }
        }
        Ok(Some(item))
    }

    /// Quitar el item localmente. Devuelve la página a recargar si la página
    /// actual quedó vacía y aún hay items en el servidor.
    fn patch_removed(&self, id: &str) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let before = state.items.len();
        state.items.retain(|item| item.id() != id);
        let removed = state.items.len() != before;

        if self.policy.pagination == PaginationMode::Server && removed {
            state.total_items = state.total_items.saturating_sub(1);
            state.total_pages = total_pages_for(state.total_items, state.page_size);
        }
        let page_before = state.page;
        self.refilter(&mut state);

        let needs_refill = self.policy.pagination == PaginationMode::Server
            && state.total_items > 0
            && (state.items.is_empty() || state.page != page_before);
        needs_refill.then_some(state.page)
    }

    async fn reload_after_delete(&self, page: u32) {
        if let Err(e) = self.load(page).await {
            log::warn!("⚠️ [DELETE] Reload after delete failed: {}", e);
        }
    }
}
