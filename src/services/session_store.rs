// ============================================================================
// SESSION STORE - Sesión del administrador inyectada en el cliente API
// ============================================================================
// Única puerta de autenticación: un registro `adminUser` con token no vacío.
// El almacenamiento concreto (localStorage, memoria) va detrás de
// `SessionBackend`. Cada `set`/`clear` incrementa `epoch`, de modo que las
// respuestas que llegan después de un logout se pueden descartar.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};

use crate::error::ApiError;
use crate::models::Session;
use crate::utils::SESSION_STORAGE_KEY;

/// Persistencia del registro de sesión
pub trait SessionBackend {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<(), String>;
    fn remove(&self);
}

/// `localStorage["adminUser"]` (JSON)
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl SessionBackend for LocalStorageBackend {
    fn load(&self) -> Option<Session> {
        LocalStorage::get::<Session>(SESSION_STORAGE_KEY).ok()
    }

    fn save(&self, session: &Session) -> Result<(), String> {
        LocalStorage::set(SESSION_STORAGE_KEY, session).map_err(|e| e.to_string())
    }

    fn remove(&self) {
        LocalStorage::delete(SESSION_STORAGE_KEY);
    }
}

/// Registro solo en memoria: sin `localStorage` (modo privado, tests) la
/// sesión dura lo que la pestaña
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    record: Rc<RefCell<Option<Session>>>,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn with(session: Session) -> Self {
        Self {
            record: Rc::new(RefCell::new(Some(session))),
        }
    }

    pub fn stored(&self) -> Option<Session> {
        self.record.borrow().clone()
    }

    /// Como si alguien borrara `adminUser` a mano
    pub fn wipe(&self) {
        self.record.borrow_mut().take();
    }
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> Option<Session> {
        self.record.borrow().clone()
    }

    fn save(&self, session: &Session) -> Result<(), String> {
        *self.record.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn remove(&self) {
        self.record.borrow_mut().take();
    }
}

struct SessionInner {
    backend: Box<dyn SessionBackend>,
    current: RefCell<Option<Session>>,
    /// `false` si el último guardado falló: el backend no refleja `current`
    persisted: Cell<bool>,
    epoch: Cell<u64>,
}

/// Handle compartido (clonar es barato: mismo estado)
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                backend: Box::new(backend),
                current: RefCell::new(None),
                persisted: Cell::new(true),
                epoch: Cell::new(0),
            }),
        }
    }

    /// `localStorage` si existe; si no, memoria
    pub fn browser() -> Self {
        let available = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .is_some();
        if available {
            Self::new(LocalStorageBackend)
        } else {
            log::warn!("⚠️ [SESSION] localStorage unavailable, session will not survive a reload");
            Self::new(MemoryBackend::default())
        }
    }

    /// Cargar el registro persistido al arrancar. Un registro sin token se borra.
    pub fn init(&self) -> Option<Session> {
        let loaded = self.inner.backend.load();
        let session = match loaded {
            Some(session) if session.is_authenticated() => {
                log::info!("🔐 [SESSION] Restored session for {}", session.email);
                Some(session)
            }
            Some(_) => {
                log::warn!("⚠️ [SESSION] Stored session has no token, discarding");
                self.inner.backend.remove();
                None
            }
            None => None,
        };
        *self.inner.current.borrow_mut() = session.clone();
        self.inner.persisted.set(true);
        session
    }

    /// Soltar la copia en memoria sin tocar el registro persistido
    pub fn teardown(&self) {
        self.inner.current.borrow_mut().take();
    }

    pub fn get(&self) -> Option<Session> {
        self.inner
            .current
            .borrow()
            .clone()
            .filter(Session::is_authenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    pub fn set(&self, session: Session) {
        self.persist(&session);
        *self.inner.current.borrow_mut() = Some(session);
        self.bump();
    }

    pub fn clear(&self) {
        log::info!("👋 [SESSION] Clearing session");
        self.inner.backend.remove();
        self.inner.current.borrow_mut().take();
        self.inner.persisted.set(true);
        self.bump();
    }

    /// Token para una petición autenticada. Se re-lee el registro persistido:
    /// si alguien lo borró a mano, la sesión en memoria también se cae.
    /// Si el guardado falló, manda la copia en memoria.
    pub fn token(&self) -> Result<String, ApiError> {
        if !self.inner.persisted.get() {
            if let Some(session) = self.get() {
                return Ok(session.token);
            }
        }
        let persisted = self.inner.backend.load().filter(Session::is_authenticated);
        match persisted {
            Some(session) => {
                let token = session.token.clone();
                let changed = self.inner.current.borrow().as_ref() != Some(&session);
                if changed {
                    *self.inner.current.borrow_mut() = Some(session);
                }
                Ok(token)
            }
            None => {
                if self.inner.current.borrow_mut().take().is_some() {
                    log::warn!("⚠️ [SESSION] Session record disappeared from storage");
                    self.bump();
                }
                Err(ApiError::auth_missing())
            }
        }
    }

    /// Cambia con cada login/logout
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.get()
    }

    /// Reflejar en la sesión los cambios del perfil (barra superior)
    pub fn update_profile(&self, name: &str, email: &str, avatar: Option<&str>) {
        let updated = {
            let current = self.inner.current.borrow();
            current.as_ref().map(|session| Session {
                name: name.to_string(),
                email: email.to_string(),
                avatar: avatar.map(str::to_string).or_else(|| session.avatar.clone()),
                ..session.clone()
            })
        };
        if let Some(session) = updated {
            self.persist(&session);
            *self.inner.current.borrow_mut() = Some(session);
        }
    }

    fn persist(&self, session: &Session) {
        match self.inner.backend.save(session) {
            Ok(()) => self.inner.persisted.set(true),
            Err(e) => {
                log::error!("❌ [SESSION] Could not persist session, keeping it in memory: {}", e);
                self.inner.persisted.set(false);
            }
        }
    }

    fn bump(&self) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::session_for;
    use pretty_assertions::assert_eq;

    #[test]
    fn init_drops_record_without_token() {
        let backend = MemoryBackend::with(Session { name: "Ana".into(), ..Session::default() });
        let store = SessionStore::new(backend.clone());
        assert_eq!(store.init(), None);
        assert!(backend.stored().is_none());
    }

    #[test]
    fn token_requires_a_session() {
        let store = SessionStore::new(MemoryBackend::default());
        store.init();
        assert_eq!(store.token(), Err(ApiError::auth_missing()));
    }

    #[test]
    fn set_and_clear_bump_epoch() {
        let store = SessionStore::new(MemoryBackend::default());
        let start = store.epoch();
        store.set(session_for("t1"));
        assert_eq!(store.token().as_deref(), Ok("t1"));
        store.clear();
        assert_eq!(store.epoch(), start + 2);
        assert!(store.get().is_none());
    }

    #[test]
    fn manually_cleared_storage_logs_out() {
        let backend = MemoryBackend::default();
        let store = SessionStore::new(backend.clone());
        store.set(session_for("t1"));
        let epoch = store.epoch();
        backend.wipe();
        assert!(store.token().is_err());
        assert!(!store.is_authenticated());
        assert_eq!(store.epoch(), epoch + 1);
    }

    #[test]
    fn profile_update_keeps_token() {
        let backend = MemoryBackend::default();
        let store = SessionStore::new(backend.clone());
        store.set(session_for("t1"));
        store.update_profile("Ana Ruiz", "ana@mall.io", None);
        let stored = backend.stored().unwrap();
        assert_eq!(stored.name, "Ana Ruiz");
        assert_eq!(stored.token, "t1");
    }

    /// Backend cuyo guardado siempre falla (cuota llena, storage bloqueado)
    struct FullStorage {
        record: Option<Session>,
    }

    impl SessionBackend for FullStorage {
        fn load(&self) -> Option<Session> {
            self.record.clone()
        }

        fn save(&self, _session: &Session) -> Result<(), String> {
            Err("QuotaExceededError".to_string())
        }

        fn remove(&self) {}
    }

    #[test]
    fn failed_save_keeps_in_memory_session_usable() {
        let store = SessionStore::new(FullStorage { record: None });
        store.init();
        store.set(session_for("t1"));
        assert_eq!(store.token().as_deref(), Ok("t1"));
        assert!(store.is_authenticated());

        store.clear();
        assert_eq!(store.token(), Err(ApiError::auth_missing()));
    }

    #[test]
    fn failed_save_does_not_revive_older_stored_token() {
        let store = SessionStore::new(FullStorage { record: Some(session_for("old")) });
        store.init();
        store.set(session_for("new"));
        assert_eq!(store.token().as_deref(), Ok("new"));
    }

    #[test]
    fn memory_backend_round_trips_the_record() {
        let backend = MemoryBackend::default();
        let store = SessionStore::new(backend.clone());
        store.set(session_for("t1"));
        assert_eq!(backend.stored().map(|s| s.token), Some("t1".to_string()));
        store.clear();
        assert!(backend.stored().is_none());
    }

    #[test]
    fn teardown_keeps_persisted_record() {
        let backend = MemoryBackend::default();
        let store = SessionStore::new(backend.clone());
        store.set(session_for("t1"));
        store.teardown();
        assert!(store.get().is_none());
        assert!(backend.stored().is_some());
        assert!(store.init().is_some());
    }
}
