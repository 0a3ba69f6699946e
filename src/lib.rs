// ============================================================================
// MALL ADMIN - PANEL DE ADMINISTRACIÓN (RUST PURO + MVVM)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI (listados, formularios, sesión)
// - Services: SOLO comunicación API y persistencia de sesión
// - State: Rutas + AppState con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

mod config;
mod error;
mod models;
mod services;
mod viewmodels;
mod state;
mod dom;
mod views;
mod utils;
mod app;

#[cfg(test)]
mod testing;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use crate::app::App;
use crate::config::CONFIG;

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() { log::Level::Debug } else { log::Level::Warn };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 [APP] Mall Admin ({}) -> {}", CONFIG.environment, CONFIG.backend_url());

    let app = App::new()?;
    app.sync_route();
    app.render()?;

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });

    // Listener global: solo se registra aquí
    crate::dom::on_window("hashchange", |_e| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow().as_ref() {
                app.sync_route();
            }
        });
        rerender_app();
    })?;

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|cell| {
        // try_borrow: un render en curso no se interrumpe
        match cell.try_borrow() {
            Ok(app) => {
                if let Some(app) = app.as_ref() {
                    if let Err(e) = app.render() {
                        log::error!("❌ [APP] Error re-renderizando: {:?}", e);
                    }
                } else {
                    log::warn!("⚠️ [APP] App no está inicializada");
                }
            }
            Err(_) => log::debug!("🔄 [APP] Render en curso; se omite"),
        }
    });
}

/// Re-render llamable desde JavaScript
#[wasm_bindgen]
pub fn rerender_app_wasm() {
    rerender_app();
}
