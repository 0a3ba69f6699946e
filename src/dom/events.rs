// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// Listeners en elementos del DOM: closure.forget() es seguro porque cada
// render reemplaza el árbol y el navegador libera los listeners.
// Listeners globales (window): registrar UNA VEZ en el arranque.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent};

fn listen<F>(element: &Element, event_type: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Helper para crear click handler simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Input handler: recibe el valor actual del campo
pub fn on_input<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    listen(element, "input", move |e: Event| handler(crate::dom::event_value(&e)))
}

/// Change handler (selects, file inputs, fechas)
pub fn on_change<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    listen(element, "change", handler)
}

/// Submit de formulario sin recargar la página
pub fn on_submit<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    listen(element, "submit", move |e: Event| {
        e.prevent_default();
        handler();
    })
}

/// Listener global en window (solo en el arranque)
pub fn on_window<F>(event_type: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let win = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    win.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
