// ============================================================================
// LOGIN VIEW
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, navigate, on_submit, text_el, ElementBuilder};
use crate::state::{AppState, Route};
use crate::views::widgets::{field_group, spawn_and_rerender, text_input};

/// Renderizar vista de login
pub fn render_login(state: &AppState) -> Result<Element, JsValue> {
    let login = state.login.borrow().clone();
    let field_error = |field: &str| {
        login
            .error
            .as_ref()
            .and_then(|e| e.field_errors())
            .and_then(|fields| fields.get(field).cloned())
    };

    let header = ElementBuilder::new("div")?
        .class("login-header")
        .child(text_el("div", "logo-icon", "🏬")?)?
        .child(text_el("h1", "", "Mall Admin")?)?
        .child(text_el("p", "", "Sign in to manage malls, shops and promotions")?)?
        .build();

    let form = ElementBuilder::new("form")?
        .class("login-form")
        .attr("novalidate", "")?
        .build();

    let email_state = state.login.clone();
    append_child(&form, &field_group(
        "Email",
        text_input("email", &login.email, "admin@example.com", move |v| email_state.borrow_mut().email = v)?,
        field_error("email"),
    )?)?;
    let password_state = state.login.clone();
    append_child(&form, &field_group(
        "Password",
        text_input("password", &login.password, "Password", move |v| password_state.borrow_mut().password = v)?,
        field_error("password"),
    )?)?;

    // Errores que no son de un campo concreto
    if let Some(error) = login.error.as_ref().filter(|e| e.field_errors().is_none()) {
        append_child(&form, &text_el("div", "alert alert-danger", &error.user_message())?)?;
    }

    let submit = ElementBuilder::new("button")?
        .class("btn btn-primary w-100")
        .attr("type", "submit")?
        .text(if login.submitting { "Signing in..." } else { "Sign in" })
        .flag("disabled", login.submitting)?
        .build();
    append_child(&form, &submit)?;

    let app = state.clone();
    on_submit(&form, move || {
        let (email, password) = {
            let mut login = app.login.borrow_mut();
            if login.submitting {
                return;
            }
            login.submitting = true;
            login.error = None;
            (login.email.clone(), login.password.clone())
        };
        let app = app.clone();
        spawn_and_rerender(async move {
            let result = app.auth.login(&email, &password).await;
            let mut login = app.login.borrow_mut();
            login.submitting = false;
            match result {
                Ok(_) => {
                    login.password.clear();
                    navigate(&Route::Dashboard.to_hash());
                }
                Err(e) => {
                    log::error!("❌ [SESSION] Login fallido: {}", e);
                    login.error = Some(e);
                }
            }
        });
        crate::rerender_app();
    })?;

    Ok(ElementBuilder::new("div")?
        .class("login-screen")
        .child(ElementBuilder::new("div")?.class("login-container").child(header)?.child(form)?.build())?
        .build())
}
