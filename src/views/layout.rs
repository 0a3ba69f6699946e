// ============================================================================
// LAYOUT VIEW - Barra lateral + barra superior + contenido de la ruta
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, navigate, text_el, ElementBuilder};
use crate::models::{Coupon, Mall, Offer, Shop, User};
use crate::state::{AppState, Route, Section};
use crate::utils::AVATAR_PLACEHOLDER_IMAGE;
use crate::views::widgets::{image_or_placeholder, spinner};
use crate::views::{
    render_dashboard, render_form, render_list, render_login, render_profile,
};

/// Árbol completo para la ruta actual
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let route = state.route();
    if route == Route::Login {
        return render_login(state);
    }

    let content = ElementBuilder::new("main")?
        .class("main-content")
        .child(render_route(state, &route)?)?
        .build();
    let body = ElementBuilder::new("div")?
        .class("content-wrapper")
        .child(render_topbar(state)?)?
        .child(content)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("admin-layout")
        .child(render_sidebar(state, &route)?)?
        .child(body)?
        .build())
}

fn render_route(state: &AppState, route: &Route) -> Result<Element, JsValue> {
    match route {
        Route::Login => render_login(state),
        Route::Dashboard => render_dashboard(state),
        Route::Users => render_list::<User>(state),
        Route::Profile => render_profile(state),
        Route::List(Section::Malls) => render_list::<Mall>(state),
        Route::List(Section::Shops) => render_list::<Shop>(state),
        Route::List(Section::Coupons) => render_list::<Coupon>(state),
        Route::List(Section::Offers) => render_list::<Offer>(state),
        Route::Create(_) | Route::Edit(_, _) => match state.active_form() {
            Some(form) => render_form(state, &form),
            None => spinner("Loading..."),
        },
    }
}

fn render_sidebar(state: &AppState, route: &Route) -> Result<Element, JsValue> {
    let entries = [
        (Route::Dashboard, "📊", "Dashboard"),
        (Route::Users, "👥", "Users"),
        (Route::List(Section::Malls), "🏬", "Malls"),
        (Route::List(Section::Shops), "🛍️", "Shops"),
        (Route::List(Section::Coupons), "🎟️", "Coupons"),
        (Route::List(Section::Offers), "🏷️", "Offers"),
        (Route::Profile, "👤", "Profile"),
    ];

    let nav = ElementBuilder::new("ul")?.class("sidebar-nav").build();
    for (target, icon, label) in entries {
        let active = target.nav_key() == route.nav_key();
        let hash = target.to_hash();
        let open = state.sidebar_open.clone();
        let link = ElementBuilder::new("a")?
            .class(if active { "nav-link active" } else { "nav-link" })
            .attr("href", &hash)?
            .child(text_el("span", "nav-icon", icon)?)?
            .child(text_el("span", "nav-label", label)?)?
            .on_click(move |_| *open.borrow_mut() = false)?
            .build();
        append_child(&nav, &ElementBuilder::new("li")?.child(link)?.build())?;
    }

    let class = if *state.sidebar_open.borrow() { "sidebar open" } else { "sidebar" };
    Ok(ElementBuilder::new("aside")?
        .class(class)
        .child(text_el("div", "sidebar-brand", "🏬 Mall Admin")?)?
        .child(nav)?
        .build())
}

fn render_topbar(state: &AppState) -> Result<Element, JsValue> {
    let session = state.session.get().unwrap_or_default();

    let open = state.sidebar_open.clone();
    let toggle = ElementBuilder::new("button")?
        .class("btn sidebar-toggle")
        .attr("type", "button")?
        .attr("aria-label", "Toggle navigation")?
        .text("☰")
        .on_click(move |_| {
            let next = !*open.borrow();
            *open.borrow_mut() = next;
            crate::rerender_app();
        })?
        .build();

    let app = state.clone();
    let logout = ElementBuilder::new("button")?
        .class("btn btn-outline-danger btn-sm")
        .attr("type", "button")?
        .text("Logout")
        .on_click(move |_| {
            app.logout();
            navigate(&Route::Login.to_hash());
        })?
        .build();

    let user = ElementBuilder::new("div")?
        .class("topbar-user")
        .child(image_or_placeholder(session.avatar.as_deref(), AVATAR_PLACEHOLDER_IMAGE, &session.initials(), "topbar-avatar")?)?
        .child(text_el("span", "topbar-name", &session.name)?)?
        .child(logout)?
        .build();

    Ok(ElementBuilder::new("header")?
        .class("topbar")
        .child(toggle)?
        .child(user)?
        .build())
}
