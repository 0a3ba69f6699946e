// ============================================================================
// LIST VIEW - Buscador, filtros, tarjetas, paginación y borrado
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};
use wasm_bindgen::JsCast;

use crate::dom::{append_child, navigate, on_input, text_el, ElementBuilder};
use crate::state::{AppState, Route};
use crate::viewmodels::ListPhase;
use crate::views::cards::{render_card, ListDisplay};
use crate::views::widgets::{
    delete_modal, error_banner, handle_failure, pagination_bar, select_input, spawn_and_rerender, spinner,
};

/// Id del buscador; el re-render le devuelve el foco
pub const SEARCH_INPUT_ID: &str = "list-search";

pub fn render_list<R: ListDisplay>(state: &AppState) -> Result<Element, JsValue> {
    let controller = R::controller(state);
    let snapshot = controller.state().clone();
    let plural = R::KIND.plural_label();

    let page = ElementBuilder::new("div")?.class("page list-page").build();

    // Cabecera
    let mut header = ElementBuilder::new("div")?
        .class("page-header")
        .child(text_el("h2", "page-title", plural)?)?;
    if let Some(section) = R::section() {
        let add = ElementBuilder::new("button")?
            .class("btn btn-primary")
            .attr("type", "button")?
            .text(&format!("+ Add {}", R::KIND.singular_label()))
            .on_click(move |_| navigate(&Route::Create(section).to_hash()))?
            .build();
        header = header.child(add)?;
    }
    append_child(&page, &header.build())?;

    append_child(&page, &render_toolbar::<R>(state, &snapshot.search_term, &snapshot.filters)?)?;

    if let Some(error) = &snapshot.error {
        let ctrl = controller.clone();
        append_child(&page, &error_banner(error, move |_| {
            ctrl.dismiss_error();
            crate::rerender_app();
        })?)?;
    }

    let items = controller.visible_items();
    if snapshot.phase == ListPhase::Loading && items.is_empty() {
        append_child(&page, &spinner(&format!("Loading {}...", plural.to_lowercase()))?)?;
    } else if items.is_empty() {
        append_child(&page, &text_el("p", "empty-state", &format!("No {} found", plural.to_lowercase()))?)?;
    } else {
        let grid = ElementBuilder::new("div")?.class("card-grid").build();
        for item in &items {
            append_child(&grid, &render_card(item, render_actions(state, item)?)?)?;
        }
        append_child(&page, &grid)?;

        let ctrl = controller.clone();
        let app = state.clone();
        append_child(&page, &pagination_bar(
            &controller.page_window(),
            snapshot.page,
            controller.displayed_total(),
            move |target| {
                let ctrl = ctrl.clone();
                let app = app.clone();
                spawn_and_rerender(async move {
                    if let Err(e) = ctrl.change_page(target).await {
                        handle_failure(&app, &e);
                    }
                });
            },
        )?)?;
    }

    if let Some(pending) = snapshot.delete.pending() {
        let confirm_ctrl = controller.clone();
        let cancel_ctrl = controller.clone();
        let app = state.clone();
        append_child(&page, &delete_modal(
            &format!("Delete {}", R::KIND.singular_label()),
            pending.label(),
            pending.image(),
            snapshot.deleting,
            move |_| {
                let ctrl = confirm_ctrl.clone();
                let app = app.clone();
                spawn_and_rerender(async move {
                    if let Err(e) = ctrl.confirm_delete().await {
                        handle_failure(&app, &e);
                    }
                });
                crate::rerender_app();
            },
            move |_| {
                cancel_ctrl.cancel_delete();
                crate::rerender_app();
            },
        )?)?;
    }

    Ok(page)
}

fn render_toolbar<R: ListDisplay>(
    state: &AppState,
    search_term: &str,
    filters: &std::collections::BTreeMap<String, String>,
) -> Result<Element, JsValue> {
    let toolbar = ElementBuilder::new("div")?.class("list-toolbar").build();

    let input = ElementBuilder::new("input")?
        .class("form-control search-input")
        .attr("id", SEARCH_INPUT_ID)?
        .attr("type", "search")?
        .attr("placeholder", R::search_placeholder())?
        .build();
    if let Some(el) = input.dyn_ref::<HtmlInputElement>() {
        el.set_value(search_term);
    }
    let app = state.clone();
    on_input(&input, move |value| {
        let ctrl = R::controller(&app);
        let failure_state = app.clone();
        app.search.borrow().call(value, move |term| {
            spawn_and_rerender(async move {
                if let Err(e) = ctrl.search(&term).await {
                    handle_failure(&failure_state, &e);
                }
            });
        });
    })?;
    append_child(&toolbar, &input)?;

    for filter in R::filters() {
        let app = state.clone();
        let key = filter.key;
        let selected = filters.get(key).map(String::as_str).unwrap_or("");
        let select = select_input(&filter.options, selected, filter.empty_label, move |value| {
            let ctrl = R::controller(&app);
            let app = app.clone();
            spawn_and_rerender(async move {
                if let Err(e) = ctrl.set_filter(key, &value).await {
                    handle_failure(&app, &e);
                }
            });
        })?;
        append_child(&toolbar, &select)?;
    }

    if !filters.is_empty() || !search_term.is_empty() {
        let app = state.clone();
        let clear = ElementBuilder::new("button")?
            .class("btn btn-outline-secondary")
            .attr("type", "button")?
            .text("Clear filters")
            .on_click(move |_| {
                app.remount_search("");
                let ctrl = R::controller(&app);
                let app = app.clone();
                spawn_and_rerender(async move {
                    if let Err(e) = ctrl.clear_filters().await {
                        handle_failure(&app, &e);
                    }
                });
            })?
            .build();
        append_child(&toolbar, &clear)?;
    }

    Ok(toolbar)
}

fn render_actions<R: ListDisplay>(state: &AppState, item: &R) -> Result<Element, JsValue> {
    let actions = ElementBuilder::new("div")?.class("card-actions").build();

    if let Some(section) = R::section() {
        let route = Route::Edit(section, item.id().to_string());
        let edit = ElementBuilder::new("button")?
            .class("btn btn-sm btn-outline-primary")
            .attr("type", "button")?
            .text("Edit")
            .on_click(move |_| navigate(&route.to_hash()))?
            .build();
        append_child(&actions, &edit)?;
    }

    let ctrl = R::controller(state);
    let candidate = item.clone();
    let delete = ElementBuilder::new("button")?
        .class("btn btn-sm btn-outline-danger")
        .attr("type", "button")?
        .text("Delete")
        .on_click(move |_| {
            ctrl.request_delete(candidate.clone());
            crate::rerender_app();
        })?
        .build();
    append_child(&actions, &delete)?;

    Ok(actions)
}
