// ============================================================================
// WIDGETS - Piezas compartidas por listados y formularios
// ============================================================================

use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlInputElement};

use crate::dom::{append_child, navigate, on_change, on_input, text_el, ElementBuilder};
use crate::error::ApiError;
use crate::services::ImageUpload;
use crate::state::{AppState, Route};
use crate::utils::PageWindow;

/// Ejecutar una acción async y re-renderizar al terminar
pub fn spawn_and_rerender<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    spawn_local(async move {
        future.await;
        crate::rerender_app();
    });
}

pub fn spinner(message: &str) -> Result<Element, JsValue> {
    ElementBuilder::new("div")?
        .class("loading-state")
        .child(text_el("span", "spinner", "")?)?
        .child(text_el("p", "loading-text", message)?)
        .map(|b| b.build())
}

/// `<img>` con placeholder cuando no hay imagen
pub fn image_or_placeholder(src: Option<&str>, placeholder: &str, alt: &str, class: &str) -> Result<Element, JsValue> {
    let src = src.filter(|s| !s.trim().is_empty()).unwrap_or(placeholder);
    Ok(ElementBuilder::new("img")?
        .class(class)
        .attr("src", src)?
        .attr("alt", alt)?
        .build())
}

/// Banner de error con botón para cerrarlo
pub fn error_banner<F>(error: &ApiError, on_dismiss: F) -> Result<Element, JsValue>
where
    F: FnMut(web_sys::MouseEvent) + 'static,
{
    let close = ElementBuilder::new("button")?
        .class("btn-close")
        .attr("type", "button")?
        .attr("aria-label", "Close")?
        .on_click(on_dismiss)?
        .build();
    Ok(ElementBuilder::new("div")?
        .class("alert alert-danger")
        .attr("role", "alert")?
        .child(text_el("span", "", &error.user_message())?)?
        .child(close)?
        .build())
}

/// Label + control + mensaje de error en línea
pub fn field_group(label: &str, control: Element, error: Option<String>) -> Result<Element, JsValue> {
    let mut group = ElementBuilder::new("div")?
        .class("form-group")
        .child(text_el("label", "form-label", label)?)?;
    if error.is_some() {
        control.class_list().add_1("is-invalid")?;
    }
    group = group.child(control)?;
    if let Some(message) = error {
        group = group.child(text_el("div", "invalid-feedback", &message)?)?;
    }
    Ok(group.build())
}

pub fn text_input<F>(input_type: &str, value: &str, placeholder: &str, handler: F) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let input = ElementBuilder::new("input")?
        .class("form-control")
        .attr("type", input_type)?
        .attr("placeholder", placeholder)?
        .build();
    if let Some(el) = input.dyn_ref::<HtmlInputElement>() {
        el.set_value(value);
    }
    on_input(&input, handler)?;
    Ok(input)
}

pub fn text_area<F>(value: &str, handler: F) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let area = ElementBuilder::new("textarea")?
        .class("form-control")
        .attr("rows", "3")?
        .text(value)
        .build();
    on_input(&area, handler)?;
    Ok(area)
}

/// `<select>` con opción vacía inicial
pub fn select_input<F>(
    options: &[(String, String)],
    selected: &str,
    empty_label: &str,
    mut handler: F,
) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let select = ElementBuilder::new("select")?.class("form-select").build();
    let empty = ElementBuilder::new("option")?
        .attr("value", "")?
        .text(empty_label)
        .flag("selected", selected.is_empty())?
        .build();
    append_child(&select, &empty)?;
    for (value, label) in options {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .text(label)
            .flag("selected", value == selected)?
            .build();
        append_child(&select, &option)?;
    }
    on_change(&select, move |e| handler(crate::dom::event_value(&e)))?;
    Ok(select)
}

/// Input de imagen; lee el archivo a memoria antes de entregarlo
pub fn file_input<F>(handler: F) -> Result<Element, JsValue>
where
    F: Fn(Option<ImageUpload>) + 'static,
{
    let input = ElementBuilder::new("input")?
        .class("form-control")
        .attr("type", "file")?
        .attr("accept", "image/*")?
        .build();
    let handler = Rc::new(handler);
    let target = input.clone();
    on_change(&input, move |_| {
        let file = target
            .dyn_ref::<HtmlInputElement>()
            .and_then(|el| el.files())
            .and_then(|files| files.get(0));
        let handler = handler.clone();
        spawn_local(async move {
            let upload = match file {
                Some(file) => read_upload(file).await,
                None => None,
            };
            handler(upload);
            crate::rerender_app();
        });
    })?;
    Ok(input)
}

async fn read_upload(file: web_sys::File) -> Option<ImageUpload> {
    match JsFuture::from(file.array_buffer()).await {
        Ok(buffer) => Some(ImageUpload {
            file_name: file.name(),
            content_type: file.type_(),
            bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        }),
        Err(e) => {
            log::error!("❌ [FORM] No se pudo leer la imagen: {:?}", e);
            None
        }
    }
}

/// Pie "Showing X to Y of Z entries" + botones
pub fn pagination_bar<F>(window: &PageWindow, current: u32, total_items: u32, on_page: F) -> Result<Element, JsValue>
where
    F: Fn(u32) + 'static,
{
    let on_page = Rc::new(on_page);
    let total_pages = window.page_numbers.len() as u32;
    let summary = format!(
        "Showing {} to {} of {} entries",
        window.start_item, window.end_item, total_items
    );

    let nav = ElementBuilder::new("ul")?.class("pagination").build();
    let push = |label: String, target: u32, disabled: bool, active: bool| -> Result<(), JsValue> {
        let mut class = String::from("page-item");
        if disabled {
            class.push_str(" disabled");
        }
        if active {
            class.push_str(" active");
        }
        let handler = on_page.clone();
        let button = ElementBuilder::new("button")?
            .class("page-link")
            .attr("type", "button")?
            .text(&label)
            .flag("disabled", disabled)?
            .on_click(move |_| {
                if !disabled && !active {
                    handler(target);
                }
            })?
            .build();
        let item = ElementBuilder::new("li")?.class(&class).child(button)?.build();
        append_child(&nav, &item)?;
        Ok(())
    };

    push("Previous".to_string(), current.saturating_sub(1), current <= 1, false)?;
    for page in &window.page_numbers {
        push(page.to_string(), *page, false, *page == current)?;
    }
    push("Next".to_string(), current + 1, current >= total_pages, false)?;

    Ok(ElementBuilder::new("div")?
        .class("pagination-bar")
        .child(text_el("span", "pagination-summary", &summary)?)?
        .child(nav)?
        .build())
}

/// Modal de confirmación de borrado
pub fn delete_modal<C, X>(
    title: &str,
    label: &str,
    image: Option<&str>,
    deleting: bool,
    on_confirm: C,
    on_cancel: X,
) -> Result<Element, JsValue>
where
    C: FnMut(web_sys::MouseEvent) + 'static,
    X: FnMut(web_sys::MouseEvent) + 'static,
{
    let body = ElementBuilder::new("div")?
        .class("modal-body")
        .child(image_or_placeholder(
            image,
            crate::utils::MALL_PLACEHOLDER_IMAGE,
            label,
            "modal-image",
        )?)?
        .child(text_el(
            "p",
            "",
            &format!("Are you sure you want to delete \"{}\"? This action cannot be undone.", label),
        )?)?
        .build();

    let cancel = ElementBuilder::new("button")?
        .class("btn btn-secondary")
        .attr("type", "button")?
        .text("Cancel")
        .flag("disabled", deleting)?
        .on_click(on_cancel)?
        .build();
    let confirm = ElementBuilder::new("button")?
        .class("btn btn-danger")
        .attr("type", "button")?
        .text(if deleting { "Deleting..." } else { "Delete" })
        .flag("disabled", deleting)?
        .on_click(on_confirm)?
        .build();

    let dialog = ElementBuilder::new("div")?
        .class("modal-dialog")
        .child(text_el("h5", "modal-title", title)?)?
        .child(body)?
        .child(ElementBuilder::new("div")?.class("modal-footer").children(vec![cancel, confirm])?.build())?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("modal-backdrop show")
        .attr("role", "dialog")?
        .child(dialog)?
        .build())
}

/// Error de una acción: si la sesión ya no vale, volver a login
pub fn handle_failure(state: &AppState, error: &ApiError) {
    if error.requires_login() {
        log::warn!("🔒 [SESSION] {}; redirigiendo a login", error);
        state.logout();
        navigate(&Route::Login.to_hash());
    }
}
