// ============================================================================
// FORM VIEWS - Alta y edición (malls, tiendas, cupones, ofertas)
// ============================================================================
// Los inputs solo mutan el payload; se re-renderiza al enviar o al cargar.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, navigate, on_submit, text_el, ElementBuilder};
use crate::models::{Coupon, CouponPayload, Editable, Mall, MallPayload, Offer, OfferPayload, Shop, ShopPayload};
use crate::state::{ActiveForm, AppState, Route, Section};
use crate::utils::SHOP_CATEGORIES;
use crate::viewmodels::FormViewModel;
use crate::views::widgets::{
    error_banner, field_group, file_input, handle_failure, image_or_placeholder, select_input,
    spawn_and_rerender, spinner, text_area, text_input,
};

pub fn render_form(state: &AppState, form: &ActiveForm) -> Result<Element, JsValue> {
    match form {
        ActiveForm::Mall(vm) => render_shell(state, vm, Section::Malls, mall_fields(vm)?),
        ActiveForm::Shop(vm) => render_shell(state, vm, Section::Shops, shop_fields(vm)?),
        ActiveForm::Coupon(vm) => render_shell(state, vm, Section::Coupons, coupon_fields(vm)?),
        ActiveForm::Offer(vm) => render_shell(state, vm, Section::Offers, offer_fields(vm)?),
    }
}

/// Handler de input que escribe en el payload
fn bind<R, F>(vm: &FormViewModel<R>, apply: F) -> impl FnMut(String) + 'static
where
    R: Editable,
    F: Fn(&mut R::Payload, String) + 'static,
{
    let vm = vm.clone();
    move |value| vm.edit(|payload| apply(payload, value))
}

fn number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn render_shell<R: Editable>(
    state: &AppState,
    vm: &FormViewModel<R>,
    section: Section,
    fields: Vec<Element>,
) -> Result<Element, JsValue> {
    let snapshot = vm.state().clone();
    let verb = if vm.mode().is_edit() { "Edit" } else { "Add" };
    let title = format!("{} {}", verb, R::KIND.singular_label());

    let page = ElementBuilder::new("div")?
        .class("page form-page")
        .child(text_el("h2", "page-title", &title)?)?
        .build();

    if snapshot.loading {
        append_child(&page, &spinner("Loading...")?)?;
        return Ok(page);
    }

    if let Some(error) = &snapshot.error {
        let vm_dismiss = vm.clone();
        append_child(&page, &error_banner(error, move |_| {
            vm_dismiss.dismiss_error();
            crate::rerender_app();
        })?)?;
    }

    let form = ElementBuilder::new("form")?
        .class("resource-form")
        .attr("novalidate", "")?
        .children(fields)?
        .build();

    // Imagen actual + selector
    let current = snapshot.original.as_ref().and_then(|r| r.image().map(str::to_string));
    if let Some(src) = current.as_deref() {
        append_child(&form, &image_or_placeholder(Some(src), "", &title, "form-preview")?)?;
    }
    let vm_image = vm.clone();
    let picker = file_input(move |upload| vm_image.set_image(upload))?;
    append_child(&form, &field_group("Image", picker, None)?)?;
    if let Some(upload) = &snapshot.image {
        append_child(&form, &text_el("small", "form-text", &format!("Selected: {}", upload.file_name))?)?;
    }

    let cancel = ElementBuilder::new("button")?
        .class("btn btn-secondary")
        .attr("type", "button")?
        .text("Cancel")
        .on_click(move |_| navigate(&Route::List(section).to_hash()))?
        .build();
    let save = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .attr("type", "submit")?
        .text(if snapshot.submitting { "Saving..." } else { "Save" })
        .flag("disabled", snapshot.submitting)?
        .build();
    append_child(&form, &ElementBuilder::new("div")?.class("form-actions").children(vec![cancel, save])?.build())?;

    let vm_submit = vm.clone();
    let app = state.clone();
    on_submit(&form, move || {
        let vm = vm_submit.clone();
        let app = app.clone();
        spawn_and_rerender(async move {
            match vm.submit().await {
                Ok(_) => navigate(&Route::List(section).to_hash()),
                Err(e) => handle_failure(&app, &e),
            }
        });
        crate::rerender_app();
    })?;

    append_child(&page, &form)?;
    Ok(page)
}

fn mall_fields(vm: &FormViewModel<Mall>) -> Result<Vec<Element>, JsValue> {
    let p = vm.state().payload.clone();
    Ok(vec![
        field_group("Name", text_input("text", &p.name, "Mall name", bind(vm, |p: &mut MallPayload, v| p.name = v))?, vm.field_error("name"))?,
        field_group("Location", text_input("text", &p.location, "Address or area", bind(vm, |p: &mut MallPayload, v| p.location = v))?, vm.field_error("location"))?,
        field_group("Rating", text_input("number", &p.rating.to_string(), "0 - 5", bind(vm, |p: &mut MallPayload, v| p.rating = number(&v)))?, vm.field_error("rating"))?,
        field_group("Opening hours", text_input("text", &p.opening_hours, "09:00 - 22:00", bind(vm, |p: &mut MallPayload, v| p.opening_hours = v))?, vm.field_error("openingHours"))?,
        field_group(
            "Facilities",
            text_input("text", &p.facilities_text(), "Parking, Food Court, WiFi", bind(vm, |p: &mut MallPayload, v| {
                p.facilities = MallPayload::parse_facilities(&v)
            }))?,
            vm.field_error("facilities"),
        )?,
        field_group("Latitude", text_input("number", &p.coordinates.lat.to_string(), "", bind(vm, |p: &mut MallPayload, v| p.coordinates.lat = number(&v)))?, None)?,
        field_group("Longitude", text_input("number", &p.coordinates.lng.to_string(), "", bind(vm, |p: &mut MallPayload, v| p.coordinates.lng = number(&v)))?, None)?,
    ])
}

fn shop_fields(vm: &FormViewModel<Shop>) -> Result<Vec<Element>, JsValue> {
    let state = vm.state().clone();
    let p = state.payload;
    let categories: Vec<(String, String)> = SHOP_CATEGORIES.iter().map(|c| (c.to_string(), c.to_string())).collect();
    Ok(vec![
        field_group("Mall", select_input(&state.options, &p.mall_id, "Select a mall", bind(vm, |p: &mut ShopPayload, v| p.mall_id = v))?, vm.field_error("mallId"))?,
        field_group("Shop name", text_input("text", &p.shop_name, "Shop name", bind(vm, |p: &mut ShopPayload, v| p.shop_name = v))?, vm.field_error("shopName"))?,
        field_group("Category", select_input(&categories, &p.category, "Select a category", bind(vm, |p: &mut ShopPayload, v| p.category = v))?, vm.field_error("category"))?,
        field_group("Opening hours", text_input("text", &p.opening_hours, "10:00 - 21:00", bind(vm, |p: &mut ShopPayload, v| p.opening_hours = v))?, vm.field_error("openingHours"))?,
        field_group("Rating", text_input("number", &p.rating.to_string(), "0 - 5", bind(vm, |p: &mut ShopPayload, v| p.rating = number(&v)))?, vm.field_error("rating"))?,
    ])
}

fn coupon_fields(vm: &FormViewModel<Coupon>) -> Result<Vec<Element>, JsValue> {
    let state = vm.state().clone();
    let p = state.payload;
    Ok(vec![
        field_group("Shop", select_input(&state.options, &p.shop_id, "Select a shop", bind(vm, |p: &mut CouponPayload, v| p.shop_id = v))?, vm.field_error("shopId"))?,
        field_group("Code", text_input("text", &p.code, "SUMMER25", bind(vm, |p: &mut CouponPayload, v| p.code = v))?, vm.field_error("code"))?,
        field_group("Discount (%)", text_input("number", &p.discount_amount.to_string(), "0 - 100", bind(vm, |p: &mut CouponPayload, v| p.discount_amount = number(&v)))?, vm.field_error("discountAmount"))?,
        field_group("Start date", text_input("date", &p.start_date, "", bind(vm, |p: &mut CouponPayload, v| p.start_date = v))?, vm.field_error("startDate"))?,
        field_group("End date", text_input("date", &p.end_date, "", bind(vm, |p: &mut CouponPayload, v| p.end_date = v))?, vm.field_error("endDate"))?,
        field_group(
            "Usage limit",
            text_input("number", &p.usage_limit.to_string(), "1", bind(vm, |p: &mut CouponPayload, v| p.usage_limit = v.trim().parse().unwrap_or(0)))?,
            vm.field_error("usageLimit"),
        )?,
    ])
}

fn offer_fields(vm: &FormViewModel<Offer>) -> Result<Vec<Element>, JsValue> {
    let state = vm.state().clone();
    let p = state.payload;
    Ok(vec![
        field_group("Shop", select_input(&state.options, &p.shop_id, "Select a shop", bind(vm, |p: &mut OfferPayload, v| p.shop_id = v))?, vm.field_error("shopId"))?,
        field_group("Title", text_input("text", &p.title, "Offer title", bind(vm, |p: &mut OfferPayload, v| p.title = v))?, vm.field_error("title"))?,
        field_group("Description", text_area(&p.description, bind(vm, |p: &mut OfferPayload, v| p.description = v))?, vm.field_error("description"))?,
        field_group(
            "Discount (%)",
            text_input("number", &p.discount_percentage.to_string(), "0 - 100", bind(vm, |p: &mut OfferPayload, v| p.discount_percentage = number(&v)))?,
            vm.field_error("discountPercentage"),
        )?,
        field_group("Start date", text_input("date", &p.start_date, "", bind(vm, |p: &mut OfferPayload, v| p.start_date = v))?, vm.field_error("startDate"))?,
        field_group("End date", text_input("date", &p.end_date, "", bind(vm, |p: &mut OfferPayload, v| p.end_date = v))?, vm.field_error("endDate"))?,
    ])
}
