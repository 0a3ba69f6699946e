// ============================================================================
// PROFILE VIEW - Datos del administrador y foto
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_submit, text_el, ElementBuilder};
use crate::state::AppState;
use crate::utils::AVATAR_PLACEHOLDER_IMAGE;
use crate::views::widgets::{
    error_banner, field_group, file_input, handle_failure, image_or_placeholder, spawn_and_rerender, spinner,
    text_input,
};

pub fn render_profile(state: &AppState) -> Result<Element, JsValue> {
    let profile = state.profile.borrow().clone();
    let page = ElementBuilder::new("div")?
        .class("page profile-page")
        .child(text_el("h2", "page-title", "My profile")?)?
        .build();

    if profile.loading {
        append_child(&page, &spinner("Loading profile...")?)?;
        return Ok(page);
    }

    if let Some(error) = profile.error.as_ref().filter(|e| e.field_errors().is_none()) {
        let profile_state = state.profile.clone();
        append_child(&page, &error_banner(error, move |_| {
            profile_state.borrow_mut().error = None;
            crate::rerender_app();
        })?)?;
    }
    if let Some(notice) = &profile.notice {
        append_child(&page, &text_el("div", "alert alert-success", notice)?)?;
    }

    let avatar = profile
        .user
        .as_ref()
        .and_then(|u| u.avatar().map(str::to_string))
        .or_else(|| state.session.get().and_then(|s| s.avatar));
    let role = profile.user.as_ref().map(|u| u.role.clone()).unwrap_or_default();
    let summary = ElementBuilder::new("div")?
        .class("profile-summary")
        .child(image_or_placeholder(avatar.as_deref(), AVATAR_PLACEHOLDER_IMAGE, "Avatar", "profile-avatar")?)?
        .child(text_el("h4", "", &profile.payload.name)?)?
        .child(text_el("span", "badge", &role)?)?
        .build();
    append_child(&page, &summary)?;

    let field_error = |field: &str| {
        profile
            .error
            .as_ref()
            .and_then(|e| e.field_errors())
            .and_then(|fields| fields.get(field).cloned())
    };

    let form = ElementBuilder::new("form")?.class("profile-form").attr("novalidate", "")?.build();
    let s = state.profile.clone();
    append_child(&form, &field_group(
        "Name",
        text_input("text", &profile.payload.name, "Full name", move |v| s.borrow_mut().payload.name = v)?,
        field_error("name"),
    )?)?;
    let s = state.profile.clone();
    append_child(&form, &field_group(
        "Email",
        text_input("email", &profile.payload.email, "Email", move |v| s.borrow_mut().payload.email = v)?,
        field_error("email"),
    )?)?;
    let s = state.profile.clone();
    append_child(&form, &field_group(
        "Mobile number",
        text_input("tel", &profile.payload.mobile_number, "Optional", move |v| s.borrow_mut().payload.mobile_number = v)?,
        field_error("mobileNumber"),
    )?)?;
    let s = state.profile.clone();
    append_child(&form, &field_group(
        "Profile image",
        file_input(move |upload| s.borrow_mut().image = upload)?,
        None,
    )?)?;

    let save = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .attr("type", "submit")?
        .text(if profile.saving { "Saving..." } else { "Save changes" })
        .flag("disabled", profile.saving)?
        .build();
    append_child(&form, &save)?;

    let app = state.clone();
    on_submit(&form, move || {
        let (payload, image) = {
            let mut profile = app.profile.borrow_mut();
            if profile.saving {
                return;
            }
            profile.saving = true;
            profile.error = None;
            profile.notice = None;
            (profile.payload.clone(), profile.image.clone())
        };
        let app = app.clone();
        spawn_and_rerender(async move {
            let result = app.auth.update_profile(&payload, image.as_ref()).await;
            if let Err(e) = &result {
                handle_failure(&app, e);
            }
            let mut profile = app.profile.borrow_mut();
            profile.saving = false;
            match result {
                Ok(user) => {
                    profile.user = Some(user);
                    profile.image = None;
                    profile.notice = Some("Profile updated successfully".to_string());
                }
                Err(e) => profile.error = Some(e),
            }
        });
        crate::rerender_app();
    })?;

    append_child(&page, &form)?;
    Ok(page)
}
