// ============================================================================
// CARDS - Cómo se muestra cada recurso en su listado
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{text_el, ElementBuilder};
use crate::models::{Coupon, Mall, Offer, Resource, Shop, User};
use crate::state::{AppState, Section};
use crate::utils::{
    format_display, AVATAR_PLACEHOLDER_IMAGE, ITEM_PLACEHOLDER_IMAGE, MALL_PLACEHOLDER_IMAGE,
    USER_ROLES, USER_STATUSES,
};
use crate::viewmodels::ResourceListController;
use crate::views::widgets::image_or_placeholder;

/// Selector de filtro exacto (`role`, `status`)
pub struct FilterSpec {
    pub key: &'static str,
    pub empty_label: &'static str,
    pub options: Vec<(String, String)>,
}

pub trait ListDisplay: Resource {
    fn controller(state: &AppState) -> ResourceListController<Self>;

    /// `None` = sin alta/edición desde el panel
    fn section() -> Option<Section>;

    fn search_placeholder() -> &'static str;

    fn filters() -> Vec<FilterSpec> {
        Vec::new()
    }

    fn placeholder_image() -> &'static str {
        ITEM_PLACEHOLDER_IMAGE
    }

    /// Cuerpo de la tarjeta (sin imagen ni acciones)
    fn card_body(&self) -> Result<Vec<Element>, JsValue>;
}

fn detail(label: &str, value: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("p")?
        .class("card-detail")
        .child(text_el("strong", "", &format!("{}: ", label))?)?
        .child(text_el("span", "", value)?)?
        .build())
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

fn period(start: Option<&str>, end: Option<&str>) -> String {
    format!(
        "{} - {}",
        start.map(format_display).unwrap_or_else(|| "-".to_string()),
        end.map(format_display).unwrap_or_else(|| "-".to_string())
    )
}

/// Tarjeta completa: imagen + cuerpo + acciones
pub fn render_card<R: ListDisplay>(item: &R, actions: Element) -> Result<Element, JsValue> {
    let image = image_or_placeholder(item.image(), R::placeholder_image(), item.label(), "card-img-top")?;
    let body = ElementBuilder::new("div")?
        .class("card-body")
        .child(text_el("h5", "card-title", item.label())?)?
        .children(item.card_body()?)?
        .child(actions)?
        .build();
    Ok(ElementBuilder::new("div")?
        .class("card resource-card")
        .child(image)?
        .child(body)?
        .build())
}

impl ListDisplay for Mall {
    fn controller(state: &AppState) -> ResourceListController<Self> {
        state.malls.clone()
    }

    fn section() -> Option<Section> {
        Some(Section::Malls)
    }

    fn search_placeholder() -> &'static str {
        "Search malls by name or location..."
    }

    fn placeholder_image() -> &'static str {
        MALL_PLACEHOLDER_IMAGE
    }

    fn card_body(&self) -> Result<Vec<Element>, JsValue> {
        let mut parts = vec![
            detail("Location", &or_dash(self.location.as_deref()))?,
            detail("Hours", &or_dash(self.opening_hours.as_deref()))?,
            detail("Rating", &self.rating.map(|r| format!("⭐ {:.1}", r)).unwrap_or_else(|| "-".into()))?,
        ];
        if !self.facilities.is_empty() {
            parts.push(detail("Facilities", &self.facilities.join(", "))?);
        }
        if let Some(coordinates) = &self.coordinates {
            parts.push(
                ElementBuilder::new("a")?
                    .class("card-link")
                    .attr("href", &coordinates.google_maps_url())?
                    .attr("target", "_blank")?
                    .attr("rel", "noopener")?
                    .text("View on map")
                    .build(),
            );
        }
        Ok(parts)
    }
}

impl ListDisplay for Shop {
    fn controller(state: &AppState) -> ResourceListController<Self> {
        state.shops.clone()
    }

    fn section() -> Option<Section> {
        Some(Section::Shops)
    }

    fn search_placeholder() -> &'static str {
        "Search shops by name or mall..."
    }

    fn card_body(&self) -> Result<Vec<Element>, JsValue> {
        Ok(vec![
            detail("Mall", &or_dash(self.mall_name()))?,
            detail("Category", &or_dash(self.category.as_deref()))?,
            detail("Hours", &or_dash(self.opening_hours.as_deref()))?,
            detail("Rating", &self.rating.map(|r| format!("⭐ {:.1}", r)).unwrap_or_else(|| "-".into()))?,
        ])
    }
}

impl ListDisplay for Coupon {
    fn controller(state: &AppState) -> ResourceListController<Self> {
        state.coupons.clone()
    }

    fn section() -> Option<Section> {
        Some(Section::Coupons)
    }

    fn search_placeholder() -> &'static str {
        "Search coupons by code, description or shop..."
    }

    fn card_body(&self) -> Result<Vec<Element>, JsValue> {
        Ok(vec![
            detail("Shop", &or_dash(self.shop_name()))?,
            detail("Description", &or_dash(self.description.as_deref()))?,
            detail("Discount", &self.discount_amount.map(|d| format!("{}%", d)).unwrap_or_else(|| "-".into()))?,
            detail("Valid", &period(self.start_date.as_deref(), self.end_date.as_deref()))?,
            detail("Usage limit", &self.usage_limit.map(|u| u.to_string()).unwrap_or_else(|| "-".into()))?,
        ])
    }
}

impl ListDisplay for Offer {
    fn controller(state: &AppState) -> ResourceListController<Self> {
        state.offers.clone()
    }

    fn section() -> Option<Section> {
        Some(Section::Offers)
    }

    fn search_placeholder() -> &'static str {
        "Search offers by title, shop or mall..."
    }

    fn card_body(&self) -> Result<Vec<Element>, JsValue> {
        Ok(vec![
            detail("Shop", &or_dash(self.shop_name()))?,
            detail("Mall", &or_dash(self.mall_name()))?,
            detail("Discount", &self.discount_percentage.map(|d| format!("{}%", d)).unwrap_or_else(|| "-".into()))?,
            detail("Valid", &period(self.start_date.as_deref(), self.end_date.as_deref()))?,
        ])
    }
}

impl ListDisplay for User {
    fn controller(state: &AppState) -> ResourceListController<Self> {
        state.users.clone()
    }

    fn section() -> Option<Section> {
        None
    }

    fn search_placeholder() -> &'static str {
        "Search users by name, email or mobile..."
    }

    fn filters() -> Vec<FilterSpec> {
        vec![
            FilterSpec { key: "role", empty_label: "All roles", options: options(&USER_ROLES) },
            FilterSpec { key: "status", empty_label: "All statuses", options: options(&USER_STATUSES) },
        ]
    }

    fn placeholder_image() -> &'static str {
        AVATAR_PLACEHOLDER_IMAGE
    }

    fn card_body(&self) -> Result<Vec<Element>, JsValue> {
        Ok(vec![
            detail("Email", &or_dash(Some(self.email.as_str())))?,
            detail("Mobile", &or_dash(self.mobile_number.as_deref()))?,
            detail("Role", &or_dash(Some(self.role.as_str())))?,
            detail("Status", &or_dash(self.status.as_deref()))?,
            detail("Joined", &self.created_at.as_deref().map(format_display).unwrap_or_else(|| "-".into()))?,
        ])
    }
}

fn options(values: &[&str]) -> Vec<(String, String)> {
    values.iter().map(|v| (v.to_string(), capitalize(v))).collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
