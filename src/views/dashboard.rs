// ============================================================================
// DASHBOARD VIEW - Tarjetas de totales + tiendas por mall
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, text_el, ElementBuilder};
use crate::models::DashboardStats;
use crate::state::AppState;
use crate::utils::format_display;
use crate::views::widgets::{error_banner, spinner};

pub fn render_dashboard(state: &AppState) -> Result<Element, JsValue> {
    let snapshot = state.dashboard.state().clone();
    let page = ElementBuilder::new("div")?
        .class("page dashboard-page")
        .child(text_el("h2", "page-title", "Dashboard")?)?
        .build();

    if let Some(error) = &snapshot.error {
        let vm = state.dashboard.clone();
        append_child(&page, &error_banner(error, move |_| {
            vm.reset();
            crate::rerender_app();
        })?)?;
    }

    match &snapshot.stats {
        Some(stats) => {
            append_child(&page, &render_stat_cards(stats)?)?;
            append_child(&page, &render_shops_per_mall(stats)?)?;
            if !stats.recent_activity.is_empty() {
                append_child(&page, &render_activity(stats)?)?;
            }
        }
        None if snapshot.loading => {
            append_child(&page, &spinner("Loading statistics...")?)?;
        }
        None => {}
    }

    Ok(page)
}

fn render_stat_cards(stats: &DashboardStats) -> Result<Element, JsValue> {
    let cards = [
        ("👥", "Users", stats.total_users),
        ("🏬", "Malls", stats.total_malls),
        ("🛍️", "Shops", stats.total_shops),
        ("🎟️", "Coupons", stats.total_coupons),
        ("🏷️", "Offers", stats.total_offers),
    ];
    let row = ElementBuilder::new("div")?.class("stat-grid").build();
    for (icon, label, value) in cards {
        let card = ElementBuilder::new("div")?
            .class("stat-card")
            .child(text_el("span", "stat-icon", icon)?)?
            .child(text_el("span", "stat-value", &value.to_string())?)?
            .child(text_el("span", "stat-label", label)?)?
            .build();
        append_child(&row, &card)?;
    }
    Ok(row)
}

/// Barras horizontales relativas al mall con más tiendas
fn render_shops_per_mall(stats: &DashboardStats) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("div")?
        .class("chart-card")
        .child(text_el("h4", "", "Shops per mall")?)?
        .build();
    if stats.malls_with_shops.is_empty() {
        append_child(&section, &text_el("p", "empty-state", "No data yet")?)?;
        return Ok(section);
    }

    let max = stats.max_shop_count().max(1) as f64;
    for mall in &stats.malls_with_shops {
        let width = (mall.shop_count as f64 / max * 100.0).round();
        let bar = ElementBuilder::new("div")?
            .class("bar-fill")
            .attr("style", &format!("width: {}%", width))?
            .build();
        let row = ElementBuilder::new("div")?
            .class("bar-row")
            .child(text_el("span", "bar-label", &mall.name)?)?
            .child(ElementBuilder::new("div")?.class("bar-track").child(bar)?.build())?
            .child(text_el("span", "bar-value", &mall.shop_count.to_string())?)?
            .build();
        append_child(&section, &row)?;
    }
    Ok(section)
}

fn render_activity(stats: &DashboardStats) -> Result<Element, JsValue> {
    let list = ElementBuilder::new("ul")?.class("activity-list").build();
    for entry in &stats.recent_activity {
        let when = entry.timestamp.as_deref().map(format_display).unwrap_or_default();
        let item = ElementBuilder::new("li")?
            .child(text_el("span", "activity-message", &entry.message)?)?
            .child(text_el("small", "activity-time", &when)?)?
            .build();
        append_child(&list, &item)?;
    }
    Ok(ElementBuilder::new("div")?
        .class("chart-card")
        .child(text_el("h4", "", "Recent activity")?)?
        .child(list)?
        .build())
}
