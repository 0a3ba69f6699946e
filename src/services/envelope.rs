// ============================================================================
// ENVELOPE - Normalización de las respuestas del backend
// ============================================================================
// Cada endpoint envuelve sus datos de forma distinta (`malls`, `items`,
// `data`, array suelto, detalle bajo `data` o `user`...). Aquí se reduce
// todo a `Page<R>` o a un registro; los viewmodels nunca ven el sobre.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::{DashboardStats, Resource, ResourceKind};
use crate::utils::total_pages_for;

/// Página normalizada de un listado
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub total_items: u32,
    pub total_pages: u32,
}

/// `success: false` en un 2xx es un fallo del servidor
pub fn ensure_success(status: u16, body: &Value) -> Result<(), ApiError> {
    if body.get("success") == Some(&Value::Bool(false)) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("The server reported a failure")
            .to_string();
        return Err(ApiError::Server { status, message });
    }
    Ok(())
}

/// Normalizar un listado. `limit` es el tamaño de página pedido al servidor
/// (`None` si se pidió la colección completa).
pub fn list_page<R: Resource>(body: Value, limit: Option<u32>) -> Result<Page<R>, ApiError> {
    let kind = R::KIND;
    let (raw_items, meta) = split_list(body, kind)?;
    let items: Vec<R> = serde_json::from_value(Value::Array(raw_items)).map_err(|e| {
        log::error!("❌ [API] Unexpected {} item shape: {}", kind.singular_label(), e);
        ApiError::Decode(e.to_string())
    })?;

    let total_items = meta
        .iter()
        .find_map(|m| find_u64(m, &[kind.total_key(), "totalItems", "total", "count"]))
        .map(clamp_u32)
        .unwrap_or_else(|| clamp_u32(items.len() as u64));

    let total_pages = meta
        .iter()
        .find_map(|m| find_u64(m, &["totalPages"]))
        .map(|pages| clamp_u32(pages).max(1))
        .unwrap_or_else(|| match limit {
            Some(limit) => total_pages_for(total_items, limit),
            None => 1,
        });

    Ok(Page {
        items,
        total_items,
        total_pages,
    })
}

/// Separa el array de items de los objetos donde pueden estar los totales
fn split_list(body: Value, kind: ResourceKind) -> Result<(Vec<Value>, Vec<Map<String, Value>>), ApiError> {
    match body {
        Value::Array(items) => Ok((items, Vec::new())),
        Value::Object(mut root) => {
            for key in [kind.collection_key(), "items"] {
                if let Some(Value::Array(items)) = root.remove(key) {
                    return Ok((items, vec![root]));
                }
            }
            match root.remove("data") {
                Some(Value::Array(items)) => Ok((items, vec![root])),
                Some(Value::Object(data)) => {
                    let (items, mut meta) = split_list(Value::Object(data), kind)?;
                    meta.push(root);
                    Ok((items, meta))
                }
                _ => Err(ApiError::Decode(format!(
                    "No {} collection in response",
                    kind.collection_key()
                ))),
            }
        }
        other => Err(ApiError::Decode(format!("Unexpected list body: {}", other))),
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn find_u64(map: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match map.get(*key) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Normalizar un detalle: registro suelto o envuelto bajo la clave singular,
/// `data` o `user`
pub fn detail<R: DeserializeOwned>(body: Value, kind: ResourceKind) -> Result<R, ApiError> {
    let record = unwrap_record(body, kind);
    serde_json::from_value(record).map_err(|e| {
        log::error!("❌ [API] Unexpected {} detail shape: {}", kind.singular_label(), e);
        ApiError::Decode(e.to_string())
    })
}

/// Respuesta de alta/edición. Si el servidor solo confirma (`success`,
/// `message`) sin devolver el registro, se reconstruye con lo enviado y el id
/// que aparezca en la respuesta (o el ya conocido al editar).
pub fn saved<R: DeserializeOwned, P: Serialize>(
    body: Value,
    kind: ResourceKind,
    payload: &P,
    known_id: Option<&str>,
) -> Result<R, ApiError> {
    let record = unwrap_record(body, kind);
    if !is_acknowledgement(&record) {
        return detail(record, kind);
    }
    let id = known_id
        .map(str::to_string)
        .or_else(|| record_id(&record))
        .unwrap_or_default();
    log::warn!(
        "⚠️ [API] {} saved but not echoed back, using submitted values (id '{}')",
        kind.singular_label(),
        id
    );
    let mut fallback = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Value::Object(fields) = &mut fallback {
        fields.insert("_id".to_string(), Value::String(id));
    }
    serde_json::from_value(fallback).map_err(|e| {
        log::error!("❌ [API] Unexpected {} save response: {}", kind.singular_label(), e);
        ApiError::Decode(e.to_string())
    })
}

/// Solo claves de sobre o de id: el servidor no devolvió el documento
fn is_acknowledgement(record: &Value) -> bool {
    match record {
        Value::Object(fields) => fields
            .keys()
            .all(|key| matches!(key.as_str(), "success" | "message" | "_id" | "id")),
        _ => true,
    }
}

fn record_id(record: &Value) -> Option<String> {
    ["_id", "id"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn unwrap_record(body: Value, kind: ResourceKind) -> Value {
    let mut root = match body {
        Value::Object(root) => root,
        other => return other,
    };
    if root.contains_key("_id") || root.contains_key("id") {
        return Value::Object(root);
    }
    for key in [kind.singular_key(), "data", "user"] {
        if let Some(inner @ Value::Object(_)) = root.remove(key) {
            return unwrap_record(inner, kind);
        }
    }
    Value::Object(root)
}

/// `{ success, data: {...totales, mallsWithShops}, recentActivity? }`
pub fn dashboard(body: Value) -> Result<DashboardStats, ApiError> {
    let recent = body
        .get("recentActivity")
        .or_else(|| body.get("data").and_then(|d| d.get("recentActivity")))
        .cloned();
    let data = match body {
        Value::Object(mut root) => root.remove("data").unwrap_or(Value::Object(root)),
        other => other,
    };
    let mut stats: DashboardStats =
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(recent) = recent {
        stats.recent_activity = serde_json::from_value(recent).unwrap_or_default();
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coupon, Mall, Offer, Shop, User};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn named_collection_with_resource_total() {
        let body = json!({
            "success": true,
            "shops": [{"_id": "s1", "shopName": "Zara"}, {"_id": "s2", "shopName": "Gap"}],
            "totalShops": 17,
            "totalPages": 3
        });
        let page: Page<Shop> = list_page(body, Some(8)).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 17);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn generic_items_envelope() {
        let body = json!({
            "success": true,
            "items": [{"_id": "a", "name": "A"}, {"_id": "b", "name": "B"}],
            "totalItems": 2,
            "totalPages": 1
        });
        let page: Page<Mall> = list_page(body, None).unwrap();
        assert_eq!(page.items.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn top_level_array_counts_items() {
        let body = json!([{"_id": "m1", "name": "Plaza"}]);
        let page: Page<Mall> = list_page(body, None).unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn nested_data_object_and_derived_pages() {
        let body = json!({
            "success": true,
            "data": {"coupons": [{"_id": "c1", "code": "SAVE"}], "total": 21}
        });
        let page: Page<Coupon> = list_page(body, Some(10)).unwrap();
        assert_eq!(page.total_items, 21);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn records_without_display_name_still_list() {
        let malls: Page<Mall> = list_page(json!({"malls": [{"_id": "m1"}, {"_id": "m2", "name": "Plaza"}]}), None).unwrap();
        assert_eq!(malls.items[0].name, "");
        assert_eq!(malls.items[1].name, "Plaza");

        let shops: Page<Shop> = list_page(json!({"shops": [{"_id": "s1", "mall": "m1"}]}), Some(8)).unwrap();
        assert_eq!(shops.items[0].shop_name, "");

        let coupons: Page<Coupon> = list_page(json!({"coupons": [{"_id": "c1", "discountAmount": 5}]}), Some(10)).unwrap();
        assert_eq!(coupons.items[0].code, "");

        let offers: Page<Offer> = list_page(json!({"offers": [{"_id": "o1", "discountPercentage": 20}]}), Some(10)).unwrap();
        assert_eq!(offers.items[0].title, "");
    }

    #[test]
    fn missing_collection_is_a_decode_error() {
        let body = json!({"success": true, "message": "ok"});
        assert!(matches!(list_page::<User>(body, None), Err(ApiError::Decode(_))));
    }

    #[test]
    fn success_false_surfaces_server_message() {
        let body = json!({"success": false, "message": "Mall has shops"});
        assert_eq!(
            ensure_success(200, &body),
            Err(ApiError::Server { status: 200, message: "Mall has shops".into() })
        );
        assert!(ensure_success(200, &json!([])).is_ok());
    }

    #[test]
    fn detail_accepts_bare_and_wrapped_records() {
        let bare: Mall = detail(json!({"_id": "m1", "name": "Plaza"}), ResourceKind::Mall).unwrap();
        assert_eq!(bare.id, "m1");

        let data: Coupon = detail(
            json!({"success": true, "data": {"_id": "c1", "code": "SAVE"}}),
            ResourceKind::Coupon,
        ).unwrap();
        assert_eq!(data.code, "SAVE");

        let user: User = detail(
            json!({"success": true, "user": {"_id": "u1", "name": "Ana"}}),
            ResourceKind::User,
        ).unwrap();
        assert_eq!(user.name, "Ana");

        let shop: Shop = detail(
            json!({"success": true, "shop": {"_id": "s1", "shopName": "Zara", "mall": "m1"}}),
            ResourceKind::Shop,
        ).unwrap();
        assert_eq!(shop.shop_name, "Zara");
    }

    #[test]
    fn save_acknowledgement_without_record_uses_payload() {
        let payload = json!({"shopName": "Zara", "category": "Clothing", "mall": "m1"});

        let created: Shop = saved(
            json!({"success": true, "message": "Shop created successfully", "id": "s9"}),
            ResourceKind::Shop,
            &payload,
            None,
        ).unwrap();
        assert_eq!(created.id, "s9");
        assert_eq!(created.shop_name, "Zara");
        assert_eq!(created.mall.as_ref().map(|m| m.id().to_string()), Some("m1".to_string()));

        let updated: Shop = saved(
            json!({"success": true, "message": "Shop updated successfully"}),
            ResourceKind::Shop,
            &payload,
            Some("s1"),
        ).unwrap();
        assert_eq!(updated.id, "s1");
        assert_eq!(updated.category.as_deref(), Some("Clothing"));
    }

    #[test]
    fn save_prefers_echoed_record() {
        let payload = json!({"name": "Local"});
        let mall: Mall = saved(
            json!({"success": true, "mall": {"_id": "m7", "name": "Server"}}),
            ResourceKind::Mall,
            &payload,
            None,
        ).unwrap();
        assert_eq!(mall.name, "Server");
    }

    #[test]
    fn dashboard_reads_data_and_top_level_activity() {
        let body = json!({
            "success": true,
            "data": {"totalUsers": 4, "totalMalls": 2, "mallsWithShops": [{"name": "Plaza", "shopCount": 5}]},
            "recentActivity": [{"type": "mall", "message": "Plaza created"}]
        });
        let stats = dashboard(body).unwrap();
        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.malls_with_shops[0].shop_count, 5);
        assert_eq!(stats.recent_activity[0].message, "Plaza created");
    }
}
