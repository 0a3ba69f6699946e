use serde::{Deserialize, Serialize};
use crate::config::CONFIG;
use crate::error::FieldErrors;
use crate::models::resource::{
    require, require_range, DeletePolicy, Editable, ListPolicy, PaginationMode, Payload,
    Reference, Resource, ResourceKind, SearchMode,
};
use crate::models::shop::ShopRef;
use crate::utils::dates::{parse_date, to_input_value, to_iso_string};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub shop: Option<Reference<ShopRef>>,
}

impl Coupon {
    pub fn shop_name(&self) -> Option<&str> {
        self.shop.as_ref().and_then(|s| s.name())
    }
}

impl Resource for Coupon {
    const KIND: ResourceKind = ResourceKind::Coupon;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.code
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.code.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        if let Some(shop) = self.shop_name() {
            fields.push(shop);
        }
        fields
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        match key {
            "shop" => self.shop.as_ref().map(|s| s.id()),
            _ => None,
        }
    }

    fn policy() -> ListPolicy {
        ListPolicy {
            page_size: CONFIG.page_sizes.coupons,
            pagination: PaginationMode::Server,
            search: SearchMode::Client,
            on_delete: DeletePolicy::LocalPatch,
        }
    }
}

/// Formulario de cupón
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CouponPayload {
    #[serde(rename = "shop")]
    pub shop_id: String,
    pub code: String,
    pub discount_amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub usage_limit: i64,
}

impl Payload for CouponPayload {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "shopId", &self.shop_id);
        require(&mut errors, "code", &self.code);
        require_range(&mut errors, "discountAmount", self.discount_amount, 0.0, 100.0);
        validate_period(&mut errors, &self.start_date, &self.end_date);
        if self.usage_limit < 1 {
            errors.insert("usageLimit".to_string(), "Usage limit must be at least 1".to_string());
        }
        errors
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("shop".to_string(), self.shop_id.clone()),
            ("code".to_string(), self.code.clone()),
            ("discountAmount".to_string(), self.discount_amount.to_string()),
            ("startDate".to_string(), self.start_date.clone()),
            ("endDate".to_string(), self.end_date.clone()),
            ("usageLimit".to_string(), self.usage_limit.to_string()),
        ]
    }

    fn normalized(&self) -> Self {
        let mut payload = self.clone();
        payload.code = payload.code.trim().to_uppercase();
        payload.start_date = to_iso_string(&payload.start_date).unwrap_or(payload.start_date);
        payload.end_date = to_iso_string(&payload.end_date).unwrap_or(payload.end_date);
        payload
    }
}

impl Editable for Coupon {
    type Payload = CouponPayload;

    fn create_path(payload: &CouponPayload) -> String {
        format!("/api/coupons/createCoupon/{}", payload.shop_id)
    }

    fn to_payload(&self) -> CouponPayload {
        CouponPayload {
            shop_id: self.shop.as_ref().map(|s| s.id().to_string()).unwrap_or_default(),
            code: self.code.clone(),
            discount_amount: self.discount_amount.unwrap_or(0.0),
            start_date: self.start_date.as_deref().map(to_input_value).unwrap_or_default(),
            end_date: self.end_date.as_deref().map(to_input_value).unwrap_or_default(),
            usage_limit: self.usage_limit.map(i64::from).unwrap_or(1),
        }
    }
}

/// Fechas obligatorias y fin >= inicio (compartido con ofertas)
pub(crate) fn validate_period(errors: &mut FieldErrors, start: &str, end: &str) {
    let start_date = parse_date(start);
    let end_date = parse_date(end);
    if start_date.is_none() {
        errors.insert("startDate".to_string(), "Required".to_string());
    }
    match (start_date, end_date) {
        (_, None) => {
            errors.insert("endDate".to_string(), "Required".to_string());
        }
        (Some(s), Some(e)) if e < s => {
            errors.insert("endDate".to_string(), "End date must be after start date".to_string());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload() -> CouponPayload {
        CouponPayload {
            shop_id: "s1".into(),
            code: " summer25 ".into(),
            discount_amount: 25.0,
            start_date: "2025-06-01".into(),
            end_date: "2025-06-30".into(),
            usage_limit: 100,
        }
    }

    #[test]
    fn normalizes_code_and_dates() {
        let normalized = payload().normalized();
        assert_eq!(normalized.code, "SUMMER25");
        assert_eq!(normalized.start_date, "2025-06-01T00:00:00.000Z");
        assert!(normalized.validate().is_empty());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut p = payload();
        p.end_date = "2025-05-01".into();
        assert_eq!(
            p.validate().get("endDate").map(String::as_str),
            Some("End date must be after start date")
        );
    }

    #[test]
    fn usage_limit_and_discount_bounds() {
        let mut p = payload();
        p.usage_limit = 0;
        p.discount_amount = 150.0;
        let errors = p.validate();
        assert!(errors.contains_key("usageLimit"));
        assert!(errors.contains_key("discountAmount"));
    }

    #[test]
    fn detail_wrapped_shop_name_is_searchable() {
        let coupon: Coupon = serde_json::from_str(
            r#"{"_id":"c1","code":"SAVE10","description":"Ten off","shop":{"_id":"s1","shopName":"Zara"}}"#,
        ).unwrap();
        assert_eq!(coupon.search_fields(), vec!["SAVE10", "Ten off", "Zara"]);
        assert_eq!(coupon.to_payload().shop_id, "s1");
    }
}
