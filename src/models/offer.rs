use serde::{Deserialize, Serialize};
use crate::config::CONFIG;
use crate::error::FieldErrors;
use crate::models::coupon::validate_period;
use crate::models::resource::{
    require, require_range, DeletePolicy, Editable, ListPolicy, PaginationMode, Payload,
    Reference, Resource, ResourceKind, SearchMode,
};
use crate::models::shop::ShopRef;
use crate::utils::dates::{to_input_value, to_iso_string};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub shop: Option<Reference<ShopRef>>,
}

impl Offer {
    pub fn shop_name(&self) -> Option<&str> {
        self.shop.as_ref().and_then(|s| s.name())
    }

    /// `offer.shop.mall.name`, solo si ambas referencias vienen pobladas
    pub fn mall_name(&self) -> Option<&str> {
        self.shop
            .as_ref()
            .and_then(|s| s.populated())
            .and_then(|shop| shop.mall.as_ref())
            .and_then(|mall| mall.name())
    }
}

impl Resource for Offer {
    const KIND: ResourceKind = ResourceKind::Offer;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.shop_name());
        fields.extend(self.mall_name());
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
            page_size: CONFIG.page_sizes.offers,
            pagination: PaginationMode::Server,
            search: SearchMode::Client,
            on_delete: DeletePolicy::Reload,
        }
    }
}

/// Formulario de oferta
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferPayload {
    #[serde(rename = "shop")]
    pub shop_id: String,
    pub title: String,
    pub description: String,
    pub discount_percentage: f64,
    pub start_date: String,
    pub end_date: String,
}

impl Payload for OfferPayload {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "shopId", &self.shop_id);
        require(&mut errors, "title", &self.title);
        require(&mut errors, "description", &self.description);
        require_range(&mut errors, "discountPercentage", self.discount_percentage, 0.0, 100.0);
        validate_period(&mut errors, &self.start_date, &self.end_date);
        errors
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("shop".to_string(), self.shop_id.clone()),
            ("title".to_string(), self.title.clone()),
            ("description".to_string(), self.description.clone()),
            ("discountPercentage".to_string(), self.discount_percentage.to_string()),
            ("startDate".to_string(), self.start_date.clone()),
            ("endDate".to_string(), self.end_date.clone()),
        ]
    }

    fn normalized(&self) -> Self {
        let mut payload = self.clone();
        payload.title = payload.title.trim().to_string();
        payload.start_date = to_iso_string(&payload.start_date).unwrap_or(payload.start_date);
        payload.end_date = to_iso_string(&payload.end_date).unwrap_or(payload.end_date);
        payload
    }
}

impl Editable for Offer {
    type Payload = OfferPayload;

    fn create_path(payload: &OfferPayload) -> String {
        format!("/api/offers/createOffer/{}", payload.shop_id)
    }

    fn to_payload(&self) -> OfferPayload {
        OfferPayload {
            shop_id: self.shop.as_ref().map(|s| s.id().to_string()).unwrap_or_default(),
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            discount_percentage: self.discount_percentage.unwrap_or(0.0),
            start_date: self.start_date.as_deref().map(to_input_value).unwrap_or_default(),
            end_date: self.end_date.as_deref().map(to_input_value).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn searches_nested_shop_and_mall_names() {
        let offer: Offer = serde_json::from_str(
            r#"{"_id":"o1","title":"Summer Sale","shop":{"_id":"s1","shopName":"Zara","mall":{"_id":"m1","name":"Plaza"}}}"#,
        ).unwrap();
        assert_eq!(offer.search_fields(), vec!["Summer Sale", "Zara", "Plaza"]);
    }

    #[test]
    fn bare_shop_reference_has_no_names() {
        let offer: Offer = serde_json::from_str(r#"{"_id":"o2","title":"Flash","shop":"s1"}"#).unwrap();
        assert_eq!(offer.search_fields(), vec!["Flash"]);
        assert_eq!(offer.mall_name(), None);
    }

    #[test]
    fn validation_requires_description_and_bounds_discount() {
        let payload = OfferPayload {
            shop_id: "s1".into(),
            title: "Sale".into(),
            description: "".into(),
            discount_percentage: -5.0,
            start_date: "2025-01-01".into(),
            end_date: "2025-01-31".into(),
        };
        let errors = payload.validate();
        assert!(errors.contains_key("description"));
        assert!(errors.contains_key("discountPercentage"));
        assert!(!errors.contains_key("endDate"));
    }

    #[test]
    fn missing_dates_are_required() {
        let payload = OfferPayload::default();
        let errors = payload.validate();
        assert_eq!(errors.get("startDate").map(String::as_str), Some("Required"));
        assert_eq!(errors.get("endDate").map(String::as_str), Some("Required"));
    }
}
