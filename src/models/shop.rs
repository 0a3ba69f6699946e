use serde::{Deserialize, Serialize};
use crate::config::CONFIG;
use crate::error::FieldErrors;
use crate::models::mall::MallRef;
use crate::models::resource::{
    require, require_range, DeletePolicy, Editable, ListPolicy, PaginationMode, Payload,
    Reference, Referenced, Resource, ResourceKind, SearchMode,
};
use crate::utils::SHOP_CATEGORIES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub mall: Option<Reference<MallRef>>,
}

impl Shop {
    pub fn mall_name(&self) -> Option<&str> {
        self.mall.as_ref().and_then(|m| m.name())
    }
}

impl Resource for Shop {
    const KIND: ResourceKind = ResourceKind::Shop;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.shop_name
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.shop_name.as_str()];
        if let Some(mall) = self.mall_name() {
            fields.push(mall);
        }
        fields
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        match key {
            "category" => self.category.as_deref(),
            "mall" => self.mall.as_ref().map(|m| m.id()),
            _ => None,
        }
    }

    fn policy() -> ListPolicy {
        ListPolicy {
            page_size: CONFIG.page_sizes.shops,
            pagination: PaginationMode::Server,
            search: SearchMode::Server,
            on_delete: DeletePolicy::LocalPatch,
        }
    }
}

/// Referencia poblada (`coupon.shop`, `offer.shop`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShopRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub mall: Option<Reference<MallRef>>,
}

impl Referenced for ShopRef {
    fn ref_id(&self) -> &str {
        &self.id
    }

    fn ref_name(&self) -> &str {
        &self.shop_name
    }
}

/// Formulario de tienda
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShopPayload {
    pub shop_name: String,
    pub category: String,
    pub opening_hours: String,
    pub rating: f64,
    /// Se envía como `mall`; en creación también va en la ruta
    #[serde(rename = "mall")]
    pub mall_id: String,
}

impl Payload for ShopPayload {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "shopName", &self.shop_name);
        require(&mut errors, "mallId", &self.mall_id);
        require(&mut errors, "category", &self.category);
        require(&mut errors, "openingHours", &self.opening_hours);
        if !self.category.trim().is_empty() && !SHOP_CATEGORIES.contains(&self.category.trim()) {
            errors.insert("category".to_string(), "Unknown category".to_string());
        }
        require_range(&mut errors, "rating", self.rating, 0.0, 5.0);
        errors
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("shopName".to_string(), self.shop_name.clone()),
            ("category".to_string(), self.category.clone()),
            ("openingHours".to_string(), self.opening_hours.clone()),
            ("rating".to_string(), self.rating.to_string()),
            ("mall".to_string(), self.mall_id.clone()),
        ]
    }

    fn normalized(&self) -> Self {
        let mut payload = self.clone();
        payload.shop_name = payload.shop_name.trim().to_string();
        payload.category = payload.category.trim().to_string();
        payload
    }
}

impl Editable for Shop {
    type Payload = ShopPayload;

    fn create_path(payload: &ShopPayload) -> String {
        format!("/api/shops/createShop/{}", payload.mall_id)
    }

    fn to_payload(&self) -> ShopPayload {
        ShopPayload {
            shop_name: self.shop_name.clone(),
            category: self.category.clone().unwrap_or_default(),
            opening_hours: self.opening_hours.clone().unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            mall_id: self.mall.as_ref().map(|m| m.id().to_string()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mall_reference_may_be_populated_or_bare() {
        let populated: Shop = serde_json::from_str(
            r#"{"_id":"s1","shopName":"Zara","mall":{"_id":"m1","name":"Plaza"}}"#,
        ).unwrap();
        assert_eq!(populated.mall_name(), Some("Plaza"));
        assert_eq!(populated.search_fields(), vec!["Zara", "Plaza"]);

        let bare: Shop = serde_json::from_str(r#"{"_id":"s2","shopName":"H&M","mall":"m1"}"#).unwrap();
        assert_eq!(bare.mall_name(), None);
        assert_eq!(bare.attribute("mall"), Some("m1"));
    }

    #[test]
    fn create_path_targets_parent_mall() {
        let payload = ShopPayload { mall_id: "m9".into(), ..ShopPayload::default() };
        assert_eq!(Shop::create_path(&payload), "/api/shops/createShop/m9");
    }

    #[test]
    fn rejects_unknown_category() {
        let payload = ShopPayload {
            shop_name: "Zara".into(),
            category: "Weapons".into(),
            opening_hours: "10-20".into(),
            rating: 3.0,
            mall_id: "m1".into(),
        };
        let errors = payload.validate();
        assert_eq!(errors.get("category").map(String::as_str), Some("Unknown category"));
        assert_eq!(errors.len(), 1);
    }
}
