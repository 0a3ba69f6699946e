use serde::{Deserialize, Serialize};
use crate::config::CONFIG;
use crate::error::FieldErrors;
use crate::models::resource::{
    require, require_range, DeletePolicy, Editable, ListPolicy, PaginationMode, Payload,
    Referenced, Resource, ResourceKind, SearchMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn google_maps_url(&self) -> String {
        format!("https://www.google.com/maps?q={},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Mall {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
}

impl Resource for Mall {
    const KIND: ResourceKind = ResourceKind::Mall;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(location) = &self.location {
            fields.push(location);
        }
        fields
    }

    fn policy() -> ListPolicy {
        ListPolicy {
            page_size: CONFIG.page_sizes.malls,
            pagination: PaginationMode::Client,
            search: SearchMode::Client,
            on_delete: DeletePolicy::LocalPatch,
        }
    }
}

/// Referencia poblada (`shop.mall`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MallRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Referenced for MallRef {
    fn ref_id(&self) -> &str {
        &self.id
    }

    fn ref_name(&self) -> &str {
        &self.name
    }
}

/// Formulario de mall
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MallPayload {
    pub name: String,
    pub location: String,
    pub rating: f64,
    pub opening_hours: String,
    pub facilities: Vec<String>,
    pub coordinates: Coordinates,
    pub google_maps_url: String,
}

impl MallPayload {
    /// "Parking, Food Court , WiFi" -> ["Parking", "Food Court", "WiFi"]
    pub fn parse_facilities(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(|f| f.to_string())
            .collect()
    }

    pub fn facilities_text(&self) -> String {
        self.facilities.join(", ")
    }
}

impl Payload for MallPayload {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "location", &self.location);
        require(&mut errors, "openingHours", &self.opening_hours);
        if self.facilities.is_empty() {
            errors.insert("facilities".to_string(), "Required".to_string());
        }
        require_range(&mut errors, "rating", self.rating, 0.0, 5.0);
        errors
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("name".to_string(), self.name.clone()),
            ("location".to_string(), self.location.clone()),
            ("rating".to_string(), self.rating.to_string()),
            ("openingHours".to_string(), self.opening_hours.clone()),
        ];
        for (index, facility) in self.facilities.iter().enumerate() {
            fields.push((format!("facilities[{}]", index), facility.clone()));
        }
        fields.push(("coordinates[lat]".to_string(), self.coordinates.lat.to_string()));
        fields.push(("coordinates[lng]".to_string(), self.coordinates.lng.to_string()));
        fields.push(("googleMapsUrl".to_string(), self.google_maps_url.clone()));
        fields
    }

    fn normalized(&self) -> Self {
        let mut payload = self.clone();
        payload.name = payload.name.trim().to_string();
        payload.location = payload.location.trim().to_string();
        payload.google_maps_url = payload.coordinates.google_maps_url();
        payload
    }
}

impl Editable for Mall {
    type Payload = MallPayload;

    fn create_path(_payload: &MallPayload) -> String {
        "/api/malls/create".to_string()
    }

    fn to_payload(&self) -> MallPayload {
        let coordinates = self.coordinates.unwrap_or_default();
        MallPayload {
            name: self.name.clone(),
            location: self.location.clone().unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            opening_hours: self.opening_hours.clone().unwrap_or_default(),
            facilities: self.facilities.clone(),
            coordinates,
            google_maps_url: coordinates.google_maps_url(),
        }
    }
}
