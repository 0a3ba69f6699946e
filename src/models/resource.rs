// ============================================================================
// RESOURCE - Contrato común de los cinco tipos de recurso
// ============================================================================
// Cada tipo (mall, shop, coupon, offer, user) declara aquí sus endpoints,
// las claves de su sobre de respuesta y su política de listado. Los
// viewmodels solo hablan con este contrato.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::error::FieldErrors;

/// Tipo de recurso administrado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mall,
    Shop,
    Coupon,
    Offer,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Mall,
        ResourceKind::Shop,
        ResourceKind::Coupon,
        ResourceKind::Offer,
        ResourceKind::User,
    ];

    /// Segmento de ruta de la API (`/api/{segment}/...`)
    pub fn api_segment(&self) -> &'static str {
        match self {
            ResourceKind::Mall => "malls",
            ResourceKind::Shop => "shops",
            ResourceKind::Coupon => "coupons",
            ResourceKind::Offer => "offers",
            ResourceKind::User => "users",
        }
    }

    pub fn list_path(&self) -> String {
        let action = match self {
            ResourceKind::Mall => "malls",
            ResourceKind::Shop => "allShops",
            ResourceKind::Coupon => "allCoupons",
            ResourceKind::Offer => "allOffers",
            ResourceKind::User => "allUsers",
        };
        format!("/api/{}/{}", self.api_segment(), action)
    }

    pub fn detail_path(&self, id: &str) -> String {
        let action = match self {
            ResourceKind::Mall => "mallById",
            ResourceKind::Shop => "shopById",
            ResourceKind::Coupon => "getCoupon",
            ResourceKind::Offer => "getOffer",
            ResourceKind::User => "user",
        };
        format!("/api/{}/{}/{}", self.api_segment(), action, id)
    }

    pub fn update_path(&self, id: &str) -> String {
        let action = match self {
            ResourceKind::Mall => "updateMall",
            ResourceKind::Shop => "updateShop",
            ResourceKind::Coupon => "updateCoupon",
            ResourceKind::Offer => "updateOffer",
            ResourceKind::User => "updateProfile",
        };
        format!("/api/{}/{}/{}", self.api_segment(), action, id)
    }

    pub fn delete_path(&self, id: &str) -> String {
        let action = match self {
            ResourceKind::Mall => "deleteMall",
            ResourceKind::Shop => "deleteShop",
            ResourceKind::Coupon => "deleteCoupon",
            ResourceKind::Offer => "deleteOffer",
            ResourceKind::User => "deleteUser",
        };
        format!("/api/{}/{}/{}", self.api_segment(), action, id)
    }

    /// Clave del array de items en la respuesta de listado
    pub fn collection_key(&self) -> &'static str {
        self.api_segment()
    }

    /// Clave del total en la respuesta de listado (`totalShops`, ...)
    pub fn total_key(&self) -> &'static str {
        match self {
            ResourceKind::Mall => "totalMalls",
            ResourceKind::Shop => "totalShops",
            ResourceKind::Coupon => "totalCoupons",
            ResourceKind::Offer => "totalOffers",
            ResourceKind::User => "totalUsers",
        }
    }

    /// Clave con la que el detalle puede venir envuelto
    pub fn singular_key(&self) -> &'static str {
        match self {
            ResourceKind::Mall => "mall",
            ResourceKind::Shop => "shop",
            ResourceKind::Coupon => "coupon",
            ResourceKind::Offer => "offer",
            ResourceKind::User => "user",
        }
    }

    pub fn singular_label(&self) -> &'static str {
        self.singular_key()
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            ResourceKind::Mall => "Malls",
            ResourceKind::Shop => "Shops",
            ResourceKind::Coupon => "Coupons",
            ResourceKind::Offer => "Offers",
            ResourceKind::User => "Users",
        }
    }
}

/// Dónde se pagina la lista
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Se pide todo y se corta localmente
    Client,
    /// `page`/`limit` viajan al servidor
    Server,
}

/// Dónde se evalúa la búsqueda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Filtro local sobre los items ya cargados
    Client,
    /// Parámetro `search` en la query; vuelve a la página 1
    Server,
}

/// Cómo se reconcilia la lista local tras un borrado exitoso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    LocalPatch,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPolicy {
    pub page_size: u32,
    pub pagination: PaginationMode,
    pub search: SearchMode,
    pub on_delete: DeletePolicy,
}

/// Registro remoto listable, buscable y borrable
pub trait Resource: Clone + PartialEq + DeserializeOwned + 'static {
    const KIND: ResourceKind;

    /// Identificador emitido por el servidor
    fn id(&self) -> &str;

    /// Nombre mostrado (tarjetas, modal de borrado)
    fn label(&self) -> &str;

    fn image(&self) -> Option<&str> {
        None
    }

    /// Campos sobre los que actúa la búsqueda libre
    fn search_fields(&self) -> Vec<&str>;

    /// Valor exacto para filtros (`role`, `status`, `category`, ...)
    fn attribute(&self, _key: &str) -> Option<&str> {
        None
    }

    fn policy() -> ListPolicy;
}

/// Payload de creación/edición
pub trait Payload: Serialize + Clone + Default + std::fmt::Debug {
    /// Reglas de validación del formulario; vacío = válido
    fn validate(&self) -> FieldErrors;

    /// Campos multipart (`nombre`, `valor`) cuando se adjunta imagen
    fn form_fields(&self) -> Vec<(String, String)>;

    /// Normalización previa al envío (mayúsculas, fechas ISO, ...)
    fn normalized(&self) -> Self {
        self.clone()
    }
}

/// Recurso que se crea y edita desde el panel
pub trait Editable: Resource {
    type Payload: Payload;

    fn create_path(payload: &Self::Payload) -> String;

    /// Valores iniciales del formulario de edición
    fn to_payload(&self) -> Self::Payload;

    /// Nombre del campo multipart de la imagen
    fn image_field() -> &'static str {
        "image"
    }
}

/// Referencia relacional: id suelto o documento poblado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Populated(T),
    Id(String),
}

/// Documento que puede aparecer poblado dentro de otro
pub trait Referenced {
    fn ref_id(&self) -> &str;
    fn ref_name(&self) -> &str;
}

impl<T: Referenced> Reference<T> {
    pub fn id(&self) -> &str {
        match self {
            Reference::Populated(doc) => doc.ref_id(),
            Reference::Id(id) => id,
        }
    }

    /// Nombre solo disponible si el servidor pobló la referencia
    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Populated(doc) => Some(doc.ref_name()),
            Reference::Id(_) => None,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Reference::Populated(doc) => Some(doc),
            Reference::Id(_) => None,
        }
    }
}

/// Ayuda de validación: campo obligatorio no vacío
pub(crate) fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), "Required".to_string());
    }
}

/// Ayuda de validación: número dentro de un rango cerrado
pub(crate) fn require_range(errors: &mut FieldErrors, field: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() || value < min || value > max {
        errors.insert(field.to_string(), format!("Must be between {} and {}", min, max));
    }
}

/// Ayuda de validación: email obligatorio y bien formado
pub(crate) fn require_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field.to_string(), "Required".to_string());
    } else if !is_valid_email(value) {
        errors.insert(field.to_string(), "Invalid email address".to_string());
    }
}

/// `local@dominio.tld` sin espacios
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                    .unwrap_or(false)
        }
        None => false,
    }
}
