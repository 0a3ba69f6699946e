use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub search_debounce_ms: u32,
    pub page_sizes: PageSizes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "https://mall-backend-node.vercel.app".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            search_debounce_ms: 300,
            page_sizes: PageSizes::default(),
        }
    }
}

/// Tamaño de página por tipo de recurso
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSizes {
    pub malls: u32,
    pub shops: u32,
    pub coupons: u32,
    pub offers: u32,
    pub users: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            malls: 6,
            shops: 8,
            coupons: 10,
            offers: 8,
            users: 10,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: option_env!("BACKEND_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            search_debounce_ms: option_env!("SEARCH_DEBOUNCE_MS")
                .unwrap_or("300").parse().unwrap_or(300),
            page_sizes: PageSizes {
                malls: parse_page_size(option_env!("MALLS_PAGE_SIZE"), defaults.page_sizes.malls),
                shops: parse_page_size(option_env!("SHOPS_PAGE_SIZE"), defaults.page_sizes.shops),
                coupons: parse_page_size(option_env!("COUPONS_PAGE_SIZE"), defaults.page_sizes.coupons),
                offers: parse_page_size(option_env!("OFFERS_PAGE_SIZE"), defaults.page_sizes.offers),
                users: parse_page_size(option_env!("USERS_PAGE_SIZE"), defaults.page_sizes.users),
            },
        }
    }

    /// URL base del backend
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

/// Un tamaño de página de 0 rompería la paginación: se ignora
fn parse_page_size(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.parse::<u32>().ok())
        .filter(|size| *size > 0)
        .unwrap_or(default)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
