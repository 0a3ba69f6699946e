/// Clave de localStorage con el registro de sesión del administrador
pub const SESSION_STORAGE_KEY: &str = "adminUser";

/// Imagen por defecto de malls y del modal de borrado
pub const MALL_PLACEHOLDER_IMAGE: &str = "https://images.pexels.com/photos/1579739/pexels-photo-1579739.jpeg";

/// Imagen por defecto de tiendas, cupones y ofertas
pub const ITEM_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x160?text=No+Image";

/// Avatar por defecto del perfil
pub const AVATAR_PLACEHOLDER_IMAGE: &str = "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg";

/// Categorías predefinidas de tiendas
pub const SHOP_CATEGORIES: [&str; 10] = [
    "Clothing", "Electronics", "Sports", "Books", "Toys",
    "Jewelry", "Food", "Beauty", "Home", "Other",
];

/// Roles de usuario filtrables
pub const USER_ROLES: [&str; 3] = ["admin", "user", "manager"];

/// Posición por defecto del mapa del formulario de malls (lat, lng)
pub const DEFAULT_MAP_POSITION: (f64, f64) = (51.505, -0.09);

/// Estados de usuario filtrables
pub const USER_STATUSES: [&str; 2] = ["active", "inactive"];
