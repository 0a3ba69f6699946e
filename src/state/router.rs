// ============================================================================
// ROUTER - Rutas hash (`#/malls/edit/42`)
// ============================================================================

/// Secciones con listado + alta + edición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Malls,
    Shops,
    Coupons,
    Offers,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Malls, Section::Shops, Section::Coupons, Section::Offers];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Malls => "malls",
            Section::Shops => "shops",
            Section::Coupons => "coupons",
            Section::Offers => "offers",
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    Profile,
    List(Section),
    Create(Section),
    Edit(Section, String),
}

impl Route {
    /// Desconocida -> dashboard
    pub fn parse(hash: &str) -> Route {
        let path = hash.trim_start_matches('#').trim_start_matches('/');
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            ["login"] => Route::Login,
            ["users"] => Route::Users,
            ["profile"] => Route::Profile,
            [slug] => Section::from_slug(slug).map(Route::List).unwrap_or(Route::Dashboard),
            [slug, "add"] => Section::from_slug(slug).map(Route::Create).unwrap_or(Route::Dashboard),
            [slug, "edit", id] => Section::from_slug(slug)
                .map(|s| Route::Edit(s, id.to_string()))
                .unwrap_or(Route::Dashboard),
            _ => Route::Dashboard,
        }
    }

    /// Sin sesión todo lleva a login; con sesión, login lleva al dashboard
    pub fn resolve(hash: &str, authenticated: bool) -> Route {
        match (Route::parse(hash), authenticated) {
            (Route::Login, true) => Route::Dashboard,
            (_, false) => Route::Login,
            (route, true) => route,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Login => "#/login".to_string(),
            Route::Dashboard => "#/dashboard".to_string(),
            Route::Users => "#/users".to_string(),
            Route::Profile => "#/profile".to_string(),
            Route::List(section) => format!("#/{}", section.slug()),
            Route::Create(section) => format!("#/{}/add", section.slug()),
            Route::Edit(section, id) => format!("#/{}/edit/{}", section.slug(), id),
        }
    }

    /// Entrada activa de la barra lateral
    pub fn nav_key(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Users => "users",
            Route::Profile => "profile",
            Route::List(s) | Route::Create(s) | Route::Edit(s, _) => s.slug(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_section_routes() {
        assert_eq!(Route::parse("#/shops"), Route::List(Section::Shops));
        assert_eq!(Route::parse("#/coupons/add"), Route::Create(Section::Coupons));
        assert_eq!(
            Route::parse("#/offers/edit/64fa"),
            Route::Edit(Section::Offers, "64fa".to_string())
        );
        assert_eq!(Route::parse("#/users"), Route::Users);
    }

    #[test]
    fn unknown_and_empty_fall_back_to_dashboard() {
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("#/"), Route::Dashboard);
        assert_eq!(Route::parse("#/parking"), Route::Dashboard);
        assert_eq!(Route::parse("#/malls/edit"), Route::Dashboard);
    }

    #[test]
    fn unauthenticated_always_lands_on_login() {
        assert_eq!(Route::resolve("#/malls", false), Route::Login);
        assert_eq!(Route::resolve("#/login", true), Route::Dashboard);
        assert_eq!(Route::resolve("#/profile", true), Route::Profile);
    }

    #[test]
    fn hash_round_trips_for_every_section() {
        for section in Section::ALL {
            for route in [
                Route::List(section),
                Route::Create(section),
                Route::Edit(section, "abc".to_string()),
            ] {
                assert_eq!(Route::parse(&route.to_hash()), route);
            }
        }
    }
}
