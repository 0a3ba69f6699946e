use serde::Deserialize;

/// Totales del panel (`GET /api/dashboard/stats`, bajo `data`)
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_malls: u64,
    #[serde(default)]
    pub total_shops: u64,
    #[serde(default)]
    pub total_coupons: u64,
    #[serde(default)]
    pub total_offers: u64,
    #[serde(default)]
    pub malls_with_shops: Vec<MallShopCount>,
    /// Viene al nivel superior de la respuesta, no dentro de `data`
    #[serde(skip)]
    pub recent_activity: Vec<ActivityEntry>,
}

impl DashboardStats {
    /// Máximo de tiendas por mall (escala de las barras)
    pub fn max_shop_count(&self) -> u64 {
        self.malls_with_shops
            .iter()
            .map(|m| m.shop_count)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MallShopCount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shop_count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default, alias = "description")]
    pub message: String,
    #[serde(default, alias = "createdAt")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_totals_default_to_zero() {
        let stats: DashboardStats = serde_json::from_str(
            r#"{"totalMalls":3,"mallsWithShops":[{"name":"Plaza","shopCount":12},{"name":"City","shopCount":4}]}"#,
        ).unwrap();
        assert_eq!(stats.total_malls, 3);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.max_shop_count(), 12);
    }
}
