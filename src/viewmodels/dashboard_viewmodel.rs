// ============================================================================
// DASHBOARD VIEWMODEL - Totales y tiendas por mall
// ============================================================================

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::DashboardStats;
use crate::services::{ApiClient, GlooTransport, HttpTransport};

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    pub error: Option<ApiError>,
}

pub struct DashboardViewModel<T: HttpTransport = GlooTransport> {
    api: Rc<ApiClient<T>>,
    state: Rc<RefCell<DashboardState>>,
}

impl<T: HttpTransport> Clone for DashboardViewModel<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: HttpTransport> DashboardViewModel<T> {
    pub fn new(api: Rc<ApiClient<T>>) -> Self {
        Self {
            api,
            state: Rc::new(RefCell::new(DashboardState::default())),
        }
    }

    pub fn state(&self) -> Ref<'_, DashboardState> {
        self.state.borrow()
    }

    pub fn reset(&self) {
        *self.state.borrow_mut() = DashboardState::default();
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        let epoch = self.api.session().epoch();
        {
            let mut state = self.state.borrow_mut();
            state.loading = true;
            state.error = None;
        }
        let result = self.api.dashboard_stats().await;
        if epoch != self.api.session().epoch() {
            self.reset();
            return Ok(());
        }
        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(stats) => {
                state.stats = Some(stats);
                Ok(())
            }
            Err(e) => {
                log::error!("❌ [DASHBOARD] Dashboard stats failed: {}", e);
                state.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authed_client;
    use serde_json::json;

    #[tokio::test]
    async fn loads_stats_into_state() {
        let (client, transport) = authed_client();
        transport.reply_json(200, json!({"success": true, "data": {"totalShops": 12, "mallsWithShops": []}}));
        let vm = DashboardViewModel::new(Rc::new(client));

        vm.load().await.unwrap();

        let state = vm.state();
        assert!(!state.loading);
        assert_eq!(state.stats.as_ref().map(|s| s.total_shops), Some(12));
        assert_eq!(transport.last_request().unwrap().url, "https://api.test/api/dashboard/stats");
    }

    #[tokio::test]
    async fn failure_is_kept_for_display() {
        let (client, transport) = authed_client();
        transport.reply_json(503, json!({"message": "Maintenance"}));
        let vm = DashboardViewModel::new(Rc::new(client));

        assert!(vm.load().await.is_err());
        assert_eq!(vm.state().error.as_ref().map(|e| e.user_message()), Some("Maintenance".to_string()));
    }
}
