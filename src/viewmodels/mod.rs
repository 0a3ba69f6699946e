pub mod delete_flow;
pub mod list_viewmodel;
pub mod form_viewmodel;
pub mod session_viewmodel;
pub mod dashboard_viewmodel;

pub use delete_flow::DeleteFlow;
pub use list_viewmodel::{ListPhase, ListViewState, LoadOutcome, ResourceListController};
pub use form_viewmodel::{FormMode, FormState, FormViewModel};
pub use session_viewmodel::SessionViewModel;
pub use dashboard_viewmodel::{DashboardState, DashboardViewModel};
