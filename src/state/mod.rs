// ============================================================================
// STATE MODULE - State Management con Rc<RefCell>
// ============================================================================

pub mod router;
pub mod app_state;

pub use router::{Route, Section};
pub use app_state::*;
