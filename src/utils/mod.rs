// Utils compartidos

pub mod constants;
pub mod dates;
pub mod search;
pub mod pagination;
pub mod debounce;

pub use constants::*;
pub use dates::*;
pub use search::{apply_filters, evaluate};
pub use pagination::{windows, is_navigable, total_pages_for, PageWindow};
pub use debounce::{DebounceGate, Debouncer};
