pub mod widgets;
pub mod cards;
pub mod list;
pub mod forms;
pub mod login;
pub mod dashboard;
pub mod profile;
pub mod layout;

pub use layout::render_app;
pub use login::render_login;
pub use list::render_list;
pub use forms::render_form;
pub use dashboard::render_dashboard;
pub use profile::render_profile;
