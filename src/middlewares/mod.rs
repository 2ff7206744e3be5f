pub mod auth;
pub mod csrf;
pub mod session;
pub mod ssl;

pub use auth::{anon_only, authorize, is_admin, is_owner, set_current_user, CurrentUser};
pub use csrf::{verify_csrf, CSRF_FORM_FIELD, CSRF_HEADER};
pub use session::load_session;
pub use ssl::force_ssl;
