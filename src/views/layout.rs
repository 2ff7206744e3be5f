use crate::config::Environment;
use crate::models::User;
use crate::services::{FlashMessage, Session};

/// A flash message ready for display
#[derive(Debug, Clone)]
pub struct FlashView {
    pub css_class: String,
    pub message: String,
}

impl From<FlashMessage> for FlashView {
    fn from(flash: FlashMessage) -> Self {
        Self {
            css_class: format!("flash flash-{}", flash.level.as_str()),
            message: flash.message,
        }
    }
}

/// The signed-in user as shown in the navigation bar
#[derive(Debug, Clone)]
pub struct NavUser {
    pub name: String,
    pub profile_url: String,
    pub contracts_url: String,
    pub is_admin: bool,
}

/// Data shared by every page rendered inside `layout.html`
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub current_path: String,
    pub csrf_token: String,
    pub flashes: Vec<FlashView>,
    pub nav_user: Option<NavUser>,
    /// Shown outside production
    pub env_banner: Option<String>,
}

impl Layout {
    /// Build the layout for a page. Pending flashes are drained from the session, so the
    /// session must be part of the response.
    pub fn new(
        title: impl Into<String>,
        session: &mut Session,
        current_user: Option<&User>,
        environment: Environment,
        current_path: &str,
    ) -> Self {
        let nav_user = current_user.map(|user| NavUser {
            name: user.full_name(),
            profile_url: format!("/users/{}", user.id),
            contracts_url: format!("/users/{}/contracts", user.id),
            is_admin: user.is_admin(),
        });

        Self {
            title: title.into(),
            current_path: current_path.to_string(),
            csrf_token: session.csrf_token().to_string(),
            flashes: session.take_flashes().into_iter().map(FlashView::from).collect(),
            nav_user,
            env_banner: (!environment.is_production()).then(|| environment.as_str().to_string()),
        }
    }

    /// `"active"` when the current page lives under `prefix`
    pub fn nav_class(&self, prefix: &str) -> &'static str {
        let active = if prefix == "/" {
            self.current_path == "/"
        } else {
            self.current_path == prefix
                || self
                    .current_path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        };

        if active {
            "active"
        } else {
            ""
        }
    }
}
