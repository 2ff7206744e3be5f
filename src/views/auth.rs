use askama::Template;

use super::Layout;

#[derive(Template)]
#[template(path = "auth/new.html")]
pub struct SignInView {
    pub layout: Layout,
    pub email: String,
    pub errors: Vec<String>,
}

impl SignInView {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            email: String::new(),
            errors: Vec::new(),
        }
    }
}
