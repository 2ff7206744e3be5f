pub mod app;
pub mod factory;

#[allow(unused_imports)]
pub use app::{location, test_config, TestApp};
#[allow(unused_imports)]
pub use factory::{Factory, TestSession, TestUser, TEST_CSRF_TOKEN, TEST_PASSWORD};
