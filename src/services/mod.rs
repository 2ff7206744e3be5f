pub mod auth;
pub mod session;

pub use auth::AuthService;
pub use session::{FlashLevel, FlashMessage, Session, SessionCodec, SessionData};
