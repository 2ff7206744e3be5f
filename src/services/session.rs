use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap};
use cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppResult;

/// Severity of a flash message; doubles as the CSS class suffix in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }
}

/// One-shot notice shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Everything the session cookie carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<Uuid>,
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flash: Vec<FlashMessage>,
}

/// Signed token claims
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    data: SessionData,
    exp: i64, // expiration timestamp
    iat: i64, // issued at timestamp
}

struct CodecInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    cookie_name: String,
    secure: bool,
}

/// Signs session data into the cookie value and reads it back.
#[derive(Clone)]
pub struct SessionCodec {
    inner: Arc<CodecInner>,
}

impl SessionCodec {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Arc::new(CodecInner {
                encoding: EncodingKey::from_secret(config.session_secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.session_secret.as_bytes()),
                ttl: Duration::hours(config.session_expiration_hours),
                cookie_name: config.session_cookie_name.clone(),
                secure: config.environment.is_production(),
            }),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.inner.cookie_name
    }

    /// Sign `data` into a token valid for the configured lifetime
    pub fn encode(&self, data: &SessionData) -> AppResult<String> {
        let now = OffsetDateTime::now_utc();
        let claims = SessionClaims {
            data: data.clone(),
            exp: (now + self.inner.ttl).unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.inner.encoding)?;
        Ok(token)
    }

    /// Verify a token. Tampered or expired tokens yield `None`.
    pub fn decode(&self, token: &str) -> Option<SessionData> {
        match decode::<SessionClaims>(token, &self.inner.decoding, &Validation::default()) {
            Ok(token_data) => Some(token_data.claims.data),
            Err(e) => {
                tracing::debug!("Discarding session cookie: {}", e);
                None
            }
        }
    }

    /// Build the session for a request from its `Cookie` headers.
    ///
    /// A missing or invalid cookie starts an empty session; a session without a CSRF token
    /// gets one and is marked for saving.
    pub fn load(&self, headers: &HeaderMap) -> Session {
        let data = self
            .read_cookie(headers)
            .and_then(|token| self.decode(&token))
            .unwrap_or_default();

        let mut session = Session {
            data,
            codec: self.clone(),
            dirty: false,
        };
        if session.data.csrf_token.is_empty() {
            session.data.csrf_token = new_csrf_token();
            session.dirty = true;
        }
        session
    }

    /// `Set-Cookie` value persisting `data`
    pub fn cookie(&self, data: &SessionData) -> AppResult<Cookie<'static>> {
        let token = self.encode(data)?;
        let max_age = cookie::time::Duration::seconds(self.inner.ttl.whole_seconds());

        Ok(Cookie::build((self.inner.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.inner.secure)
            .max_age(max_age)
            .build())
    }

    fn read_cookie(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| Cookie::split_parse(raw).flatten())
            .find(|cookie| cookie.name() == self.inner.cookie_name)
            .map(|cookie| cookie.value().to_string())
    }
}

fn new_csrf_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Request-scoped session state.
///
/// Handlers that change it must return it as part of their response so the cookie is
/// rewritten; unchanged sessions write nothing.
#[derive(Clone)]
pub struct Session {
    data: SessionData,
    codec: SessionCodec,
    dirty: bool,
}

impl Session {
    pub fn current_user_id(&self) -> Option<Uuid> {
        self.data.current_user_id
    }

    /// Log `user_id` in. The CSRF token is rotated along with the identity.
    pub fn set_current_user_id(&mut self, user_id: Uuid) {
        self.data.current_user_id = Some(user_id);
        self.data.csrf_token = new_csrf_token();
        self.dirty = true;
    }

    /// Forget everything, including pending flashes
    pub fn clear(&mut self) {
        self.data = SessionData {
            csrf_token: new_csrf_token(),
            ..SessionData::default()
        };
        self.dirty = true;
    }

    pub fn csrf_token(&self) -> &str {
        &self.data.csrf_token
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.data.flash.push(FlashMessage {
            level,
            message: message.into(),
        });
        self.dirty = true;
    }

    /// Drain pending flashes for display
    pub fn take_flashes(&mut self) -> Vec<FlashMessage> {
        if self.data.flash.is_empty() {
            return Vec::new();
        }
        self.dirty = true;
        std::mem::take(&mut self.data.flash)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    use crate::config::Environment;

    fn config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            session_secret: "unit-test-session-secret".to_string(),
            session_expiration_hours: 1,
            session_cookie_name: "_test_session".to_string(),
            bcrypt_cost: 4,
            environment: Environment::Test,
            assets_dir: "public".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn token_round_trips_session_data() {
        let codec = SessionCodec::new(&config());
        let data = SessionData {
            current_user_id: Some(Uuid::new_v4()),
            csrf_token: "abc".to_string(),
            flash: vec![FlashMessage {
                level: FlashLevel::Warning,
                message: "Careful".to_string(),
            }],
        };

        let token = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&token), Some(data));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let codec = SessionCodec::new(&config());
        let mut other_config = config();
        other_config.session_secret = "a-different-secret".to_string();
        let other = SessionCodec::new(&other_config);

        let token = other.encode(&SessionData::default()).unwrap();
        assert_eq!(codec.decode(&token), None);
        assert_eq!(codec.decode("garbage"), None);
    }

    #[test]
    fn load_reads_the_named_cookie_among_others() {
        let codec = SessionCodec::new(&config());
        let user_id = Uuid::new_v4();
        let token = codec
            .encode(&SessionData {
                current_user_id: Some(user_id),
                csrf_token: "token".to_string(),
                flash: Vec::new(),
            })
            .unwrap();

        let headers = headers_with_cookie(&format!("theme=dark; _test_session={}", token));
        let session = codec.load(&headers);

        assert_eq!(session.current_user_id(), Some(user_id));
        assert_eq!(session.csrf_token(), "token");
        assert!(!session.is_dirty());
    }

    #[test]
    fn missing_cookie_starts_an_anonymous_session_with_a_csrf_token() {
        let codec = SessionCodec::new(&config());
        let session = codec.load(&HeaderMap::new());

        assert_eq!(session.current_user_id(), None);
        assert_eq!(session.csrf_token().len(), 32);
        assert!(session.is_dirty());
    }

    #[test]
    fn flashes_are_one_shot() {
        let codec = SessionCodec::new(&config());
        let mut session = codec.load(&HeaderMap::new());

        session.flash(FlashLevel::Success, "Saved");
        let flashes = session.take_flashes();
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].level.as_str(), "success");
        assert!(session.take_flashes().is_empty());
    }

    #[test]
    fn login_rotates_csrf_token_and_clear_forgets_user() {
        let codec = SessionCodec::new(&config());
        let mut session = codec.load(&HeaderMap::new());
        let anonymous_token = session.csrf_token().to_string();

        session.set_current_user_id(Uuid::new_v4());
        assert_ne!(session.csrf_token(), anonymous_token);

        session.flash(FlashLevel::Info, "pending");
        session.clear();
        assert_eq!(session.current_user_id(), None);
        assert!(session.data().flash.is_empty());
        assert!(!session.csrf_token().is_empty());
    }

    #[test]
    fn cookie_is_http_only_and_scoped_to_root() {
        let codec = SessionCodec::new(&config());
        let cookie = codec.cookie(&SessionData::default()).unwrap();

        assert_eq!(cookie.name(), "_test_session");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
    }
}
