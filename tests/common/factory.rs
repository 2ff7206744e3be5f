use axum::http::{header::COOKIE, HeaderName, HeaderValue};
use time::OffsetDateTime;
use uuid::Uuid;

use timesheet::middlewares::CSRF_HEADER;
use timesheet::models::{Boss, Contract, ContractInput, CreateUser, Role, Task, TaskInput, User};
use timesheet::repositories::{
    BossRepository, ContractRepository, TaskRepository, UserRepository,
};
use timesheet::services::{AuthService, SessionData};
use timesheet::state::AppState;

pub const TEST_PASSWORD: &str = "TestPassword123!";
pub const TEST_CSRF_TOKEN: &str = "test-csrf-token";

/// A created user and the password it was created with
#[allow(dead_code)]
pub struct TestUser {
    pub user: User,
    pub password: String,
}

/// Cookie and CSRF token of a minted session
#[allow(dead_code)]
pub struct TestSession {
    pub cookie: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
impl TestSession {
    pub fn cookie_name() -> HeaderName {
        COOKIE
    }

    pub fn cookie_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.cookie).unwrap()
    }

    pub fn csrf_name() -> HeaderName {
        HeaderName::from_static(CSRF_HEADER)
    }

    pub fn csrf_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.csrf_token).unwrap()
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a member with a unique email
    pub async fn create_user(&self) -> TestUser {
        let email = format!("test-{}@example.com", Uuid::new_v4());
        let user = self.create_user_with_email(&email, TEST_PASSWORD).await;

        TestUser {
            user,
            password: TEST_PASSWORD.to_string(),
        }
    }

    /// Create a member with specific credentials
    pub async fn create_user_with_email(&self, email: &str, password: &str) -> User {
        let input = CreateUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: password.to_string(),
            password_confirmation: password.to_string(),
        };

        let password_hash =
            AuthService::hash_password(password, self.state.config.bcrypt_cost).unwrap();
        UserRepository::create(&self.state.db, &input, &password_hash)
            .await
            .unwrap()
    }

    /// Create a user with the admin role
    pub async fn create_admin(&self) -> User {
        let member = self.create_user().await;
        UserRepository::set_role(&self.state.db, member.user.id, Role::Admin)
            .await
            .unwrap()
    }

    pub async fn create_boss(&self, name: &str) -> Boss {
        BossRepository::create(&self.state.db, name).await.unwrap()
    }

    pub async fn create_contract(&self, user_id: Uuid, boss_id: i32, rate: i32) -> Contract {
        ContractRepository::create(&self.state.db, user_id, &ContractInput { boss_id, rate })
            .await
            .unwrap()
    }

    /// Create a task starting at `start_time` and lasting `minutes`
    pub async fn create_task(
        &self,
        contract_id: i32,
        description: &str,
        start_time: OffsetDateTime,
        minutes: i32,
    ) -> Task {
        let input = TaskInput {
            description: description.to_string(),
            start_time,
            end_time: start_time + time::Duration::minutes(i64::from(minutes)),
            duration: minutes,
            rate: 20,
        };
        TaskRepository::create(&self.state.db, contract_id, &input)
            .await
            .unwrap()
    }

    /// Mint a session cookie, signed in as `user_id` when given
    pub fn session_for(&self, user_id: Option<Uuid>) -> TestSession {
        let data = SessionData {
            current_user_id: user_id,
            csrf_token: TEST_CSRF_TOKEN.to_string(),
            flash: Vec::new(),
        };
        let token = self.state.sessions.encode(&data).unwrap();

        TestSession {
            cookie: format!("{}={}", self.state.sessions.cookie_name(), token),
            csrf_token: TEST_CSRF_TOKEN.to_string(),
        }
    }

    /// Session of an anonymous visitor
    pub fn anonymous_session(&self) -> TestSession {
        self.session_for(None)
    }
}
