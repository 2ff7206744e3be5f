use sea_orm::ConnectionTrait;

use crate::error::AppResult;
use crate::models::{normalize_email, User};
use crate::repositories::UserRepository;

pub struct AuthService;

impl AuthService {
    /// Hash a password using bcrypt
    pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
        let hash = bcrypt::hash(password, cost)?;
        Ok(hash)
    }

    /// Verify a password against a bcrypt hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let result = bcrypt::verify(password, hash)?;
        Ok(result)
    }

    /// Look up a user by case-folded email and check the password.
    ///
    /// Returns `None` both for an unknown email and for a wrong password so callers cannot
    /// tell the two apart.
    pub async fn authenticate<C>(db: &C, email: &str, password: &str) -> AppResult<Option<User>>
    where
        C: ConnectionTrait,
    {
        let Some(user) = UserRepository::find_by_email(db, &normalize_email(email)).await? else {
            return Ok(None);
        };

        if !Self::verify_password(password, &user.password_hash)? {
            return Ok(None);
        }

        Ok(Some(user))
    }
}
