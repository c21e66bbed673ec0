use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;

use crate::{
    domain::Admin,
    error::{AppError, Result},
    repository::AdminRepository,
};

pub mod session;

use session::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "session";

/// Shown for both unknown emails and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password. Please try again.";

pub struct AuthService {
    session_store: SessionStore,
    admin_repo: Arc<dyn AdminRepository>,
    session_duration_hours: i64,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(
        pool: SqlitePool,
        admin_repo: Arc<dyn AdminRepository>,
        session_duration_hours: i64,
        secure_cookies: bool,
    ) -> Self {
        Self {
            session_store: SessionStore::new(pool),
            admin_repo,
            session_duration_hours,
            secure_cookies,
        }
    }

    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    pub async fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Checks credentials and opens a session. Unknown emails and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Admin, String)> {
        let password_hash = self.admin_repo
            .password_hash(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !Self::verify_password(password, &password_hash).await? {
            return Err(AppError::Unauthorized);
        }

        let admin = self.admin_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let (_session, token) = self.create_session(&admin).await?;
        tracing::info!("Admin {} signed in", admin.email);

        Ok((admin, token))
    }

    pub async fn create_session(&self, admin: &Admin) -> Result<(Session, String)> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);

        let session = self.session_store
            .create(admin.id, &token, expires_at)
            .await?;

        Ok((session, token))
    }

    /// Resolves a session token to its admin, if the session is still live.
    pub async fn authenticate(&self, token: &str) -> Result<Option<Admin>> {
        let Some(session) = self.session_store.find_by_token(token).await? else {
            return Ok(None);
        };

        self.admin_repo.find_by_id(session.admin_id).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.delete_by_token(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        let token = generate_token();
        assert_eq!(token.len(), 64); // 32 bytes = 64 hex chars
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = AuthService::hash_password("my_secure_password").await.unwrap();
        assert!(AuthService::verify_password("my_secure_password", &hash).await.unwrap());
        assert!(!AuthService::verify_password("wrong_password", &hash).await.unwrap());
    }
}
